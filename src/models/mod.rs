pub mod board;
pub mod document;

pub use board::{Board, BoardSchema, Column, Group, ImportProgress, ImportResult};
pub use document::{CharacterLoop, ConsistencyReport, DeclaredTotals, EpisodeNumber, ExtractedDocument};
