//! # Guion Import
//!
//! Imports dubbing script PDFs into a monday.com-style board: one item per
//! episode, one subitem per character with its loop count.
//!
//! ## Layers
//!
//! ### ① Infrastructure
//! - `infrastructure/` - `PdfReader`, owns the parsed PDF and exposes page text
//! - `clients/` - `GraphQlTransport` trait and the HTTP `MondayClient`
//!
//! ### ② Services
//! - `TextExtractor` - episode, title, character table and header totals
//! - `SchemaResolver` - parent and subitem columns of the target board
//! - `ValueMapper` - column-values payloads keyed by column id
//!
//! ### ③ Orchestration
//! - `orchestrator/import_processor` - one item, then each subitem in order
//! - `orchestrator/app` - preview, precondition checks, progress logging

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

pub use clients::{GraphQlTransport, MondayClient};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{CharacterLoop, ExtractedDocument, ImportProgress, ImportResult};
pub use orchestrator::{import_extracted, App, ImportProcessor};
pub use services::{SchemaResolver, TextExtractor, ValueMapper};
