pub mod schema_resolver;
pub mod text_extractor;
pub mod value_mapper;

pub use schema_resolver::SchemaResolver;
pub use text_extractor::TextExtractor;
pub use value_mapper::{ColumnLookup, ValueMapper};
