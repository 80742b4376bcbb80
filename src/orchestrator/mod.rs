//! Orchestration layer
//!
//! `app` owns the configuration and the run (extract → preview → import);
//! `import_processor` sequences the remote calls for one episode.
//!
//! ```text
//! app (one PDF)
//!     ↓
//! import_processor (one item + N subitems)
//!     ↓
//! services (extract / resolve schema / map values)
//!     ↓
//! clients + infrastructure (GraphQL transport, PDF reader)
//! ```

pub mod app;
pub mod import_processor;

pub use app::App;
pub use import_processor::{import_extracted, ImportProcessor};
