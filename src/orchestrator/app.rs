//! Application entry - orchestration layer
//!
//! Reads the PDF, shows the preview, checks the preconditions and runs the
//! import with progress logging. One import per run.

use crate::clients::MondayClient;
use crate::config::Config;
use crate::error::AppResult;
use crate::models::{ExtractedDocument, ImportProgress, ImportResult};
use crate::orchestrator::import_processor;
use crate::services::TextExtractor;
use crate::utils::logging;
use std::path::Path;
use tracing::info;

/// Importer application
pub struct App {
    config: Config,
    extractor: TextExtractor,
}

impl App {
    pub fn new(config: Config) -> Self {
        let extractor = TextExtractor::new(&config);
        logging::log_startup(&config);
        Self { config, extractor }
    }

    /// Extract and preview the PDF; import it unless `dry_run`.
    pub async fn run(&self, pdf_path: &Path, dry_run: bool) -> AppResult<Option<ImportResult>> {
        let document = self.preview(pdf_path)?;

        if dry_run {
            info!("💡 Dry run: nothing was sent to the board");
            return Ok(None);
        }

        let result = self.import(&document).await?;
        logging::log_import_complete(&result);
        Ok(Some(result))
    }

    /// Read the PDF and log what would be imported.
    pub fn preview(&self, pdf_path: &Path) -> AppResult<ExtractedDocument> {
        let document = self.extractor.extract_from_document(pdf_path)?;
        logging::log_preview(&document);
        Ok(document)
    }

    /// Import an already extracted document.
    pub async fn import(&self, document: &ExtractedDocument) -> AppResult<ImportResult> {
        self.config.validate()?;

        let client = MondayClient::new(&self.config);
        let today = chrono::Local::now().date_naive();
        import_processor::import_extracted(&client, &self.config, document, today, log_progress).await
    }
}

fn log_progress(progress: &ImportProgress) {
    info!(
        "[{:>3}%] {}/{} {}",
        progress.percent(),
        progress.completed,
        progress.total,
        progress.message
    );
}
