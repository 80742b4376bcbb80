/// Logging helpers
///
/// Subscriber setup plus the formatted blocks printed around an import
use crate::config::Config;
use crate::models::{ExtractedDocument, ImportResult};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` wins over `verbose`.
///
/// # Parameters
/// - `verbose`: default to `debug` instead of `info` when `RUST_LOG` is unset
///
/// Calling it twice keeps the first subscriber.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Log the startup banner
///
/// # Parameters
/// - `config`: board, group and subitem board are shown, blanks as "—"
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 Script import → board");
    info!("📊 Board: {}", display_or_dash(Some(config.board_id.as_str())));
    info!("📁 Group: {}", display_or_dash(config.group_id.as_deref()));
    info!(
        "📁 Subitem board: {}",
        display_or_dash(config.subitems_board_id.as_deref())
    );
    info!("{}", "=".repeat(60));
}

/// Log the extraction preview and the soft consistency check
///
/// # Parameters
/// - `document`: extraction result; declared vs. imported count mismatches
///   are logged at `warn`
pub fn log_preview(document: &ExtractedDocument) {
    info!("\n{}", "─".repeat(60));
    info!(
        "Episode: {}",
        display_or_dash(document.episode.as_ref().map(|e| e.as_str()))
    );
    info!("Obra: {}", display_or_dash(document.original_title.as_deref()));

    if document.characters.is_empty() {
        info!("Subitems: —");
    } else {
        info!("Subitems:");
        for character in &document.characters {
            info!("  {}\t{}", truncate_text(&character.name, 40), character.loops);
        }
    }

    let report = document.consistency();
    info!("Summary");
    match (report.declared_characters, report.characters_match) {
        (Some(declared), Some(true)) => info!(
            "  Characters: {} importing | Script: {} ✓",
            report.imported_characters, declared
        ),
        (Some(declared), _) => warn!(
            "  Characters: {} importing | Script: {} — counts do not match",
            report.imported_characters, declared
        ),
        (None, _) => info!("  Characters: {} importing", report.imported_characters),
    }
    match (report.declared_loops, report.loops_match) {
        (Some(declared), Some(false)) => warn!(
            "  Loops (import total): {} | Script: {} — totals do not match",
            report.computed_loops, declared
        ),
        (Some(declared), _) => info!(
            "  Loops (import total): {} | Script: {} ✓",
            report.computed_loops, declared
        ),
        (None, _) => info!("  Loops (import total): {}", report.computed_loops),
    }
    info!("{}", "─".repeat(60));
}

/// Log the final status line
pub fn log_import_complete(result: &ImportResult) {
    info!("\n{}", "=".repeat(60));
    info!(
        "✅ Done: item {} and {} subitems created",
        result.item_id, result.subitems_created
    );
    info!(
        "Finished at: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
}

/// Shorten long text for log output
///
/// # Parameters
/// - `text`: text to shorten
/// - `max_len`: maximum length in characters, not bytes
///
/// # Returns
/// The first `max_len` characters followed by `...`, or `text` unchanged
/// when it already fits
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

fn display_or_dash(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => "—",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_text("MARÍA JOSÉ", 5), "MARÍA...");
        assert_eq!(truncate_text("ANA", 5), "ANA");
    }

    #[test]
    fn dash_for_missing_values() {
        assert_eq!(display_or_dash(None), "—");
        assert_eq!(display_or_dash(Some("  ")), "—");
        assert_eq!(display_or_dash(Some("042")), "042");
    }
}
