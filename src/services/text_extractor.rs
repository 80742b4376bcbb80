//! Script text extraction - service layer
//!
//! Finds the episode number, the original title, the character/loops table
//! and the header totals inside the flat text of a script PDF. Every
//! heuristic is a pure function over `&str` so it can be tested without a PDF.

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::PdfReader;
use crate::models::{CharacterLoop, DeclaredTotals, EpisodeNumber, ExtractedDocument};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info};

/// Characters scanned after the table header.
pub const TABLE_WINDOW_CHARS: usize = 3500;
/// Characters treated as script header when the table header is missing.
pub const HEADER_FALLBACK_CHARS: usize = 800;
/// Longest accepted character name.
pub const MAX_NAME_CHARS: usize = 80;

/// `<stem-without-underscore>_<digits>_...`
pub const EPISODE_PATTERN: &str = r"^[^_]+_([0-9]+)_";
/// Full column header, or only its last two labels.
pub const TABLE_HEADER_PATTERN: &str =
    r"(?i)PERSONAJE\s+COL\s+ACTOR\s+LLAMADO\s+LOOPS|LLAMADO\s+LOOPS";
/// `<name> <mm:ss|hh:mm:ss> <COL|ADC> <actor id> <loops>`; rows may share a line.
///
/// Digits are ASCII only, `\d` would also accept other Unicode digit scripts.
pub const ROW_PATTERN: &str =
    r"(.+?)\s+([0-9]{1,2}:[0-9]{2}(?::[0-9]{2})?)\s+(?:COL|ADC)\s+[0-9]+\s+([0-9]+)";
/// Watermark the renderer glues onto the first name of a page.
pub const NAME_BOILERPLATE_PATTERN: &str = r"(?i)^Para uso exclusivo de CAJA DE RUIDOS\s*";
/// Value after "TÍTULO ORIGINAL" up to the next section label or end of text.
pub const TITLE_PATTERN: &str = r"(?i)TÍTULO\s+ORIGINAL\s+(.+?)(?:\s+(?:TÍTULO|PÁGINAS|DURACIÓN|TRADUCCIÓN|PERSONAJES|LOOPS)|\s*$)";
/// Narrower title run ending at a double space or a line break.
pub const TITLE_FALLBACK_PATTERN: &str = r"(?i)TÍTULO\s+ORIGINAL\s+([A-Z0-9\s\-\.]+?)(?:\s{2,}|\n|$)";
pub const DECLARED_CHARACTERS_PATTERN: &str = r"(?i)PERSONAJES\s+([0-9]+)";
pub const DECLARED_LOOPS_PATTERN: &str = r"(?i)LOOPS\s+([0-9]+)";

static EPISODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(EPISODE_PATTERN).expect("valid regex"));
static TABLE_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TABLE_HEADER_PATTERN).expect("valid regex"));
static ROW_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(ROW_PATTERN).expect("valid regex"));
static NAME_BOILERPLATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(NAME_BOILERPLATE_PATTERN).expect("valid regex"));
static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(TITLE_PATTERN).expect("valid regex"));
static TITLE_FALLBACK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TITLE_FALLBACK_PATTERN).expect("valid regex"));
static DECLARED_CHARACTERS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DECLARED_CHARACTERS_PATTERN).expect("valid regex"));
static DECLARED_LOOPS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DECLARED_LOOPS_PATTERN).expect("valid regex"));

/// Episode number from a file name such as `Obra_042_(final).pdf`.
pub fn episode_from_filename(filename: &str) -> Option<EpisodeNumber> {
    let stem = strip_pdf_extension(filename);
    EPISODE_RE
        .captures(stem)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| EpisodeNumber::new(digits.as_str()))
}

/// Value of the "TÍTULO ORIGINAL" header field.
pub fn extract_title(text: &str) -> Option<String> {
    [&*TITLE_RE, &*TITLE_FALLBACK_RE]
        .into_iter()
        .find_map(|re| re.captures(text).and_then(|caps| caps.get(1)))
        .map(|m| m.as_str().trim().to_string())
        .filter(|title| !title.is_empty())
}

/// Character rows of the loops table, in order of appearance.
///
/// Duplicated names stay as separate rows.
pub fn extract_character_table(text: &str) -> Vec<CharacterLoop> {
    let start = TABLE_HEADER_RE.find(text).map(|m| m.end()).unwrap_or(0);
    let window = take_chars(&text[start..], TABLE_WINDOW_CHARS);

    ROW_RE
        .captures_iter(window)
        .filter_map(|caps| {
            let loops = caps.get(3)?.as_str().parse::<u32>().ok()?;
            let raw_name = caps.get(1)?.as_str().trim();
            let name = NAME_BOILERPLATE_RE.replace(raw_name, "");
            let name = name.trim();
            if is_valid_name(name) {
                Some(CharacterLoop::new(name, loops))
            } else {
                debug!("Skipping table row with name {:?}", name);
                None
            }
        })
        .collect()
}

/// "PERSONAJES n" and "LOOPS n" from the header above the table.
pub fn extract_declared_totals(text: &str) -> DeclaredTotals {
    let header = match TABLE_HEADER_RE.find(text) {
        Some(m) => &text[..m.start()],
        None => take_chars(text, HEADER_FALLBACK_CHARS),
    };
    let number = |re: &Regex| -> Option<u32> {
        re.captures(header)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    };
    DeclaredTotals {
        characters: number(&DECLARED_CHARACTERS_RE),
        loops: number(&DECLARED_LOOPS_RE),
    }
}

/// Compose every heuristic over text already pulled from the PDF.
pub fn extract_from_text(filename: &str, text: &str) -> ExtractedDocument {
    ExtractedDocument::new(
        strip_pdf_extension(filename),
        episode_from_filename(filename),
        extract_title(text),
        extract_character_table(text),
        extract_declared_totals(text),
    )
}

/// Reads script PDFs and turns them into `ExtractedDocument`s
pub struct TextExtractor {
    max_pages: usize,
}

impl TextExtractor {
    pub fn new(config: &Config) -> Self {
        Self::with_max_pages(config.max_pages)
    }

    pub fn with_max_pages(max_pages: usize) -> Self {
        Self { max_pages }
    }

    /// Extract from a PDF on disk
    pub fn extract_from_document(&self, path: &Path) -> AppResult<ExtractedDocument> {
        info!("📄 Reading {}", path.display());
        let reader = PdfReader::open(path)?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        self.extract_with(&reader, &filename)
    }

    /// Extract from PDF bytes, `filename` supplies the episode number
    pub fn extract_from_bytes(&self, filename: &str, bytes: &[u8]) -> AppResult<ExtractedDocument> {
        let reader = PdfReader::from_bytes(filename, bytes)?;
        self.extract_with(&reader, filename)
    }

    fn extract_with(&self, reader: &PdfReader, filename: &str) -> AppResult<ExtractedDocument> {
        let text = reader.first_pages_text(self.max_pages)?;
        debug!("Extracted {} characters of text", text.chars().count());
        let document = extract_from_text(filename, &text);
        info!(
            "✓ Found {} characters, {} loops",
            document.characters.len(),
            document.computed_loop_total
        );
        Ok(document)
    }
}

fn strip_pdf_extension(filename: &str) -> &str {
    let len = filename.len();
    if len >= 4 && filename.is_char_boundary(len - 4) && filename[len - 4..].eq_ignore_ascii_case(".pdf") {
        &filename[..len - 4]
    } else {
        filename
    }
}

fn take_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().count() <= MAX_NAME_CHARS && name.chars().any(char::is_alphabetic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::pdf_reader::tests::pdf_with_pages;

    const SCRIPT: &str = "CAJA DE RUIDOS TÍTULO ORIGINAL LEONARDO TÍTULO EN ESPAÑOL LEONARDO \
        PÁGINAS 32 DURACIÓN 22:10 PERSONAJES 3 LOOPS 20 \
        PERSONAJE COL ACTOR LLAMADO LOOPS \
        Para uso exclusivo de CAJA DE RUIDOS LEONARDO 10:00 COL 12 10 \
        CATERINA 10:30 ADC 7 6 SER PIERO 11:00 COL 3 4";

    #[test]
    fn episode_from_matching_filename() {
        assert_eq!(episode_from_filename("Serie_007_final.pdf").unwrap().as_str(), "007");
        assert_eq!(episode_from_filename("Leonardo_042_(ES).PDF").unwrap().as_str(), "042");
        assert_eq!(episode_from_filename("Leonardo_042_x").unwrap().as_str(), "042");
    }

    #[test]
    fn episode_missing_for_other_filenames() {
        assert!(episode_from_filename("nofile.pdf").is_none());
        assert!(episode_from_filename("Serie_007.pdf").is_none());
        assert!(episode_from_filename("_007_final.pdf").is_none());
        assert!(episode_from_filename("Serie_final_007_.pdf").is_none());
    }

    #[test]
    fn title_stops_at_next_label() {
        assert_eq!(extract_title(SCRIPT).as_deref(), Some("LEONARDO"));
        assert_eq!(
            extract_title("título original El Ramo Azul PÁGINAS 10").as_deref(),
            Some("El Ramo Azul")
        );
    }

    #[test]
    fn title_runs_to_end_of_text() {
        assert_eq!(extract_title("TÍTULO ORIGINAL RAMO").as_deref(), Some("RAMO"));
    }

    #[test]
    fn title_falls_back_to_line_pattern() {
        let text = "TÍTULO ORIGINAL RAMO\nSomething else without labels";
        assert_eq!(extract_title(text).as_deref(), Some("RAMO"));
        assert!(extract_title("no title here").is_none());
    }

    #[test]
    fn table_rows_on_one_line_are_all_kept() {
        let rows = extract_character_table("JUAN 01:23 COL 4 12 MARÍA 00:45 ADC 2 5");
        assert_eq!(
            rows,
            vec![CharacterLoop::new("JUAN", 12), CharacterLoop::new("MARÍA", 5)]
        );
    }

    #[test]
    fn table_strips_watermark_and_keeps_order() {
        let rows = extract_character_table(SCRIPT);
        assert_eq!(
            rows,
            vec![
                CharacterLoop::new("LEONARDO", 10),
                CharacterLoop::new("CATERINA", 6),
                CharacterLoop::new("SER PIERO", 4),
            ]
        );
    }

    #[test]
    fn table_accepts_hour_timestamps_and_duplicates() {
        let rows = extract_character_table("LLAMADO LOOPS ANA 1:02:03 COL 1 2 ANA 1:05:00 COL 1 3");
        assert_eq!(rows, vec![CharacterLoop::new("ANA", 2), CharacterLoop::new("ANA", 3)]);
    }

    #[test]
    fn table_rejects_invalid_names() {
        let long_name = "X".repeat(MAX_NAME_CHARS + 1);
        let text = format!(
            "LLAMADO LOOPS 123 01:00 COL 1 2\nPara uso exclusivo de CAJA DE RUIDOS 01:00 COL 1 3\n{} 01:00 COL 1 4\nOK 01:00 COL 1 5",
            long_name
        );
        assert_eq!(extract_character_table(&text), vec![CharacterLoop::new("OK", 5)]);
    }

    #[test]
    fn table_rejects_loop_counts_that_overflow() {
        let rows = extract_character_table("ANA 01:00 COL 1 99999999999 BETO 01:00 COL 1 1");
        assert_eq!(rows, vec![CharacterLoop::new("BETO", 1)]);
    }

    #[test]
    fn table_scan_is_bounded_by_window() {
        let filler = "x".repeat(TABLE_WINDOW_CHARS + 10);
        let text = format!("LLAMADO LOOPS {} JUAN 01:23 COL 4 12", filler);
        assert!(extract_character_table(&text).is_empty());

        let text = format!("LLAMADO LOOPS JUAN 01:23 COL 4 12 {}", filler);
        assert_eq!(extract_character_table(&text), vec![CharacterLoop::new("JUAN", 12)]);
    }

    #[test]
    fn non_ascii_digits_are_not_numbers() {
        // Arabic-Indic and fullwidth digits
        assert!(episode_from_filename("Serie_٠٠٧_final.pdf").is_none());
        assert!(extract_character_table("JUAN ٠١:٢٣ COL ٤ ١٢").is_empty());
        assert!(extract_character_table("JUAN 01:23 COL 4 １２").is_empty());
        assert_eq!(
            extract_declared_totals("PERSONAJES ٣ LOOPS ２０ LLAMADO LOOPS"),
            DeclaredTotals::default()
        );
    }

    #[test]
    fn declared_totals_come_from_header() {
        let totals = extract_declared_totals(SCRIPT);
        assert_eq!(totals.characters, Some(3));
        assert_eq!(totals.loops, Some(20));

        let none = extract_declared_totals("PERSONAJE COL ACTOR LLAMADO LOOPS JUAN 01:23 COL 4 12");
        assert_eq!(none, DeclaredTotals::default());
    }

    #[test]
    fn declared_totals_without_table_use_first_chars() {
        let text = format!("PERSONAJES 4 {} LOOPS 9", "y".repeat(HEADER_FALLBACK_CHARS));
        let totals = extract_declared_totals(&text);
        assert_eq!(totals.characters, Some(4));
        assert_eq!(totals.loops, None);
    }

    #[test]
    fn extract_from_text_composes_everything() {
        let doc = extract_from_text("Leonardo_003_ES.pdf", SCRIPT);
        assert_eq!(doc.filename, "Leonardo_003_ES");
        assert_eq!(doc.episode.as_ref().map(|e| e.as_str()), Some("003"));
        assert_eq!(doc.original_title.as_deref(), Some("LEONARDO"));
        assert_eq!(doc.characters.len(), 3);
        assert_eq!(doc.declared_character_count, Some(3));
        assert_eq!(doc.declared_loop_count, Some(20));
        assert_eq!(doc.computed_loop_total, 20);
        assert!(!doc.consistency().has_mismatch());
    }

    #[test]
    fn extract_from_bytes_reads_a_real_pdf() {
        let bytes = pdf_with_pages(&[
            &["TITULO ORIGINAL", "RAMO", "PERSONAJES 2", "LOOPS 17"],
            &["PERSONAJE", "COL", "ACTOR", "LLAMADO", "LOOPS"],
            &["JUAN", "01:23", "COL", "4", "12", "MARIA", "00:45", "ADC", "2", "5"],
            &["PEDRO", "02:00", "COL", "9", "30"],
        ]);

        let doc = TextExtractor::with_max_pages(3)
            .extract_from_bytes("Ramo_042_ES.pdf", &bytes)
            .unwrap();

        assert_eq!(doc.episode.as_ref().map(|e| e.as_str()), Some("042"));
        assert_eq!(
            doc.characters,
            vec![CharacterLoop::new("JUAN", 12), CharacterLoop::new("MARIA", 5)]
        );
        assert_eq!(doc.declared_character_count, Some(2));
        assert_eq!(doc.declared_loop_count, Some(17));
        assert_eq!(doc.computed_loop_total, 17);
    }
}
