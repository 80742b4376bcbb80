use serde::Serialize;
use std::fmt;

/// Episode number taken from the file name, digits kept verbatim ("007").
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpisodeNumber(String);

impl EpisodeNumber {
    /// Returns `None` unless `digits` is a non-empty ASCII digit run.
    pub fn new(digits: impl Into<String>) -> Option<Self> {
        let digits = digits.into();
        if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
            Some(Self(digits))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value, leading zeros dropped.
    pub fn value(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for EpisodeNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of the character table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterLoop {
    pub name: String,
    pub loops: u32,
}

impl CharacterLoop {
    pub fn new(name: impl Into<String>, loops: u32) -> Self {
        Self {
            name: name.into(),
            loops,
        }
    }
}

/// Everything pulled out of one script PDF
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedDocument {
    /// File stem without the `.pdf` extension
    pub filename: String,
    pub episode: Option<EpisodeNumber>,
    pub original_title: Option<String>,
    pub characters: Vec<CharacterLoop>,
    /// "PERSONAJES n" from the script header
    pub declared_character_count: Option<u32>,
    /// "LOOPS n" from the script header
    pub declared_loop_count: Option<u32>,
    /// Sum of every row's loops, wide enough for any number of `u32` rows
    pub computed_loop_total: u64,
}

impl ExtractedDocument {
    /// Builds the document and derives `computed_loop_total` from `characters`.
    pub fn new(
        filename: impl Into<String>,
        episode: Option<EpisodeNumber>,
        original_title: Option<String>,
        characters: Vec<CharacterLoop>,
        declared: DeclaredTotals,
    ) -> Self {
        let computed_loop_total = characters.iter().map(|c| u64::from(c.loops)).sum();
        Self {
            filename: filename.into(),
            episode,
            original_title,
            characters,
            declared_character_count: declared.characters,
            declared_loop_count: declared.loops,
            computed_loop_total,
        }
    }

    /// Soft check of the imported rows against the header totals.
    pub fn consistency(&self) -> ConsistencyReport {
        let imported_characters = self.characters.len();
        ConsistencyReport {
            imported_characters,
            declared_characters: self.declared_character_count,
            characters_match: self
                .declared_character_count
                .map(|declared| declared as usize == imported_characters),
            computed_loops: self.computed_loop_total,
            declared_loops: self.declared_loop_count,
            loops_match: self
                .declared_loop_count
                .map(|declared| u64::from(declared) == self.computed_loop_total),
        }
    }
}

/// Totals declared in the script header, each one optional
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeclaredTotals {
    pub characters: Option<u32>,
    pub loops: Option<u32>,
}

/// Declared vs. computed counts. `None` means the header had no value to compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConsistencyReport {
    pub imported_characters: usize,
    pub declared_characters: Option<u32>,
    pub characters_match: Option<bool>,
    pub computed_loops: u64,
    pub declared_loops: Option<u32>,
    pub loops_match: Option<bool>,
}

impl ConsistencyReport {
    pub fn has_mismatch(&self) -> bool {
        self.characters_match == Some(false) || self.loops_match == Some(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn episode_number_keeps_leading_zeros() {
        let episode = EpisodeNumber::new("007").unwrap();
        assert_eq!(episode.as_str(), "007");
        assert_eq!(episode.value(), Some(7));
        assert_eq!(episode.to_string(), "007");
        assert!(EpisodeNumber::new("").is_none());
        assert!(EpisodeNumber::new("7a").is_none());
    }

    #[test]
    fn computed_total_is_sum_of_loops() {
        let doc = ExtractedDocument::new(
            "Serie_001_x",
            None,
            None,
            vec![CharacterLoop::new("A", 3), CharacterLoop::new("B", 5), CharacterLoop::new("A", 2)],
            DeclaredTotals::default(),
        );
        assert_eq!(doc.computed_loop_total, 10);

        let empty = ExtractedDocument::new("x", None, None, Vec::new(), DeclaredTotals::default());
        assert_eq!(empty.computed_loop_total, 0);
    }

    #[test]
    fn computed_total_does_not_wrap() {
        let doc = ExtractedDocument::new(
            "x",
            None,
            None,
            vec![CharacterLoop::new("A", 4_000_000_000), CharacterLoop::new("B", 4_000_000_000)],
            DeclaredTotals {
                characters: None,
                loops: Some(u32::MAX),
            },
        );
        assert_eq!(doc.computed_loop_total, 8_000_000_000);
        assert_eq!(doc.consistency().loops_match, Some(false));
    }

    #[test]
    fn consistency_flags_only_declared_mismatches() {
        let doc = ExtractedDocument::new(
            "x",
            None,
            None,
            vec![CharacterLoop::new("A", 3), CharacterLoop::new("B", 5)],
            DeclaredTotals {
                characters: Some(2),
                loops: Some(9),
            },
        );
        let report = doc.consistency();
        assert_eq!(report.characters_match, Some(true));
        assert_eq!(report.loops_match, Some(false));
        assert!(report.has_mismatch());

        let undeclared = ExtractedDocument::new("x", None, None, Vec::new(), DeclaredTotals::default());
        let report = undeclared.consistency();
        assert_eq!(report.characters_match, None);
        assert!(!report.has_mismatch());
    }
}
