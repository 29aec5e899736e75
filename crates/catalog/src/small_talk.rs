use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use safar_core::SmallTalkEntry;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct SmallTalkTable {
    entries: Vec<SmallTalkEntry>,
}

impl SmallTalkTable {
    pub fn new(entries: Vec<SmallTalkEntry>) -> Self {
        Self { entries }
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed opening small talk table: {}", path.display()))?;
        let table = Self::from_reader(file)
            .with_context(|| format!("failed loading small talk table: {}", path.display()))?;

        info!(path = %path.display(), entries = table.len(), "small talk table loaded");
        Ok(table)
    }

    /// Expects the header `question,response`.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let entries = csv_reader
            .deserialize::<SmallTalkEntry>()
            .enumerate()
            .map(|(idx, row)| row.with_context(|| format!("malformed small talk row at line {}", idx + 2)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { entries })
    }

    /// First response whose question equals `text`, ignoring case and
    /// surrounding whitespace.
    pub fn respond(&self, text: &str) -> Option<&str> {
        let wanted = text.trim().to_lowercase();
        self.entries
            .iter()
            .find(|entry| entry.question.to_lowercase() == wanted)
            .map(|entry| entry.response.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
question,response
How are you,\"I'm doing great, thanks for asking!\"
Tell me a joke,Why did the plane get sent to its room? Bad altitude.
how are you,duplicate that is never reached
";

    #[test]
    fn matches_exact_question_ignoring_case() {
        let table = SmallTalkTable::from_reader(CSV.as_bytes()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.respond("HOW ARE YOU "),
            Some("I'm doing great, thanks for asking!")
        );
    }

    #[test]
    fn partial_questions_do_not_match() {
        let table = SmallTalkTable::from_reader(CSV.as_bytes()).unwrap();
        assert_eq!(table.respond("how are you today"), None);
        assert_eq!(table.respond(""), None);
    }
}
