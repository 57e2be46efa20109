//! Questions parsed out of the booklet.

use std::collections::{BTreeMap, BTreeSet};

/// How a question is routed in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    /// The block carries the "ACESSO DIRETO" marker.
    DirectAccess,
    /// Anything else: a specialty question.
    Specialty,
}

impl QuestionKind {
    /// Category label used in the output CSV lines.
    pub fn category_label(&self) -> &'static str {
        match self {
            QuestionKind::DirectAccess => "ACESSO DIRETO",
            QuestionKind::Specialty => "ESP",
        }
    }

    /// Short tag for log lines.
    pub fn log_tag(&self) -> &'static str {
        match self {
            QuestionKind::DirectAccess => "🔵 AD",
            QuestionKind::Specialty => "⚪ ESP",
        }
    }

    pub fn is_direct_access(&self) -> bool {
        matches!(self, QuestionKind::DirectAccess)
    }
}

/// One question extracted from the booklet: statement plus lettered
/// choices, with the raw block kept for diagnostics.
#[derive(Debug, Clone)]
pub struct ParsedQuestion {
    /// Leading number from the source, when present.
    pub number: Option<u32>,
    pub kind: QuestionKind,
    /// Whitespace-normalized statement text.
    pub statement: String,
    /// Letter (A–E) to choice text. At most one value per letter.
    pub choices: BTreeMap<char, String>,
    /// The original block, untouched.
    pub raw_text: String,
}

impl ParsedQuestion {
    /// CERTO/ERRADO (true/false) question: the A/B values carry one of
    /// the two binary words.
    pub fn is_binary(&self) -> bool {
        if self.choices.is_empty() {
            return false;
        }
        let joined = format!(
            "{} {}",
            self.choices.get(&'A').map(String::as_str).unwrap_or(""),
            self.choices.get(&'B').map(String::as_str).unwrap_or("")
        )
        .to_uppercase();
        joined.contains("CERTO") || joined.contains("ERRADO")
    }

    /// Number of distinct non-empty choice texts. Duplicated values
    /// (from reallocated letters) count once.
    pub fn distinct_choice_count(&self) -> usize {
        self.choices
            .values()
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .collect::<BTreeSet<_>>()
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(choices: &[(char, &str)]) -> ParsedQuestion {
        ParsedQuestion {
            number: Some(1),
            kind: QuestionKind::Specialty,
            statement: String::new(),
            choices: choices
                .iter()
                .map(|(l, v)| (*l, v.to_string()))
                .collect(),
            raw_text: String::new(),
        }
    }

    #[test]
    fn binary_detection_reads_a_and_b() {
        assert!(question(&[('A', "CERTO"), ('B', "ERRADO")]).is_binary());
        assert!(question(&[('A', "Certo.")]).is_binary());
        assert!(!question(&[('A', "Dieta"), ('B', "Cirurgia")]).is_binary());
        assert!(!question(&[]).is_binary());
    }

    #[test]
    fn distinct_count_ignores_duplicate_values() {
        let q = question(&[('A', "x"), ('B', "x"), ('C', "y"), ('D', "  ")]);
        assert_eq!(q.distinct_choice_count(), 2);
    }
}
