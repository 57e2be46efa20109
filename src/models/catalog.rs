//! Catalog-side records: scraped listing rows, candidate questions and
//! validated matches.

use crate::utils::text::compact_spaces;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// One raw row scraped from the admin listing table.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRow {
    pub code: String,
    #[serde(rename = "desc")]
    pub description: String,
    #[serde(rename = "esp")]
    pub specialty: String,
}

/// A catalog question reconstructed from a listing row's description
/// cell. Built fresh per row, never persisted.
#[derive(Debug, Clone)]
pub struct CandidateRecord {
    pub code: String,
    pub statement: String,
    pub choices: BTreeMap<char, String>,
    pub is_direct_access: bool,
    pub specialty: String,
}

fn choice_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-E])[).\-]\s*(.+)$").unwrap())
}

fn binary_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(A|B)[).\-]\s*(CERTO|ERRADO)\.?\s*$").unwrap())
}

impl CandidateRecord {
    /// Parses the listing cell text: leading "(...)" tag lines are
    /// dropped, `A) ...` lines become choices, everything before the
    /// first choice line is the statement. The ACESSO DIRETO flag is
    /// read from the first three lines. Returns `None` when the row
    /// has no usable statement or fewer than two choices.
    pub fn from_listing(code: &str, description: &str, specialty: &str) -> Option<Self> {
        let mut lines: Vec<&str> = description
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let is_direct_access = lines
            .iter()
            .take(3)
            .any(|l| l.to_uppercase().contains("ACESSO DIRETO"));

        while lines
            .first()
            .map(|l| l.starts_with('(') && l.ends_with(')'))
            .unwrap_or(false)
        {
            lines.remove(0);
        }

        let mut choices: BTreeMap<char, String> = BTreeMap::new();
        let mut statement_parts: Vec<&str> = Vec::new();
        let mut in_choices = false;

        for line in lines {
            if let Some(caps) = binary_line_re().captures(line) {
                in_choices = true;
                let letter = caps[1].to_uppercase().chars().next().unwrap_or('A');
                choices.insert(letter, caps[2].to_uppercase());
                continue;
            }
            if let Some(caps) = choice_line_re().captures(line) {
                in_choices = true;
                let letter = caps[1].chars().next().unwrap_or('A');
                choices.insert(letter, compact_spaces(&caps[2]));
                continue;
            }
            if !in_choices {
                statement_parts.push(line);
            }
        }

        let statement = compact_spaces(&statement_parts.join(" "));
        if statement.is_empty() || choices.len() < 2 {
            return None;
        }

        Some(Self {
            code: code.to_string(),
            statement,
            choices,
            is_direct_access,
            specialty: specialty.to_string(),
        })
    }
}

/// Confidence tier of an accepted match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn log_tag(&self) -> &'static str {
        match self {
            Confidence::High => "✅ ALTA",
            Confidence::Medium => "🟡 MEDIA",
            Confidence::Low => "⚠️ BAIXA",
        }
    }
}

/// An accepted match, ready for ranking by the search flow.
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub code: String,
    pub statement_score: i32,
    pub confirmed_choices: usize,
    pub confidence: Confidence,
    pub is_direct_access: bool,
    pub specialty: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_parse_splits_statement_and_choices() {
        let desc = "(Inativa)\nACESSO DIRETO\nMulher de 30 anos com dispneia\naos esforços.\nA) Asma\nB) DPOC\nC) Embolia pulmonar";
        let c = CandidateRecord::from_listing("Q123", desc, "Pneumologia").unwrap();
        assert!(c.is_direct_access);
        assert_eq!(
            c.statement,
            "ACESSO DIRETO Mulher de 30 anos com dispneia aos esforços."
        );
        assert_eq!(c.choices.len(), 3);
        assert_eq!(c.choices[&'B'], "DPOC");
        assert_eq!(c.specialty, "Pneumologia");
    }

    #[test]
    fn listing_parse_normalizes_binary_lines() {
        let desc = "Sepse neonatal precoce ocorre nas primeiras 72 horas.\nA) certo.\nB- ERRADO";
        let c = CandidateRecord::from_listing("Q9", desc, "").unwrap();
        assert!(!c.is_direct_access);
        assert_eq!(c.choices[&'A'], "CERTO");
        assert_eq!(c.choices[&'B'], "ERRADO");
    }

    #[test]
    fn listing_parse_rejects_rows_without_choices() {
        assert!(CandidateRecord::from_listing("Q1", "Só enunciado, sem alternativas", "").is_none());
        assert!(CandidateRecord::from_listing("Q2", "", "").is_none());
    }
}
