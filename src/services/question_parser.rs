//! Turns a raw block into a [`ParsedQuestion`].
//!
//! The pipeline per block: leading number, ACESSO DIRETO
//! classification, boilerplate stripping, choices-region detection
//! (three fallback strategies, tried in order), then statement
//! cleanup and choice extraction. Blocks that fail validation are
//! skipped with a reason, never fatally.

use crate::config::MatchThresholds;
use crate::error::SkipReason;
use crate::models::question::{ParsedQuestion, QuestionKind};
use crate::services::choice_extractor::extract_choices;
use crate::utils::text::compact_spaces;
use regex::Regex;
use std::sync::OnceLock;
use tracing::warn;

fn leading_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\d+)\s*\.\s").unwrap())
}

fn strip_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*\d+\.\s*").unwrap())
}

fn access_direct_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Everything up to "ACESSO DIRETO." is exam-source boilerplate.
    RE.get_or_init(|| Regex::new(r"(?is)^.*?\bACESSO\s+DIRETO\b\s*\.\s*").unwrap())
}

fn citation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Uppercase run + 4-digit year + text to the next period: the exam
    // citation line. Deliberately permissive; it can eat a statement
    // that opens with an acronym and a number, and stays that way.
    RE.get_or_init(|| Regex::new(r"^[A-Z\-\s0-9]+\d{4}.*?\.\s*").unwrap())
}

fn access_direct_word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bacesso\s+direto\b").unwrap())
}

fn choices_after_break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:\r?\n)\s*(?:[A-E][).]\s*|[A-E]\s*-\s*)").unwrap())
}

fn choices_inline_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Lost line break: " B. Alternativa" glued to the statement.
    RE.get_or_init(|| Regex::new(r"\s+[A-E][).]\s+[A-ZÀ-ÖØ-Þ]").unwrap())
}

fn choices_binary_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\s*[A-E][).]\s*(?:CERTO|ERRADO)").unwrap())
}

/// Block-to-question parser; thresholds drive only the validation.
pub struct QuestionParser {
    min_words_statement: usize,
}

/// Outcome of parsing a whole block list: questions grouped by kind
/// (direct-access first downstream) and the skipped blocks.
#[derive(Debug, Default)]
pub struct ParsedBatch {
    pub direct_access: Vec<ParsedQuestion>,
    pub specialty: Vec<ParsedQuestion>,
    pub skipped: Vec<(Option<u32>, SkipReason)>,
}

impl QuestionParser {
    pub fn new(thresholds: &MatchThresholds) -> Self {
        Self {
            min_words_statement: thresholds.min_words_statement,
        }
    }

    /// Parses one raw block. Always succeeds structurally; validation
    /// is separate so callers can observe malformed questions.
    pub fn parse_block(&self, block: &str) -> ParsedQuestion {
        let raw_text = block.trim().to_string();

        let number = leading_number_re()
            .captures(&raw_text)
            .and_then(|c| c[1].parse::<u32>().ok());

        let kind = if raw_text.to_lowercase().contains("acesso direto") {
            QuestionKind::DirectAccess
        } else {
            QuestionKind::Specialty
        };

        let text = strip_number_re().replace(&raw_text, "").into_owned();
        let text = access_direct_header_re().replace(&text, "").into_owned();
        let text = citation_re().replace(&text, "").into_owned();

        let (statement_part, choices_region) = match choices_region_start(&text) {
            Some(index) => (
                &text[..index],
                format!("\n{}", text[index..].trim()),
            ),
            None => (text.as_str(), String::new()),
        };

        let statement =
            compact_spaces(&access_direct_word_re().replace_all(statement_part, ""));
        let choices = extract_choices(&choices_region);

        ParsedQuestion {
            number,
            kind,
            statement,
            choices,
            raw_text,
        }
    }

    /// Validation applied after parsing: statements below the word
    /// floor and questions without enough choices (unless they are
    /// CERTO/ERRADO binaries) are skipped.
    pub fn validate(&self, question: &ParsedQuestion) -> Result<(), SkipReason> {
        let words = question.statement.split_whitespace().count();
        if words < self.min_words_statement {
            return Err(SkipReason::StatementTooShort { words });
        }
        let choices = question.choices.len();
        if choices < 3 && !(choices >= 2 && question.is_binary()) {
            return Err(SkipReason::TooFewChoices { choices });
        }
        Ok(())
    }

    /// Parses and validates every block, splitting the survivors by
    /// kind and keeping the skip reasons for the run report.
    pub fn parse_all(&self, blocks: &[String]) -> ParsedBatch {
        let mut batch = ParsedBatch::default();
        for block in blocks {
            let question = self.parse_block(block);
            match self.validate(&question) {
                Ok(()) => match question.kind {
                    QuestionKind::DirectAccess => batch.direct_access.push(question),
                    QuestionKind::Specialty => batch.specialty.push(question),
                },
                Err(reason) => {
                    let label = question
                        .number
                        .map_or_else(|| "?".to_string(), |n| format!("Q{}", n));
                    warn!("⚠️ bloco {} descartado: {}", label, reason);
                    batch.skipped.push((question.number, reason));
                }
            }
        }
        batch
    }
}

/// Start of the choices region, by the first of three strategies that
/// matches: letter marker after a line break; inline marker followed
/// by an uppercase letter (lost line break); marker glued to
/// CERTO/ERRADO (binary questions). Order matters.
fn choices_region_start(text: &str) -> Option<usize> {
    let strategies = [choices_after_break_re(), choices_inline_re(), choices_binary_re()];
    strategies
        .iter()
        .find_map(|re| re.find(text).map(|m| m.start()))
}
