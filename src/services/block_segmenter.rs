//! Splits the extracted page range into one raw block per question.
//!
//! A block starts at any line that leads with "N." numbering. Repeated
//! numbers are kept as independent blocks, in document order; callers
//! downstream decide what to do with them.

use regex::Regex;
use std::sync::OnceLock;

/// Marker inserted before every detected question start; chosen so it
/// cannot occur in booklet text.
const BLOCK_DELIMITER: &str = "@@QSTART@@";

fn numbering_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*(\d+)\s*\.\s*").unwrap())
}

fn block_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.\s").unwrap())
}

/// Splits raw range text into question blocks. Fragments that do not
/// start with "N. " after trimming are false positives (numbers inside
/// prose) and are dropped.
pub fn split_blocks(text: &str) -> Vec<String> {
    let marked = numbering_line_re().replace_all(text, format!("\n{BLOCK_DELIMITER}${{1}}. "));

    marked
        .split(BLOCK_DELIMITER)
        .map(str::trim)
        .filter(|p| !p.is_empty() && block_prefix_re().is_match(p))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_leading_numbering() {
        let text = "1. Primeira questão\ncom duas linhas\n2. Segunda questão\n";
        let blocks = split_blocks(text);
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with("1. Primeira"));
        assert!(blocks[0].contains("duas linhas"));
        assert!(blocks[1].starts_with("2. Segunda"));
    }

    #[test]
    fn tolerates_space_between_number_and_period() {
        let blocks = split_blocks(" 3 . Terceira questão\n");
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].starts_with("3. Terceira"));
    }

    #[test]
    fn repeated_numbers_stay_as_independent_blocks() {
        let blocks = split_blocks("14. Uma vez\n14. Outra vez\n");
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].contains("Uma vez"));
        assert!(blocks[1].contains("Outra vez"));
    }

    #[test]
    fn numbers_inside_prose_do_not_start_blocks() {
        let text = "1. Enunciado com valor 3.5 no meio\ne mais texto\n";
        let blocks = split_blocks(text);
        assert_eq!(blocks.len(), 1);
    }
}
