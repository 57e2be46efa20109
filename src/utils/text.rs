//! Text normalization and fuzzy scoring.
//!
//! Two normalizations feed every comparison: a plain one (lowercase,
//! accents folded, punctuation dropped) and a stricter one that also
//! strips instructional filler and standalone numbers. Scores are
//! 0–100 integers.

use deunicode::deunicode;
use rapidfuzz::fuzz;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Filler phrases removed by the comparison normalization. These are
/// exam-instruction words that carry no matching signal.
static FILLER_PHRASES: &[&str] = &[
    "lembre se",
    "lembrese",
    "observe",
    "considere",
    "assinale",
    "marque",
    "indique",
    "dessa forma",
    "nesse caso",
    "diante disso",
    "portanto",
    "logo",
    "assim",
    "correta",
    "incorreta",
    "verdadeira",
    "falsa",
    "correto",
    "incorreto",
];

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

fn non_alnum_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9\s]").unwrap())
}

fn standalone_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\d+\b").unwrap())
}

/// Collapses runs of whitespace to single spaces and trims.
pub fn compact_spaces(s: &str) -> String {
    whitespace_re().replace_all(s, " ").trim().to_string()
}

/// Plain normalization: lowercase, accents folded to ASCII, anything
/// that is not a letter, digit or space dropped, whitespace collapsed.
pub fn normalize_text(s: &str) -> String {
    let s = deunicode(&s.to_lowercase());
    let s = non_alnum_re().replace_all(&s, " ");
    compact_spaces(&s)
}

/// Comparison normalization: [`normalize_text`] plus filler-phrase and
/// standalone-number removal.
pub fn normalize_for_comparison(s: &str) -> String {
    let mut s = normalize_text(s);
    for phrase in FILLER_PHRASES {
        s = s.replace(phrase, " ");
    }
    let s = standalone_number_re().replace_all(&s, "");
    compact_spaces(&s)
}

/// Plain similarity ratio. `fuzz::ratio` is normalized to [0, 1];
/// the matcher thresholds are written against 0–100 integers.
pub fn ratio(a: &str, b: &str) -> i32 {
    (fuzz::ratio(a.chars(), b.chars()) * 100.0) as i32
}

/// Token-set similarity: compares the sorted word-set intersection
/// against each side's remainder, robust to word order and repetition.
pub fn token_set_ratio(a: &str, b: &str) -> i32 {
    let set_a: BTreeSet<&str> = a.split_whitespace().collect();
    let set_b: BTreeSet<&str> = b.split_whitespace().collect();
    if set_a.is_empty() || set_b.is_empty() {
        return if set_a == set_b { 100 } else { 0 };
    }

    let common: Vec<&str> = set_a.intersection(&set_b).copied().collect();
    let only_a: Vec<&str> = set_a.difference(&set_b).copied().collect();
    let only_b: Vec<&str> = set_b.difference(&set_a).copied().collect();

    let base = common.join(" ");
    let left = join_parts(&base, &only_a);
    let right = join_parts(&base, &only_b);

    ratio(&base, &left)
        .max(ratio(&base, &right))
        .max(ratio(&left, &right))
}

fn join_parts(base: &str, rest: &[&str]) -> String {
    if rest.is_empty() {
        base.to_string()
    } else if base.is_empty() {
        rest.join(" ")
    } else {
        format!("{} {}", base, rest.join(" "))
    }
}

/// Substring-tolerant similarity: the shorter text is slid across the
/// longer one in word-aligned windows of its own length, and the best
/// window ratio wins. Whole-string ratio is included so the result is
/// never below [`ratio`].
pub fn partial_ratio(a: &str, b: &str) -> i32 {
    let (short, long) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    if short.is_empty() {
        return if long.is_empty() { 100 } else { 0 };
    }

    let short_chars: Vec<char> = short.chars().collect();
    let long_chars: Vec<char> = long.chars().collect();
    let window = short_chars.len();

    let mut best = char_ratio(&short_chars, &long_chars);
    if window >= long_chars.len() {
        return best;
    }

    let mut starts = vec![0usize];
    for (i, c) in long_chars.iter().enumerate() {
        if c.is_whitespace() && i + 1 < long_chars.len() {
            starts.push(i + 1);
        }
    }
    for &start in &starts {
        let end = (start + window).min(long_chars.len());
        best = best.max(char_ratio(&short_chars, &long_chars[start..end]));
        if best >= 100 {
            break;
        }
    }
    best
}

fn char_ratio(a: &[char], b: &[char]) -> i32 {
    (fuzz::ratio(a.iter().copied(), b.iter().copied()) * 100.0) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_spaces_collapses_runs() {
        assert_eq!(compact_spaces("  a \n  b\t c  "), "a b c");
    }

    #[test]
    fn normalize_text_folds_accents_and_punctuation() {
        assert_eq!(
            normalize_text("Paciente, 45 anos, com CEFALÉIA súbita!"),
            "paciente 45 anos com cefaleia subita"
        );
    }

    #[test]
    fn comparison_normalization_drops_filler_and_numbers() {
        let n = normalize_for_comparison("Assinale a alternativa correta sobre os 3 casos");
        assert!(!n.contains("assinale"));
        assert!(!n.contains("correta"));
        assert!(!n.contains('3'));
        assert!(n.contains("casos"));
    }

    #[test]
    fn ratio_is_on_the_percent_scale() {
        assert_eq!(ratio("certo", "certo"), 100);
        assert_eq!(ratio("abcd", "abce"), 75);
        assert_eq!(ratio("abc", "xyz"), 0);
    }

    #[test]
    fn token_set_is_reflexive() {
        let s = "quadro de dor abdominal difusa com febre";
        assert_eq!(token_set_ratio(s, s), 100);
    }

    #[test]
    fn token_set_ignores_word_order() {
        assert_eq!(
            token_set_ratio("febre e dor abdominal", "dor abdominal e febre"),
            100
        );
    }

    #[test]
    fn partial_ratio_finds_embedded_excerpt() {
        let long = "mulher de 32 anos procura atendimento com dor pelvica ciclica ha dois anos sem melhora";
        let short = "dor pelvica ciclica ha dois anos";
        assert_eq!(partial_ratio(short, long), 100);
    }

    #[test]
    fn partial_ratio_empty_inputs() {
        assert_eq!(partial_ratio("", ""), 100);
        assert_eq!(partial_ratio("", "abc"), 0);
    }
}
