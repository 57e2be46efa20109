//! Search-query generation.
//!
//! A single statement rarely matches the catalog on the first try:
//! OCR noise, truncated prefixes and filler words all get in the way.
//! So each question yields a ladder of queries, from the most literal
//! (word prefixes of the statement) down to aggressive reductions
//! (stopword-filtered tokens, longest-token pairs, sliding windows).
//! Priorities keep the literal forms first; the searcher walks the
//! ladder in order and stops as soon as a match validates.

use crate::config::QueryLimits;
use deunicode::deunicode;
use phf::phf_set;
use regex::Regex;
use std::cmp::Reverse;
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::utils::text::compact_spaces;

/// Words that carry no discriminating power in exam statements.
/// ASCII forms only: the tokens are folded before filtering, so the
/// accented variants (à, às) collapse into these.
static STOPWORDS: phf::Set<&'static str> = phf_set! {
    "a", "o", "os", "as", "um", "uma", "uns", "umas",
    "de", "do", "da", "dos", "das",
    "em", "no", "na", "nos", "nas",
    "e", "ou", "para", "por", "com", "sem", "ao", "aos",
    "que", "qual", "quais", "quando", "onde", "como",
    "assinale", "marque", "indique",
    "alternativa", "correta", "incorreta", "errada",
    "sobre", "respeito", "relacao", "relacionada",
    "paciente",
};

fn generic_opening_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(mulher|homem)\s+de\s+\d+\s+anos?\s*,?\s*").unwrap())
}

fn paren_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\([^)]*\)").unwrap())
}

fn punctuation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s]").unwrap())
}

fn number_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\d+([.,]\d+)?\b").unwrap())
}

fn non_letter_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z\s]").unwrap())
}

/// Anchors that usually open the clinically distinctive span of a
/// statement; the captured span makes a tight mid-statement query.
fn clinical_pattern_res() -> &'static [Regex] {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| {
        [
            r"(?i)(dor abdominal [a-zà-ÿ]{4,15})",
            r"(?i)(exames realizados [a-zà-ÿ\s]{0,20}com)",
            r"(?i)(foi admitido [a-zà-ÿ\s]{0,20}com)",
            r"(?i)(procura [a-zà-ÿ\s]{0,15}para)",
        ]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
    })
}

/// One candidate query. Lower priority runs earlier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub priority: u8,
}

pub struct QueryBuilder {
    limits: QueryLimits,
}

impl QueryBuilder {
    pub fn new(limits: QueryLimits) -> Self {
        Self { limits }
    }

    /// A query of few words matches half the catalog; those get wider
    /// paging budgets but lower row counts per page downstream.
    pub fn is_generic(&self, query: &str) -> bool {
        query.split_whitespace().count() <= self.limits.generic_max_words
    }

    /// Builds the full ladder for a statement, deduplicated and
    /// stably ordered by priority.
    pub fn build(&self, statement: &str) -> Vec<SearchQuery> {
        let statement = compact_spaces(statement);
        let mut queries: Vec<SearchQuery> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        let mut add = |text: String, priority: u8, queries: &mut Vec<SearchQuery>| {
            let text = compact_spaces(&text);
            if text.is_empty() || !seen.insert(text.clone()) {
                return;
            }
            let text: String = text.chars().take(self.limits.max_query_chars).collect();
            queries.push(SearchQuery {
                text: text.trim_end().to_string(),
                priority,
            });
        };

        let word_count = statement.split_whitespace().count();

        // Literal prefixes of the statement as written. Prefixes longer
        // than the statement would all collapse into the same query, so
        // each length only fires when there are enough words for it.
        for n in [12usize, 10, 8, 6] {
            if word_count >= n {
                add(word_prefix(&statement, n), 1, &mut queries);
            }
        }

        // "Mulher de 34 anos, ..." openings are shared by hundreds of
        // questions; the text after them is where the signal starts.
        let degenerified = generic_opening_re().replace(&statement, "").into_owned();
        if degenerified != statement {
            let degenerified_words = degenerified.split_whitespace().count();
            for n in [12usize, 10, 8] {
                if degenerified_words >= n {
                    add(word_prefix(&degenerified, n), 1, &mut queries);
                }
            }
        }

        // One query per matching anchor: a statement can carry several
        // distinctive spans and each is worth a shot.
        for re in clinical_pattern_res() {
            if let Some(c) = re.captures(&statement) {
                let span = c[1].to_string();
                if span.split_whitespace().count() >= 2 {
                    add(span, 2, &mut queries);
                }
            }
        }

        if word_count <= 25 {
            add(statement.clone(), 3, &mut queries);
        }

        if self.limits.remove_paren_content && statement.contains('(') {
            let without_parens = paren_re().replace_all(&statement, " ").into_owned();
            let without_parens = compact_spaces(&without_parens);
            if without_parens != statement {
                add(without_parens, 3, &mut queries);
            }
        }

        let ascii = deunicode(&statement);
        if ascii != statement {
            let ascii_words = ascii.split_whitespace().count();
            for n in [10usize, 8] {
                if ascii_words >= n {
                    add(word_prefix(&ascii, n), 3, &mut queries);
                }
            }
        }

        let depunctuated = punctuation_re().replace_all(&statement, "").into_owned();
        if depunctuated != statement {
            let depunct_words = depunctuated.split_whitespace().count();
            for n in [10usize, 8] {
                if depunct_words >= n {
                    add(word_prefix(&depunctuated, n), 4, &mut queries);
                }
            }
        }

        let tokens = content_tokens(&statement);
        let joined = tokens.join(" ");
        for n in [10usize, 8, 6] {
            if tokens.len() >= n {
                add(word_prefix(&joined, n), 5, &mut queries);
            }
        }

        // Pairs and triples of the longest content tokens: survives
        // heavy OCR damage as long as the rare words are intact.
        let mut by_length: Vec<&String> =
            tokens.iter().filter(|t| t.len() >= 6).collect();
        by_length.sort_by_key(|t| Reverse(t.len()));
        for n in [2usize, 3] {
            if by_length.len() >= n {
                let picked: Vec<&str> =
                    by_length.iter().take(n).map(|t| t.as_str()).collect();
                add(picked.join(" "), 5, &mut queries);
            }
        }

        // Short windows centered on the first few long tokens.
        let all_words: Vec<&str> = statement.split_whitespace().collect();
        let anchors: Vec<usize> = all_words
            .iter()
            .enumerate()
            .filter(|(_, w)| w.chars().count() >= 8)
            .map(|(i, _)| i)
            .take(3)
            .collect();
        for &i in &anchors {
            for win in [5usize, 4] {
                let a = i.saturating_sub(win / 2);
                let b = (a + win).min(all_words.len());
                if b - a >= 3 {
                    add(all_words[a..b].join(" "), 5, &mut queries);
                }
            }
        }

        for n in [18usize, 16] {
            if word_count >= n {
                add(word_prefix(&statement, n), 6, &mut queries);
            }
        }

        if word_count >= 20 {
            let mid = word_count / 2;
            let a = mid.saturating_sub(6);
            let b = (mid + 6).min(all_words.len());
            add(all_words[a..b].join(" "), 6, &mut queries);
        }

        if word_count >= 10 {
            let a = word_count - 10;
            add(all_words[a..].join(" "), 6, &mut queries);
        }

        queries.sort_by_key(|q| q.priority);
        queries
    }
}

fn word_prefix(text: &str, n: usize) -> String {
    text.split_whitespace().take(n).collect::<Vec<_>>().join(" ")
}

/// ASCII-folded, lowercased, stripped of numbers, punctuation and
/// stopwords. What remains is the clinical vocabulary.
fn content_tokens(statement: &str) -> Vec<String> {
    let ascii = deunicode(statement).replace('-', " ");
    let no_numbers = number_token_re().replace_all(&ascii, " ");
    let letters_only = non_letter_re().replace_all(&no_numbers, " ");
    letters_only
        .to_lowercase()
        .split_whitespace()
        .filter(|w| !STOPWORDS.contains(*w))
        .map(|w| w.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> QueryBuilder {
        QueryBuilder::new(QueryLimits::default())
    }

    const STATEMENT: &str = "Mulher de 34 anos, procura ambulatório para \
avaliação de dor pélvica cíclica intensa há dois anos, com piora progressiva \
e sem resposta a analgésicos comuns (dipirona e ibuprofeno).";

    #[test]
    fn literal_prefix_comes_first() {
        let queries = builder().build(STATEMENT);
        assert_eq!(queries[0].priority, 1);
        assert!(queries[0].text.starts_with("Mulher de 34 anos, procura"));
        assert_eq!(queries[0].text.split_whitespace().count(), 12);
    }

    #[test]
    fn generic_opening_is_stripped_in_secondary_prefixes() {
        let queries = builder().build(STATEMENT);
        assert!(queries
            .iter()
            .any(|q| q.priority == 1 && q.text.starts_with("procura ambulatório")));
    }

    #[test]
    fn clinical_pattern_yields_a_priority_two_query() {
        let queries = builder().build(STATEMENT);
        let clinical = queries.iter().find(|q| q.priority == 2).unwrap();
        assert!(clinical.text.to_lowercase().starts_with("procura"));
        assert!(clinical.text.to_lowercase().ends_with("para"));
    }

    #[test]
    fn paren_content_is_removed_in_a_variant() {
        let queries = builder().build(STATEMENT);
        assert!(queries
            .iter()
            .any(|q| q.priority == 3 && q.text.ends_with("analgésicos comuns .")));
    }

    #[test]
    fn every_matching_anchor_pattern_yields_a_query() {
        let s = "Paciente com dor abdominal persistente foi avaliado e \
procura atendimento para investigação.";
        let queries = builder().build(s);
        let spans: Vec<&str> = queries
            .iter()
            .filter(|q| q.priority == 2)
            .map(|q| q.text.as_str())
            .collect();
        assert_eq!(spans.len(), 2);
        assert!(spans.iter().any(|t| t.starts_with("dor abdominal")));
        assert!(spans.iter().any(|t| t.starts_with("procura")));
    }

    #[test]
    fn short_statements_skip_oversized_prefixes() {
        let s = "Gestante apresenta pressão arterial elevada em consulta.";
        let queries = builder().build(s);
        assert!(queries
            .iter()
            .all(|q| q.text.split_whitespace().count() <= 7));
        let p1: Vec<_> = queries.iter().filter(|q| q.priority == 1).collect();
        assert_eq!(p1.len(), 1);
        assert_eq!(p1[0].text.split_whitespace().count(), 6);
    }

    #[test]
    fn stopword_filter_keeps_only_content_vocabulary() {
        let tokens = content_tokens("Assinale a alternativa correta sobre a relação dos anos");
        assert_eq!(tokens, vec!["anos".to_string()]);
    }

    #[test]
    fn duplicates_collapse_and_order_is_stable() {
        let short = "Icterícia neonatal precoce exige investigação imediata.";
        let queries = builder().build(short);
        let mut texts: Vec<&str> = queries.iter().map(|q| q.text.as_str()).collect();
        let before = texts.len();
        texts.dedup();
        assert_eq!(texts.len(), before);
        assert!(queries.windows(2).all(|w| w[0].priority <= w[1].priority));
    }

    #[test]
    fn longest_token_pairs_are_emitted() {
        let queries = builder().build(STATEMENT);
        assert!(queries.iter().any(|q| {
            q.priority == 5 && q.text.split_whitespace().count() == 2
        }));
    }

    #[test]
    fn generic_detection_uses_word_count() {
        let b = builder();
        assert!(b.is_generic("dor pélvica"));
        assert!(!b.is_generic("dor pélvica cíclica"));
    }
}
