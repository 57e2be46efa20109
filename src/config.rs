//! Application configuration.
//!
//! Every threshold and cap the matching engine uses lives here and is
//! injected into the components at construction. Values come from the
//! defaults, an optional `config.toml`, or environment overrides for
//! the operational fields.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Similarity thresholds for statement and choice validation.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MatchThresholds {
    /// Minimum statement length, in words, for a block to count as a
    /// question at all.
    pub min_words_statement: usize,
    /// Statement gate: best token-set score.
    pub statement_token_set: i32,
    /// Statement gate: best partial score.
    pub statement_partial: i32,
    /// Statement gate: token-set score under the filler-stripped
    /// normalization.
    pub statement_filler_token_set: i32,
    /// Choice confirmation: best token-set score.
    pub choice_token_set: i32,
    /// Choice confirmation: best partial score.
    pub choice_partial: i32,
    /// Choice confirmation: filler-stripped token-set score.
    pub choice_filler_token_set: i32,
    /// CERTO/ERRADO questions accept with one confirmed choice once
    /// the statement reaches this score.
    pub binary_min_statement: i32,
    /// Statement score that lets a question pass with one fewer
    /// confirmed choice (questions with up to four choices).
    pub near_statement: i32,
    /// Same relaxation for five-choice questions.
    pub near_statement_many: i32,
    /// Conservative fallback: up to four choices, one confirmed.
    pub fallback_small_set: i32,
    /// Conservative fallback: any size, two confirmed.
    pub fallback_high_statement: i32,
    /// High confidence: statement score and confirmed-choice ratio.
    pub high_min_statement: i32,
    pub high_min_ratio: f64,
    /// Medium confidence: statement score and confirmed-choice ratio.
    pub medium_min_statement: i32,
    pub medium_min_ratio: f64,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            min_words_statement: 4,
            statement_token_set: 85,
            statement_partial: 88,
            statement_filler_token_set: 82,
            choice_token_set: 80,
            choice_partial: 83,
            choice_filler_token_set: 78,
            binary_min_statement: 80,
            near_statement: 83,
            near_statement_many: 86,
            fallback_small_set: 88,
            fallback_high_statement: 92,
            high_min_statement: 90,
            high_min_ratio: 0.75,
            medium_min_statement: 80,
            medium_min_ratio: 0.70,
        }
    }
}

/// Query generation limits.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct QueryLimits {
    /// Hard cap on a single query's length in characters.
    pub max_query_chars: usize,
    /// Also emit a variant of the full statement with parenthetical
    /// content removed.
    pub remove_paren_content: bool,
    /// Queries of at most this many words are "generic" and get the
    /// larger paging budget.
    pub generic_max_words: usize,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            max_query_chars: 1400,
            remove_paren_content: true,
            generic_max_words: 2,
        }
    }
}

/// Paging, row and early-stop budgets for the per-question search.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SearchLimits {
    pub max_queries_per_question: usize,
    pub max_pages_generic: u32,
    pub max_pages_specific: u32,
    pub rows_per_page_generic: usize,
    pub rows_per_page_specific: usize,
    /// Once this many distinct codes have been inspected and a Medium
    /// candidate exists, stop paging for the question.
    pub max_seen_codes: usize,
    /// Return the best Medium candidate as soon as it clears the
    /// score/ratio bar below.
    pub early_stop_good_medium: bool,
    pub medium_early_min_statement: i32,
    pub medium_early_min_ratio: f64,
    /// Within the first N queries, any Medium at or above the score
    /// below is returned immediately.
    pub quick_stop_after_queries: usize,
    pub quick_stop_min_score: i32,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_queries_per_question: 12,
            max_pages_generic: 14,
            max_pages_specific: 6,
            rows_per_page_generic: 50,
            rows_per_page_specific: 25,
            max_seen_codes: 30,
            early_stop_good_medium: true,
            medium_early_min_statement: 90,
            medium_early_min_ratio: 0.70,
            quick_stop_after_queries: 5,
            quick_stop_min_score: 88,
        }
    }
}

/// Top-level configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Stop processing further questions once this many codes are
    /// resolved.
    pub target_found: usize,
    /// DevTools port of the operator's browser.
    pub browser_debug_port: u16,
    /// Admin listing URL of the question catalog.
    pub questions_url: String,
    /// Zero-based index of the specialty column in the listing table.
    pub specialty_column: usize,
    /// Pre-extracted booklet text, pages separated by form feeds.
    pub input_pages_path: String,
    /// Output CSV (single `codigo` column).
    pub output_csv_path: String,
    /// Run-log file written at startup.
    pub run_log_file: String,
    /// How long to wait for a manual operator login, in seconds.
    pub login_timeout_secs: u64,
    pub thresholds: MatchThresholds,
    pub queries: QueryLimits,
    pub search: SearchLimits,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_found: 30,
            browser_debug_port: 2001,
            questions_url: "https://manager.eumedicoresidente.com.br/admin/resources/Question"
                .to_string(),
            specialty_column: 3,
            input_pages_path: "inputs/apostila.txt".to_string(),
            output_csv_path: "outputs/codigos.csv".to_string(),
            run_log_file: "output.txt".to_string(),
            login_timeout_secs: 600,
            thresholds: MatchThresholds::default(),
            queries: QueryLimits::default(),
            search: SearchLimits::default(),
        }
    }
}

impl Config {
    /// Environment overrides for the operational fields; thresholds
    /// and budgets keep their defaults (use the TOML file for those).
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            target_found: env_parse("TARGET_FOUND", default.target_found),
            browser_debug_port: env_parse("BROWSER_DEBUG_PORT", default.browser_debug_port),
            questions_url: std::env::var("QUESTIONS_URL").unwrap_or(default.questions_url),
            specialty_column: env_parse("SPECIALTY_COLUMN", default.specialty_column),
            input_pages_path: std::env::var("INPUT_PAGES_PATH").unwrap_or(default.input_pages_path),
            output_csv_path: std::env::var("OUTPUT_CSV_PATH").unwrap_or(default.output_csv_path),
            run_log_file: std::env::var("RUN_LOG_FILE").unwrap_or(default.run_log_file),
            login_timeout_secs: env_parse("LOGIN_TIMEOUT_SECS", default.login_timeout_secs),
            thresholds: default.thresholds,
            queries: default.queries,
            search: default.search,
        }
    }

    /// Loads a full configuration from a TOML file. Missing keys fall
    /// back to the defaults.
    pub async fn from_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("não foi possível ler a configuração: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("configuração TOML inválida: {}", path.display()))?;
        Ok(config)
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits_hold() {
        let c = Config::default();
        assert_eq!(c.search.max_queries_per_question, 12);
        assert_eq!(c.search.max_seen_codes, 30);
        assert_eq!(c.thresholds.statement_token_set, 85);
        assert_eq!(c.queries.max_query_chars, 1400);
    }

    #[test]
    fn partial_toml_keeps_defaults_elsewhere() {
        let c: Config = toml::from_str(
            "target_found = 10\n\n[thresholds]\nstatement_token_set = 90\n",
        )
        .unwrap();
        assert_eq!(c.target_found, 10);
        assert_eq!(c.thresholds.statement_token_set, 90);
        assert_eq!(c.thresholds.statement_partial, 88);
        assert_eq!(c.search.max_pages_generic, 14);
    }
}
