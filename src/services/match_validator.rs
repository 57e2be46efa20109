//! Fuzzy validation of a catalog candidate against a parsed question.
//!
//! Matching happens on two normalizations of every text: a plain one
//! (lowercase, ASCII-folded, alphanumeric) and a comparison one that
//! additionally drops filler phrases and standalone numbers. A
//! candidate must first pass the statement gate; only then are its
//! choices compared letter by letter, and the final accept decision
//! depends on how many choices the two questions have in common.

use crate::config::MatchThresholds;
use crate::models::catalog::{CandidateRecord, Confidence};
use crate::models::question::ParsedQuestion;
use crate::utils::text::{
    normalize_for_comparison, normalize_text, partial_ratio, token_set_ratio,
};
use tracing::debug;

/// Outcome of validating one candidate.
#[derive(Debug, Clone, Copy)]
pub struct Validation {
    pub accepted: bool,
    pub statement_score: i32,
    pub confirmed_choices: usize,
}

pub struct MatchValidator {
    thresholds: MatchThresholds,
}

impl MatchValidator {
    pub fn new(thresholds: MatchThresholds) -> Self {
        Self { thresholds }
    }

    /// Statement gate plus per-choice confirmation. The reported
    /// score is the best of the four statement similarities (token-set
    /// and partial, under both normalizations).
    pub fn validate(&self, question: &ParsedQuestion, candidate: &CandidateRecord) -> Validation {
        let t = &self.thresholds;

        let q_plain = normalize_text(&question.statement);
        let c_plain = normalize_text(&candidate.statement);
        let q_cmp = normalize_for_comparison(&question.statement);
        let c_cmp = normalize_for_comparison(&candidate.statement);

        let ts_cmp = token_set_ratio(&q_cmp, &c_cmp);
        let ts_best = token_set_ratio(&q_plain, &c_plain).max(ts_cmp);
        let pr_best = partial_ratio(&q_plain, &c_plain).max(partial_ratio(&q_cmp, &c_cmp));
        let statement_score = ts_best.max(pr_best);

        let gate = ts_best >= t.statement_token_set
            || pr_best >= t.statement_partial
            || ts_cmp >= t.statement_filler_token_set;
        if !gate {
            return Validation {
                accepted: false,
                statement_score,
                confirmed_choices: 0,
            };
        }

        let confirmed_choices = self.confirmed_choices(question, candidate);
        let total = effective_choice_count(question);

        let accepted = if question.is_binary() {
            self.binary_decision(statement_score, confirmed_choices)
        } else {
            self.standard_decision(statement_score, confirmed_choices, total)
        };

        debug!(
            code = %candidate.code,
            score = statement_score,
            confirmed = confirmed_choices,
            total,
            accepted,
            "validação de candidato"
        );

        Validation {
            accepted,
            statement_score,
            confirmed_choices,
        }
    }

    /// CERTO/ERRADO questions have interchangeable choice texts, so
    /// one confirmed choice plus a solid statement score is enough.
    pub fn binary_decision(&self, statement_score: i32, confirmed: usize) -> bool {
        confirmed >= 1 && statement_score >= self.thresholds.binary_min_statement
    }

    /// Standard questions scale the confirmation requirement with the
    /// choice count, with two statement-score fallbacks for candidates
    /// whose listing truncated some choices.
    pub fn standard_decision(&self, statement_score: i32, confirmed: usize, total: usize) -> bool {
        let t = &self.thresholds;
        let by_count = match total {
            0..=3 => confirmed >= 2 || (confirmed >= 1 && statement_score >= t.near_statement),
            4 => confirmed >= 3 || (confirmed >= 2 && statement_score >= t.near_statement),
            _ => confirmed >= 4 || (confirmed >= 3 && statement_score >= t.near_statement_many),
        };
        by_count
            || (total <= 4 && statement_score >= t.fallback_small_set && confirmed >= 1)
            || (statement_score >= t.fallback_high_statement && confirmed >= 2)
    }

    /// Confidence tier of an accepted match.
    pub fn classify(&self, statement_score: i32, confirmed: usize, total: usize) -> Confidence {
        let t = &self.thresholds;
        let ratio = confirmed as f64 / total.max(1) as f64;
        if statement_score >= t.high_min_statement && ratio >= t.high_min_ratio {
            Confidence::High
        } else if statement_score >= t.medium_min_statement && ratio >= t.medium_min_ratio {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    fn confirmed_choices(&self, question: &ParsedQuestion, candidate: &CandidateRecord) -> usize {
        let t = &self.thresholds;
        question
            .choices
            .iter()
            .filter_map(|(letter, text)| candidate.choices.get(letter).map(|c| (text, c)))
            .filter(|(q_text, c_text)| {
                let q_plain = normalize_text(q_text);
                let c_plain = normalize_text(c_text);
                let q_cmp = normalize_for_comparison(q_text);
                let c_cmp = normalize_for_comparison(c_text);
                token_set_ratio(&q_plain, &c_plain) >= t.choice_token_set
                    || partial_ratio(&q_plain, &c_plain)
                        .max(partial_ratio(&q_cmp, &c_cmp))
                        >= t.choice_partial
                    || token_set_ratio(&q_cmp, &c_cmp) >= t.choice_filler_token_set
            })
            .count()
    }
}

/// Distinct choice texts; unlisted choices count as a full set of
/// five so partial listings do not inflate the confirmation ratio.
pub fn effective_choice_count(question: &ParsedQuestion) -> usize {
    match question.distinct_choice_count() {
        0 => 5,
        n => n,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::QuestionKind;
    use std::collections::BTreeMap;

    fn validator() -> MatchValidator {
        MatchValidator::new(MatchThresholds::default())
    }

    fn question(statement: &str, choices: &[(char, &str)]) -> ParsedQuestion {
        ParsedQuestion {
            number: Some(1),
            kind: QuestionKind::Specialty,
            statement: statement.to_string(),
            choices: choices
                .iter()
                .map(|(l, t)| (*l, t.to_string()))
                .collect::<BTreeMap<_, _>>(),
            raw_text: statement.to_string(),
        }
    }

    fn candidate(statement: &str, choices: &[(char, &str)]) -> CandidateRecord {
        CandidateRecord {
            code: "Q1000".to_string(),
            statement: statement.to_string(),
            choices: choices
                .iter()
                .map(|(l, t)| (*l, t.to_string()))
                .collect::<BTreeMap<_, _>>(),
            is_direct_access: false,
            specialty: String::new(),
        }
    }

    #[test]
    fn identical_question_validates_high() {
        let v = validator();
        let q = question(
            "Mulher de 28 anos com dor pélvica cíclica há dois anos.",
            &[('A', "Dienogeste contínuo"), ('B', "Histerectomia"), ('C', "Agonista do GnRH")],
        );
        let c = candidate(
            "Mulher de 28 anos com dor pélvica cíclica há dois anos.",
            &[('A', "Dienogeste contínuo"), ('B', "Histerectomia"), ('C', "Agonista do GnRH")],
        );
        let result = v.validate(&q, &c);
        assert!(result.accepted);
        assert_eq!(result.statement_score, 100);
        assert_eq!(result.confirmed_choices, 3);
        assert_eq!(v.classify(result.statement_score, 3, 3), Confidence::High);
    }

    #[test]
    fn unrelated_statement_fails_the_gate() {
        let v = validator();
        let q = question(
            "Lactente com sibilância recorrente e resposta a broncodilatador.",
            &[('A', "Asma"), ('B', "Bronquiolite"), ('C', "Fibrose cística")],
        );
        let c = candidate(
            "Idoso com fratura de colo de fêmur após queda da própria altura.",
            &[('A', "Asma"), ('B', "Bronquiolite"), ('C', "Fibrose cística")],
        );
        let result = v.validate(&q, &c);
        assert!(!result.accepted);
        assert_eq!(result.confirmed_choices, 0);
    }

    #[test]
    fn binary_decision_needs_one_choice_and_solid_statement() {
        let v = validator();
        assert!(v.binary_decision(80, 1));
        assert!(!v.binary_decision(79, 2));
        assert!(!v.binary_decision(95, 0));
    }

    #[test]
    fn standard_decision_scales_with_choice_count() {
        let v = validator();
        assert!(v.standard_decision(70, 2, 3));
        assert!(v.standard_decision(83, 1, 3));
        assert!(!v.standard_decision(82, 1, 3));

        assert!(v.standard_decision(70, 3, 4));
        assert!(v.standard_decision(83, 2, 4));

        assert!(v.standard_decision(70, 4, 5));
        assert!(v.standard_decision(86, 3, 5));
        assert!(!v.standard_decision(85, 3, 5));
    }

    #[test]
    fn fallbacks_rescue_high_statement_scores() {
        let v = validator();
        // small candidate set, excellent statement, single confirmation
        assert!(v.standard_decision(88, 1, 4));
        assert!(!v.standard_decision(87, 1, 4));
        // near-perfect statement with two confirmations, any set size
        assert!(v.standard_decision(92, 2, 5));
        assert!(!v.standard_decision(91, 2, 5));
    }

    #[test]
    fn classify_tiers() {
        let v = validator();
        assert_eq!(v.classify(95, 4, 5), Confidence::High);
        assert_eq!(v.classify(95, 7, 10), Confidence::Medium);
        assert_eq!(v.classify(85, 4, 5), Confidence::Medium);
        assert_eq!(v.classify(79, 5, 5), Confidence::Low);
        assert_eq!(v.classify(95, 2, 5), Confidence::Low);
    }

    #[test]
    fn binary_question_accepts_on_statement_alone_plus_one_choice() {
        let v = validator();
        let q = question(
            "Recém-nascido com icterícia nas primeiras 24 horas de vida exige investigação.",
            &[('A', "CERTO"), ('B', "ERRADO")],
        );
        let c = candidate(
            "Recém-nascido com icterícia nas primeiras 24 horas de vida exige investigação imediata.",
            &[('A', "CERTO"), ('B', "ERRADO")],
        );
        let result = v.validate(&q, &c);
        assert!(result.accepted);
        assert_eq!(result.confirmed_choices, 2);
    }
}
