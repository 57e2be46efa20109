//! Search flow for a single question.
//!
//! Walks the query ladder against the catalog, validating every row
//! on the way. A High-confidence hit returns immediately; Medium hits
//! are ranked and kept as the running best, with early stops so a
//! good-enough match does not burn the whole paging budget; Low hits
//! are a last resort.

use crate::clients::SearchProvider;
use crate::config::SearchLimits;
use crate::models::catalog::{CandidateRecord, Confidence, MatchResult};
use crate::models::question::ParsedQuestion;
use crate::services::match_validator::{effective_choice_count, MatchValidator};
use crate::services::query_builder::QueryBuilder;
use crate::workflow::question_ctx::QuestionCtx;
use anyhow::Result;
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// Delay before the single retry on an empty listing page.
const EMPTY_PAGE_RETRY: Duration = Duration::from_millis(800);

pub struct CodeFinder<'a, P: SearchProvider> {
    provider: &'a P,
    validator: &'a MatchValidator,
    queries: &'a QueryBuilder,
    limits: &'a SearchLimits,
}

impl<'a, P: SearchProvider> CodeFinder<'a, P> {
    pub fn new(
        provider: &'a P,
        validator: &'a MatchValidator,
        queries: &'a QueryBuilder,
        limits: &'a SearchLimits,
    ) -> Self {
        Self {
            provider,
            validator,
            queries,
            limits,
        }
    }

    /// Finds the catalog code for one question, or `None` when the
    /// whole ladder is exhausted without an acceptable match.
    pub async fn find_code(
        &self,
        ctx: &QuestionCtx,
        question: &ParsedQuestion,
    ) -> Result<Option<MatchResult>> {
        let total = effective_choice_count(question);
        let ladder = self.queries.build(&question.statement);
        info!("{} {} consultas geradas", ctx, ladder.len());

        let mut seen: HashSet<String> = HashSet::new();
        let mut best_medium: Option<MatchResult> = None;
        let mut best_low: Option<MatchResult> = None;

        'queries: for (index, query) in ladder
            .iter()
            .take(self.limits.max_queries_per_question)
            .enumerate()
        {
            let query_number = index + 1;
            let generic = self.queries.is_generic(&query.text);
            let (page_limit, row_limit) = if generic {
                (self.limits.max_pages_generic, self.limits.rows_per_page_generic)
            } else {
                (self.limits.max_pages_specific, self.limits.rows_per_page_specific)
            };
            debug!(
                "{} consulta {}/{} ({}): '{}'",
                ctx,
                query_number,
                ladder.len().min(self.limits.max_queries_per_question),
                if generic { "genérica" } else { "específica" },
                query.text
            );

            'pages: for page in 1..=page_limit {
                let mut rows = self.provider.fetch_rows(&query.text, page).await?;
                if rows.is_empty() {
                    // Listings sometimes render late; one retry.
                    sleep(EMPTY_PAGE_RETRY).await;
                    rows = self.provider.fetch_rows(&query.text, page).await?;
                    if rows.is_empty() {
                        break 'pages;
                    }
                }

                let mut direct_access: Vec<CandidateRecord> = Vec::new();
                let mut others: Vec<CandidateRecord> = Vec::new();
                for row in rows.iter().take(row_limit) {
                    if row.code.is_empty() || !seen.insert(row.code.clone()) {
                        continue;
                    }
                    if row.description.trim().is_empty() {
                        continue;
                    }
                    if let Some(candidate) =
                        CandidateRecord::from_listing(&row.code, &row.description, &row.specialty)
                    {
                        if candidate.is_direct_access {
                            direct_access.push(candidate);
                        } else {
                            others.push(candidate);
                        }
                    }
                }

                // ACESSO DIRETO candidates first: they outrank the rest.
                for candidate in direct_access.iter().chain(others.iter()) {
                    let validation = self.validator.validate(question, candidate);
                    if !validation.accepted {
                        continue;
                    }
                    let confidence = self.validator.classify(
                        validation.statement_score,
                        validation.confirmed_choices,
                        total,
                    );
                    let result = MatchResult {
                        code: candidate.code.clone(),
                        statement_score: validation.statement_score,
                        confirmed_choices: validation.confirmed_choices,
                        confidence,
                        is_direct_access: candidate.is_direct_access,
                        specialty: candidate.specialty.clone(),
                    };
                    info!(
                        "{} {} {} (score {}, {}/{} alternativas)",
                        ctx,
                        confidence.log_tag(),
                        result.code,
                        result.statement_score,
                        result.confirmed_choices,
                        total
                    );

                    match confidence {
                        Confidence::High => return Ok(Some(result)),
                        Confidence::Medium => {
                            let quick_stop = query_number
                                <= self.limits.quick_stop_after_queries
                                && result.statement_score >= self.limits.quick_stop_min_score;
                            if quick_stop {
                                return Ok(Some(result));
                            }
                            if rank(&result) > best_medium.as_ref().map(rank).unwrap_or(i64::MIN) {
                                best_medium = Some(result);
                            }
                        }
                        Confidence::Low => {
                            if rank(&result) > best_low.as_ref().map(rank).unwrap_or(i64::MIN) {
                                best_low = Some(result);
                            }
                        }
                    }
                }

                if self.limits.early_stop_good_medium {
                    if let Some(best) = &best_medium {
                        let ratio = best.confirmed_choices as f64 / total.max(1) as f64;
                        if best.statement_score >= self.limits.medium_early_min_statement
                            && ratio >= self.limits.medium_early_min_ratio
                        {
                            info!("{} encerrando: média sólida {}", ctx, best.code);
                            return Ok(best_medium);
                        }
                    }
                }

                if seen.len() >= self.limits.max_seen_codes && best_medium.is_some() {
                    debug!("{} limite de candidatos atingido", ctx);
                    break 'queries;
                }
            }
        }

        Ok(best_medium.or(best_low))
    }
}

/// Ranking for competing Medium/Low results: ACESSO DIRETO dominates,
/// then statement score, then confirmed choices.
fn rank(result: &MatchResult) -> i64 {
    let ad = if result.is_direct_access { 1000 } else { 0 };
    ad + result.statement_score as i64 * 10 + result.confirmed_choices as i64
}
