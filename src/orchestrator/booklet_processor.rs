//! Booklet-level orchestration.
//!
//! Locates the extra-questions range, parses every block in it and
//! drives the per-question search, ACESSO DIRETO questions first,
//! until the target count is reached or the booklet is exhausted.

use crate::clients::SearchProvider;
use crate::config::Config;
use crate::models::loaders::PageDump;
use crate::models::question::ParsedQuestion;
use crate::services::match_validator::MatchValidator;
use crate::services::query_builder::QueryBuilder;
use crate::services::question_parser::QuestionParser;
use crate::services::{locate_question_range, split_blocks};
use crate::utils::logging::truncate_text;
use crate::workflow::{CodeFinder, QuestionCtx};
use anyhow::Result;
use tracing::{info, warn};

/// Pages scanned for the summary markers, counted from page one.
const SUMMARY_PAGE_SPAN: usize = 12;

/// Outcome of a whole booklet run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Output lines, in final CSV order.
    pub lines: Vec<String>,
    pub found: usize,
    pub skipped: usize,
    /// Booklet numbers of ACESSO DIRETO questions left unresolved.
    pub ad_not_found: Vec<Option<u32>>,
}

/// Processes one page dump end to end.
pub async fn process_booklet<P: SearchProvider>(
    provider: &P,
    config: &Config,
    dump: &PageDump,
) -> Result<RunReport> {
    let summary = dump.join_range(0, SUMMARY_PAGE_SPAN.min(dump.page_count()));
    let range = locate_question_range(&summary)?;
    info!(
        "📖 questões extras nas páginas {}..{}",
        range.start + 1,
        range.end_exclusive
    );

    let section = dump.join_range(range.start, range.end_exclusive);
    let blocks = split_blocks(&section);
    info!("✂️ {} blocos segmentados", blocks.len());

    let parser = QuestionParser::new(&config.thresholds);
    let batch = parser.parse_all(&blocks);
    info!(
        "📝 {} ACESSO DIRETO, {} especialidade, {} descartadas",
        batch.direct_access.len(),
        batch.specialty.len(),
        batch.skipped.len()
    );

    let validator = MatchValidator::new(config.thresholds.clone());
    let queries = QueryBuilder::new(config.queries.clone());
    let finder = CodeFinder::new(provider, &validator, &queries, &config.search);

    let mut report = RunReport {
        skipped: batch.skipped.len(),
        ..RunReport::default()
    };

    let ordered: Vec<&ParsedQuestion> = batch
        .direct_access
        .iter()
        .chain(batch.specialty.iter())
        .collect();

    for (position, question) in ordered.into_iter().enumerate() {
        if report.found >= config.target_found {
            info!("🎯 meta de {} códigos atingida", config.target_found);
            break;
        }
        let ctx = QuestionCtx::new(question.number, position + 1, question.kind);
        info!("{} {}", ctx, truncate_text(&question.statement, 90));

        match finder.find_code(&ctx, question).await? {
            Some(result) => {
                report.lines.push(format!(
                    "{} ({}, {})",
                    result.code,
                    question.kind.category_label(),
                    ctx.label()
                ));
                report.found += 1;
            }
            None => {
                warn!("{} ❌ nenhuma candidata aceita", ctx);
                if question.kind.is_direct_access() {
                    report.ad_not_found.push(question.number);
                }
            }
        }
    }

    for number in &report.ad_not_found {
        let label = number.map_or_else(|| "?".to_string(), |n| n.to_string());
        report
            .lines
            .push(format!("Q{} ACESSO DIRETO (NÃO ENCONTRADA)", label));
    }

    Ok(report)
}
