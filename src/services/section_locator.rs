//! Table-of-contents scan.
//!
//! The booklet's summary lists "QUESTÕES EXTRAS ..... N" and
//! "COMENTÁRIOS E GABARITOS ..... M"; the questions live in pages
//! [N, M) (1-based in the summary, zero-based here).

use crate::error::StructureError;
use regex::Regex;
use std::sync::OnceLock;

/// Zero-based page range of the extra-questions section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start: usize,
    /// Start page of the answer-key section, used as exclusive bound.
    pub end_exclusive: usize,
}

fn questions_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?im)QUEST[ÕO]ES\s+EXTRAS\s+\.{2,}\s*(\d{1,4})\s*$").unwrap())
}

fn answer_key_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?im)COMENT[ÁA]RIOS\s+E\s+GABARITOS\s+\.{2,}\s*(\d{1,4})\s*$").unwrap()
    })
}

/// Scans the summary text (first ~12 pages, already joined) for the
/// two section markers and returns the zero-based question range.
pub fn locate_question_range(summary_text: &str) -> Result<PageRange, StructureError> {
    // Summary pages are 1-based; a captured "0" is noise, not a page.
    let questions = questions_marker_re()
        .captures(summary_text)
        .and_then(|c| c[1].parse::<u32>().ok())
        .filter(|&n| n >= 1);
    let answer_key = answer_key_marker_re()
        .captures(summary_text)
        .and_then(|c| c[1].parse::<u32>().ok())
        .filter(|&n| n >= 1);

    let (questions_page, answer_key_page) = match (questions, answer_key) {
        (Some(q), Some(c)) => (q, c),
        (None, Some(_)) => return Err(StructureError::MissingQuestionsMarker),
        (Some(_), None) => return Err(StructureError::MissingAnswerKeyMarker),
        (None, None) => return Err(StructureError::MissingBothMarkers),
    };

    if answer_key_page <= questions_page {
        return Err(StructureError::InconsistentOrder {
            questions_page,
            answer_key_page,
        });
    }

    Ok(PageRange {
        start: (questions_page - 1) as usize,
        end_exclusive: (answer_key_page - 1) as usize,
    })
}
