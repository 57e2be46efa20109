//! Domain error types.
//!
//! Structural failures abort the whole run; per-block skip reasons are
//! recoverable and get collected into the run report.

use thiserror::Error;

/// Fatal table-of-contents failures. Without both section markers (and
/// a sane ordering between them) there is no page range to extract.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StructureError {
    #[error("sumário: marcador \"QUESTÕES EXTRAS\" não encontrado")]
    MissingQuestionsMarker,

    #[error("sumário: marcador \"COMENTÁRIOS E GABARITOS\" não encontrado")]
    MissingAnswerKeyMarker,

    #[error("sumário: nenhum dos marcadores (\"QUESTÕES EXTRAS\", \"COMENTÁRIOS E GABARITOS\") foi encontrado")]
    MissingBothMarkers,

    #[error("sumário inconsistente: COMENTÁRIOS E GABARITOS (pág {answer_key_page}) <= QUESTÕES EXTRAS (pág {questions_page})")]
    InconsistentOrder {
        questions_page: u32,
        answer_key_page: u32,
    },
}

/// Why a raw block was skipped instead of becoming a question. Skips
/// never abort the run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("enunciado muito curto ({words} palavras)")]
    StatementTooShort { words: usize },

    #[error("poucas alternativas ({choices}) e não é CERTO/ERRADO")]
    TooFewChoices { choices: usize },
}
