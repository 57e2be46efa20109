//! Cross-cutting helpers: logging and text normalization.

pub mod logging;
pub mod text;
