//! Pre-extracted booklet text, one entry per page.
//!
//! PDF-to-text itself happens upstream; the engine consumes a plain
//! dump whose pages are separated by form-feed characters.

use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;
use tracing::info;

/// Page texts of one booklet.
#[derive(Debug, Clone)]
pub struct PageDump {
    pages: Vec<String>,
}

impl PageDump {
    pub fn from_pages(pages: Vec<String>) -> Self {
        Self { pages }
    }

    /// Loads a dump file, splitting pages on form feeds.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("não foi possível ler o texto: {}", path.display()))?;
        let pages: Vec<String> = content.split('\u{0C}').map(str::to_string).collect();
        info!("📄 {} páginas carregadas de {}", pages.len(), path.display());
        Ok(Self::from_pages(pages))
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page_text(&self, index: usize) -> Option<&str> {
        self.pages.get(index).map(String::as_str)
    }

    /// Joins the non-blank pages of `[start, end_exclusive)` with
    /// newlines; the end bound is clamped to the page count.
    pub fn join_range(&self, start: usize, end_exclusive: usize) -> String {
        let end = end_exclusive.min(self.pages.len());
        if start >= end {
            return String::new();
        }
        self.pages[start..end]
            .iter()
            .filter(|p| !p.trim().is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_range_skips_blank_pages_and_clamps() {
        let dump = PageDump::from_pages(vec![
            "um".to_string(),
            "   ".to_string(),
            "dois".to_string(),
        ]);
        assert_eq!(dump.join_range(0, 10), "um\ndois");
        assert_eq!(dump.join_range(2, 2), "");
        assert_eq!(dump.page_text(1), Some("   "));
    }
}
