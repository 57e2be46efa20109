//! Result sink: one CSV file with a single `codigo` column.
//!
//! The file is read back in spreadsheets by the operations team, so
//! it carries a UTF-8 BOM and RFC-style quoting for fields that
//! contain commas or quotes.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Writes the result lines to `path`, creating parent directories as
/// needed. Overwrites any previous run.
pub async fn write_codes(path: &Path, lines: &[String]) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("criando diretório {}", parent.display()))?;
    }

    let mut content = String::from("\u{feff}codigo\n");
    for line in lines {
        content.push_str(&escape_field(line));
        content.push('\n');
    }

    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("gravando CSV em {}", path.display()))?;
    info!("💾 {} linhas gravadas em {}", lines.len(), path.display());
    Ok(())
}
