//! Logging helpers: subscriber setup, run-log header and the banner
//! lines printed around a processing run.

use anyhow::Result;
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG` overrides the default
/// `info` level.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

/// Starts the run-log file with a dated header, truncating any
/// previous run.
pub fn init_run_log(log_file_path: &str) -> Result<()> {
    let header = format!(
        "{}\nProcessamento de apostila - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, header)?;
    Ok(())
}

pub fn log_startup(target_found: usize, input_path: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 Busca de códigos de questões");
    info!("📄 Entrada: {}", input_path);
    info!("🎯 Meta: {} códigos", target_found);
    info!("{}", "=".repeat(60));
}

pub fn print_final_stats(found: usize, ad_missing: usize, skipped: usize, csv_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 Processamento concluído");
    info!(
        "Término: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("✅ Encontradas: {}", found);
    info!("❌ ACESSO DIRETO sem código: {}", ad_missing);
    info!("⚠️ Blocos descartados: {}", skipped);
    info!("{}", "=".repeat(60));
    info!("\n💾 CSV salvo em: {}", csv_path);
}

/// Truncates long statements for log lines.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
