//! Application lifecycle: browser attachment, login wait, booklet
//! processing and the CSV sink.

use crate::browser;
use crate::clients::CatalogClient;
use crate::config::Config;
use crate::infrastructure::PageDriver;
use crate::models::loaders::PageDump;
use crate::orchestrator::booklet_processor::process_booklet;
use crate::services::csv_writer;
use crate::utils::logging::{init_run_log, log_startup, print_final_stats};
use anyhow::Result;
use chromiumoxide::Browser;
use std::path::Path;

pub struct App {
    config: Config,
    // Kept alive for the duration of the run; dropping it would close
    // the DevTools connection under the client.
    _browser: Browser,
    client: CatalogClient,
}

impl App {
    pub async fn initialize(config: Config) -> Result<Self> {
        init_run_log(&config.run_log_file)?;
        log_startup(config.target_found, &config.input_pages_path);

        let (browser, page) =
            browser::connect_to_browser_and_page(config.browser_debug_port, &config.questions_url)
                .await?;
        let driver = PageDriver::new(page);
        let client = CatalogClient::new(driver, &config.questions_url, config.specialty_column)?;
        client.ensure_logged_in(config.login_timeout_secs).await?;

        Ok(Self {
            config,
            _browser: browser,
            client,
        })
    }

    pub async fn run(&self) -> Result<()> {
        let dump = PageDump::load(Path::new(&self.config.input_pages_path)).await?;
        let report = process_booklet(&self.client, &self.config, &dump).await?;

        csv_writer::write_codes(Path::new(&self.config.output_csv_path), &report.lines).await?;
        print_final_stats(
            report.found,
            report.ad_not_found.len(),
            report.skipped,
            &self.config.output_csv_path,
        );
        Ok(())
    }
}
