//! Scrapes the admin question listing, one filtered page at a time.

use crate::clients::SearchProvider;
use crate::infrastructure::PageDriver;
use crate::models::catalog::RawRow;
use anyhow::{bail, Result};
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};
use url::Url;

/// How long to poll for listing rows before giving up on a page.
const ROW_WAIT_ATTEMPTS: usize = 20;
const ROW_WAIT_INTERVAL: Duration = Duration::from_millis(250);

pub struct CatalogClient {
    driver: PageDriver,
    base_url: Url,
    specialty_column: usize,
}

impl CatalogClient {
    pub fn new(driver: PageDriver, questions_url: &str, specialty_column: usize) -> Result<Self> {
        Ok(Self {
            driver,
            base_url: Url::parse(questions_url)?,
            specialty_column,
        })
    }

    /// Navigates to the listing and waits for the operator to finish
    /// logging in. The admin panel redirects to `/login` when the
    /// session is missing; we poll until the redirect stops.
    pub async fn ensure_logged_in(&self, timeout_secs: u64) -> Result<()> {
        self.driver.goto(self.base_url.as_str()).await?;
        let started = Instant::now();
        let mut announced = false;
        loop {
            let current = self.driver.current_url().await?;
            if !current.contains("/login") {
                info!("✓ sessão ativa no painel");
                return Ok(());
            }
            if !announced {
                info!("🔐 aguardando login manual no navegador...");
                announced = true;
            }
            if started.elapsed().as_secs() > timeout_secs {
                bail!("login não concluído em {} segundos", timeout_secs);
            }
            sleep(Duration::from_secs(1)).await;
        }
    }

    fn page_url(&self, query: &str, page: u32) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("page", &page.to_string())
            .append_pair("filters.description", query);
        url
    }

    /// Polls until the table has rows or the panel reports an empty
    /// result set. A timeout here is not fatal: the caller treats an
    /// empty row list as the end of the listing.
    async fn wait_for_rows(&self) -> Result<()> {
        let predicate = r#"
            (() => {
                if (document.querySelectorAll('table tbody tr').length > 0) return true;
                const body = document.body ? document.body.innerText : '';
                if (body.includes('Nenhum') && body.includes('registro')) return true;
                return body.includes('No records');
            })()
        "#;
        for _ in 0..ROW_WAIT_ATTEMPTS {
            if self.driver.eval(predicate).await?.as_bool().unwrap_or(false) {
                return Ok(());
            }
            sleep(ROW_WAIT_INTERVAL).await;
        }
        warn!("tabela não carregou dentro do tempo esperado");
        Ok(())
    }

    fn rows_script(&self) -> String {
        format!(
            r#"
            (() => {{
                const rows = Array.from(document.querySelectorAll('table tbody tr'));
                return rows.map(tr => {{
                    const tds = tr.querySelectorAll('td');
                    const cell = i => tds[i] ? tds[i].innerText.trim() : '';
                    return {{ code: cell(1), desc: cell(2), esp: cell({col}) }};
                }}).filter(r => r.code);
            }})()
            "#,
            col = self.specialty_column
        )
    }
}

impl SearchProvider for CatalogClient {
    async fn fetch_rows(&self, query: &str, page: u32) -> Result<Vec<RawRow>> {
        let url = self.page_url(query, page);
        debug!("🔍 página {} de '{}'", page, query);
        self.driver.goto(url.as_str()).await?;
        self.wait_for_rows().await?;
        let rows: Vec<RawRow> = self.driver.eval_as(self.rows_script()).await?;
        debug!("{} linhas na página {}", rows.len(), page);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_url_encodes_filter_like_the_panel_expects() {
        let url = Url::parse("https://manager.example.com/admin/resources/Question").unwrap();
        let mut built = url;
        built
            .query_pairs_mut()
            .clear()
            .append_pair("page", "3")
            .append_pair("filters.description", "dor pélvica cíclica");
        assert_eq!(
            built.as_str(),
            "https://manager.example.com/admin/resources/Question?page=3&filters.description=dor+p%C3%A9lvica+c%C3%ADclica"
        );
    }
}
