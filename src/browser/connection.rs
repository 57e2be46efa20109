//! Attaches to an already-running Chrome over the DevTools port.
//!
//! The operator starts Chrome with `--remote-debugging-port` and logs
//! into the admin panel by hand; we reuse that session instead of
//! managing credentials ourselves.

use anyhow::Result;
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// Connects to the browser and picks the page to drive: an existing
/// tab already on `target_url`'s host if there is one, otherwise a
/// fresh tab navigated there.
pub async fn connect_to_browser_and_page(port: u16, target_url: &str) -> Result<(Browser, Page)> {
    let browser_url = format!("http://localhost:{}", port);
    info!("🔌 conectando ao navegador: {}", browser_url);

    let (browser, mut handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("falha ao conectar ao navegador: {}", e);
        e
    })?;
    debug!("conexão estabelecida");

    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // Give the browser a moment to sync its target list.
    sleep(tokio::time::Duration::from_millis(300)).await;

    let pages = browser.pages().await?;
    debug!("{} abas abertas", pages.len());

    let host = url::Url::parse(target_url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()));
    if let Some(host) = host {
        for p in pages.iter() {
            if let Ok(Some(page_url)) = p.url().await {
                if page_url.contains(&host) {
                    info!("✓ reutilizando aba existente: {}", page_url);
                    return Ok((browser, p.clone()));
                }
            }
        }
        debug!("nenhuma aba no painel, abrindo nova");
    }

    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("falha ao criar nova aba: {}", e);
        e
    })?;
    page.goto(target_url).await?;
    page.wait_for_navigation().await?;
    Ok((browser, page))
}
