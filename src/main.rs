use anyhow::Result;
use pdf_to_codes::utils::logging;
use pdf_to_codes::{App, Config};
use std::path::Path;

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let config = if tokio::fs::try_exists(CONFIG_PATH).await.unwrap_or(false) {
        Config::from_file(Path::new(CONFIG_PATH)).await?
    } else {
        Config::from_env()
    };

    App::initialize(config).await?.run().await?;

    Ok(())
}
