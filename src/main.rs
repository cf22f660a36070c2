use std::error::Error;

use tracing::{info, warn};

mod telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file when present.
    let dotenv = dotenvy::dotenv();

    telemetry::init("info")?;

    if let Err(e) = dotenv {
        warn!(error = %e, "no .env loaded, using process environment only");
    }

    let app_id = std::env::var("APP_ID").unwrap_or_else(|_| "-".into());
    let proxy_url = std::env::var("WEBHOOK_PROXY_URL").unwrap_or_else(|_| "-".into());
    info!(%app_id, webhook_proxy_url = %proxy_url, "Starting SeniorDevBot");

    api::start().await?;

    Ok(())
}
