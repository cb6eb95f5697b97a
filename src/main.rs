use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use tracing::{error, info, warn};

use t2_offstreet::config::Config;
use t2_offstreet::credentials;
use t2_offstreet::scraping::session::Browser;
use t2_offstreet::{logging, operator, workflow};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv().ok();
    let config = Config::parse();
    logging::init(config.verbose);

    let creds = credentials::resolve(
        credentials::from_env(),
        config.credential_dir().as_deref(),
        config.clear_credentials,
    )
    .context("reading credentials")?;

    let browser = Browser::connect(&config)
        .await
        .context("starting browser session")?;

    match workflow::run(&browser, &config, &creds).await {
        Ok(report) => {
            info!(
                "event for reservation {} created",
                config.reservation_id
            );
            info!("billing code: {}", report.billing_code);
            match &report.event_link {
                Some(link) => info!("registration link: {}", link),
                None => warn!("registration link was not found"),
            }
            if let Some(path) = &report.notification_path {
                info!("notification written to {}", path.display());
            }
            if !report.note_denied {
                warn!("T2 reservation note was not denied, check it manually");
            }
            operator::acknowledge("Run finished. Review the Offstreet event and the notification tab.");
            browser.quit().await;
            Ok(())
        }
        Err(e) => {
            error!(kind = ?e.kind(), "run aborted: {}", e);
            operator::acknowledge("Run aborted. Inspect the browser before it closes.");
            browser.quit().await;
            std::process::exit(1);
        }
    }
}
