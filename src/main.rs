/// QuickCart Server
///
/// REST backend for the QuickCart e-commerce application: account
/// lifecycle, catalog management, and image uploads.

mod account;
mod api;
mod auth;
mod catalog;
mod config;
mod context;
mod db;
mod error;
mod mailer;
mod media;
mod server;

use config::ServerConfig;
use context::AppContext;
use error::ApiResult;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ApiResult<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quickcart_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    print_banner();

    // Load configuration; missing token secrets abort startup here
    let config = ServerConfig::from_env()?;

    // Create application context
    let ctx = AppContext::new(config).await?;

    // Start server
    server::serve(ctx).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
   ____        _      __   ______           __
  / __ \__  __(_)____/ /__/ ____/___ ______/ /_
 / / / / / / / / ___/ //_/ /   / __ `/ ___/ __/
/ /_/ / /_/ / / /__/ ,< / /___/ /_/ / /  / /_
\___\_\__,_/_/\___/_/|_|\____/\__,_/_/   \__/

        QuickCart API Server v{}
        "#,
        env!("CARGO_PKG_VERSION")
    );
}
