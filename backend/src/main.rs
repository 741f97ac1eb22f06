//! Backend entry-point: configuration, tracing, and server startup.

use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use pokedex_backend::server::{run, AppConfig};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;
    run(config).await
}
