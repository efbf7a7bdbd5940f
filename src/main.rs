//src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use utilization::{
    config::{AppState, Config},
    router,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;
    let app_state = AppState::build(&config).await?;
    let app = router::app(app_state);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    tracing::info!("Swagger UI at http://{}/swagger-ui", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
