mod api_error;
mod app;
mod ask_payload;
mod ask_response;
mod handlers;
mod upload_response;

use anyhow::Context;
use app::AppState;
use pdf_qa::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loads .env as well, so RUST_LOG set there reaches the logger
    let config = Config::from_env()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!(
        "Storing documents in {} and extracted text in {}",
        config.upload_dir.display(),
        config.text_dir.display()
    );

    let state = AppState::from_config(&config);
    let app = app::build_router(state, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("failed to bind port {}", config.port))?;
    println!("Server is running on http://localhost:{}", config.port);

    axum::serve(listener, app).await?;
    Ok(())
}
