use clap::Parser;
use scent_match::api::{router, AppState};
use scent_match::config::ServerConfig;
use scent_match::core::pipeline::Recommender;
use scent_match::core::profile::FixedClassifier;
use scent_match::storage::catalog::Catalog;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load catalog once; every table degrades to empty on failure
    info!(data_dir = %config.data_dir.display(), "Loading catalog");
    let catalog = Arc::new(Catalog::load_dir(&config.data_dir));
    let recommender = Recommender::new(catalog, Arc::new(FixedClassifier::default()), config.top_k);
    let state = AppState::new(recommender);

    let app = router(state, &config.images_dir);

    // Run Server
    let addr = config.addr();
    info!("Server running on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
