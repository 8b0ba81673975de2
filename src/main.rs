//! Routine Builder
//!
//! Serves the picker UI to the local browser. State lives in this process;
//! the catalog and the chat relay are external.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use routine_builder::config::{load_primer, Config};
use routine_builder::core::{Controller, Session};
use routine_builder::relay::HttpRelay;
use routine_builder::routes::{self, AppState};
use routine_builder::selection::{FileStore, SelectionStore};
use routine_builder::views::HtmlPresenter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "routine_builder=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    // Restore the selection mirror
    let storage_path = config.storage_path();
    let store = Arc::new(FileStore::open(&storage_path));
    let selection = SelectionStore::restore(store, config.settings.storage.key.clone());
    tracing::info!(
        "Selection store at {} ({} item(s))",
        storage_path.display(),
        selection.len()
    );

    let primer = load_primer(config.settings.assistant.persona_file.as_deref()).await?;
    let controller = Controller::new(selection, &primer, Box::new(HtmlPresenter));

    let catalog = config.catalog_source();
    tracing::info!("Catalog source: {}", catalog);
    tracing::info!("Chat relay: {}", config.settings.relay.url);

    let session = Arc::new(Session::new(
        controller,
        catalog,
        Arc::new(HttpRelay::new(config.settings.relay.url.clone())),
    ));

    // Show everything on first load
    session.refresh().await;

    let direction = config.direction();
    tracing::info!("Text direction: {}", direction.as_str());

    let state = AppState {
        session,
        categories: Arc::new(config.settings.ui.categories.clone()),
        direction,
    };

    let app = Router::new()
        .merge(routes::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tracing::info!("Routine Builder running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
