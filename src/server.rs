//! MCP server initialization for stdio and streamable HTTP transports.
//!
//! Provides [`serve_stdio`] and [`serve_http`] entry points that wire up the
//! record store, embedding provider, and MCP tool handler into a running server.

use crate::config::AuraConfig;
use crate::db;
use crate::embedding;
use crate::memory::{MemoryFacade, RecordStore};
use crate::tools::AuraTools;
use anyhow::{Context, Result};
use rmcp::ServiceExt;
use std::sync::Arc;

/// Shared setup: open the store, create the embedding provider, check the
/// embedding model recorded alongside the vectors.
pub async fn setup_shared_state(config: &AuraConfig) -> Result<Arc<MemoryFacade>> {
    let db_path = config.resolved_db_path();
    let store = RecordStore::open(&db_path).await?;
    tracing::info!(db = %db_path.display(), "database ready");

    let provider = embedding::create_provider(&config.embedding)?;
    let embedder: Arc<dyn embedding::EmbeddingProvider> = Arc::from(provider);
    tracing::info!(model = embedder.model_id(), "embedding provider ready");

    check_embedding_model(&store, embedder.model_id()).await?;

    let facade = MemoryFacade::from_config(Arc::new(store), embedder, config);
    Ok(Arc::new(facade))
}

/// Warn if the stored vectors came from a different model; record the model on
/// first use.
pub async fn check_embedding_model(store: &RecordStore, model_id: &str) -> Result<()> {
    let stored = store
        .with_connection(db::migrations::get_embedding_model)
        .await
        .context("failed to read embedding model")?;

    match stored {
        Some(stored) if stored != model_id => {
            tracing::warn!(
                stored = %stored,
                configured = %model_id,
                "embedding model changed; similarity against older records will be meaningless"
            );
        }
        Some(_) => {}
        None => {
            let model_id = model_id.to_owned();
            store
                .with_connection(move |conn| db::migrations::set_embedding_model(conn, &model_id))
                .await
                .context("failed to record embedding model")?;
        }
    }
    Ok(())
}

/// Start the MCP server over stdio transport.
pub async fn serve_stdio(config: AuraConfig) -> Result<()> {
    tracing::info!("starting Aura MCP server on stdio");

    let facade = setup_shared_state(&config).await?;

    let tools = AuraTools::new(facade);
    let transport = rmcp::transport::stdio();

    let server = tools.serve(transport).await?;
    tracing::info!("MCP server running, waiting for client");

    server.waiting().await?;
    tracing::info!("MCP server shut down");

    Ok(())
}

/// Start the MCP server over Streamable HTTP transport.
pub async fn serve_http(config: AuraConfig) -> Result<()> {
    let host = config.server.host.clone();
    let port = config.server.port;
    let bind_addr = format!("{host}:{port}");

    tracing::info!(addr = %bind_addr, "starting Aura MCP server on HTTP");

    let facade = setup_shared_state(&config).await?;

    let service = rmcp::transport::streamable_http_server::StreamableHttpService::new(
        move || Ok(AuraTools::new(Arc::clone(&facade))),
        rmcp::transport::streamable_http_server::session::local::LocalSessionManager::default()
            .into(),
        Default::default(),
    );

    let router = axum::Router::new().nest_service("/mcp", service);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "MCP server listening at http://{bind_addr}/mcp");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
                return;
            }
            tracing::info!("shutting down HTTP server");
        })
        .await?;

    Ok(())
}
