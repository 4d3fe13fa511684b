use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use whirr_query::QueryEngine;
use whirr_schema::SchemaRegistry;
use whirr_store::{MemoryStore, RegistryStore};
use whirr_update::UpdatePipeline;

use crate::config::ServerConfig;
use crate::connection::{handle_connection, AppContext};
use crate::error::ServerResult;

/// The whois server: a TCP accept loop with one task per connection.
pub struct WhoisServer {
    config: ServerConfig,
    ctx: Arc<AppContext>,
}

impl WhoisServer {
    /// Build a server with the standard in-memory backend.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let schemas = Arc::new(SchemaRegistry::builtin());
        let store: Arc<dyn RegistryStore> = Arc::new(MemoryStore::new(Arc::clone(&schemas)));
        Self::with_store(config, store, schemas)
    }

    /// Build a server over an existing store (alternate backends, tests,
    /// pre-seeded data).
    pub fn with_store(
        config: ServerConfig,
        store: Arc<dyn RegistryStore>,
        schemas: Arc<SchemaRegistry>,
    ) -> ServerResult<Self> {
        let sources = config.source_config()?;
        let engine = QueryEngine::new(Arc::clone(&store), Arc::clone(&schemas), sources);
        let pipeline = Arc::new(UpdatePipeline::new(store, Arc::clone(&schemas)));
        let ctx = Arc::new(AppContext {
            engine,
            pipeline,
            schemas,
        });
        Ok(Self { config, ctx })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn context(&self) -> &Arc<AppContext> {
        &self.ctx
    }

    /// Bind the configured address and serve until the process exits.
    pub async fn serve(self) -> ServerResult<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!("whois server listening on {}", self.config.bind_addr);
        self.serve_on(listener).await
    }

    /// Serve on an already-bound listener (lets tests bind port 0).
    pub async fn serve_on(self, listener: TcpListener) -> ServerResult<()> {
        let permits = Arc::new(Semaphore::new(self.config.max_connections));
        loop {
            let (stream, peer) = listener.accept().await?;
            let permit = match Arc::clone(&permits).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => return Ok(()), // semaphore closed: shutting down
            };
            let ctx = Arc::clone(&self.ctx);
            tokio::spawn(async move {
                let _permit = permit;
                tracing::debug!(%peer, "connection opened");
                // A client disconnect ends this task, abandoning any
                // in-flight resolution with it.
                if let Err(e) = handle_connection(stream, ctx).await {
                    tracing::debug!(%peer, error = %e, "connection error");
                }
                tracing::debug!(%peer, "connection closed");
            });
        }
    }
}
