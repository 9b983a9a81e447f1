//! ServerBuilder for fluent API to build HTTP servers

use super::entity_registry::{ContentDescriptor, EntityRegistry};
use super::upload::{UPLOADS_PATH, upload_routes};
use crate::config::ServerConfig;
use crate::core::entity::Content;
use crate::core::service::DataService;
use anyhow::{Result, bail};
use axum::http::{HeaderValue, Method};
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Default prefix under which content routes are mounted
pub const DEFAULT_API_PREFIX: &str = "/api";

/// Builder for creating HTTP servers with auto-registered routes
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .register::<Sermon>(InMemoryDataService::new())
///     .register::<Devotion>(InMemoryDataService::new())
///     .with_upload_dir("uploads")
///     .build()?;
/// ```
pub struct ServerBuilder {
    entity_registry: EntityRegistry,
    api_prefix: String,
    upload_dir: Option<PathBuf>,
    cors_origins: Vec<String>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            entity_registry: EntityRegistry::new(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            upload_dir: None,
            cors_origins: Vec::new(),
            custom_routes: Vec::new(),
        }
    }

    /// Apply the prefix, upload directory and CORS origins of a config
    pub fn with_config(self, config: &ServerConfig) -> Self {
        self.with_api_prefix(&config.api_prefix)
            .with_upload_dir(&config.upload_dir)
            .with_cors_origins(config.cors_origins.clone())
    }

    /// Mount content and upload routes under `prefix` ("" or "/" for the root)
    pub fn with_api_prefix(mut self, prefix: &str) -> Self {
        self.api_prefix = prefix.to_string();
        self
    }

    /// Enable the upload endpoints and serve stored files at `/uploads`
    pub fn with_upload_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.upload_dir = Some(dir.into());
        self
    }

    /// Restrict CORS to these origins; empty or `*` allows any origin
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    /// Add custom routes, mounted under the API prefix
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Register a content type backed by `service`
    pub fn register<T: Content>(self, service: impl DataService<T> + 'static) -> Self {
        self.register_shared::<T>(Arc::new(service))
    }

    /// Register a content type with an already shared service
    pub fn register_shared<T: Content>(mut self, service: Arc<dyn DataService<T>>) -> Self {
        tracing::debug!(entity = T::resource_name(), "Registering content type");
        self.entity_registry
            .register(Box::new(ContentDescriptor::<T>::new(service)));
        self
    }

    /// Build the final router
    ///
    /// This generates:
    /// - `GET /health`
    /// - CRUD routes for all registered content types under the API prefix
    /// - upload routes and the `/uploads` file service when an upload dir is set
    pub fn build(self) -> Result<Router> {
        if self.entity_registry.is_empty() {
            bail!("No content types registered. Call .register::<T>()");
        }

        let mut api = self.entity_registry.build_routes();
        if let Some(dir) = &self.upload_dir {
            api = api.merge(upload_routes(dir.clone()));
        }
        for custom_router in self.custom_routes {
            api = api.merge(custom_router);
        }

        let prefix = normalize_prefix(&self.api_prefix);
        let mut app = Router::new().route("/health", get(health_check));
        app = if prefix.is_empty() {
            app.merge(api)
        } else {
            app.nest(&prefix, api)
        };

        if let Some(dir) = &self.upload_dir {
            app = app.nest_service(UPLOADS_PATH, ServeDir::new(dir));
        }

        Ok(app
            .layer(cors_layer(&self.cors_origins)?)
            .layer(TraceLayer::new_for_http()))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Health check endpoint handler
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "pulpit"
    }))
}

/// `"api/"` → `"/api"`, `"/"` → `""`
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return Ok(layer.allow_origin(Any));
    }

    let mut allowed = Vec::with_capacity(origins.len());
    for origin in origins {
        match HeaderValue::from_str(origin) {
            Ok(value) => allowed.push(value),
            Err(e) => bail!("Invalid CORS origin '{}': {}", origin, e),
        }
    }
    Ok(layer.allow_origin(AllowOrigin::list(allowed)))
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
