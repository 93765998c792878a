//! Axum-based HTTP server.

use std::future::Future;
use std::sync::Arc;

use axum::http::Method;
use axum::routing::{get, post, put};
use axum::Router;
use prometheus::Registry;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use reclaim_claims::ClaimEngine;
use reclaim_store::Store;

use crate::handlers::{self, AppState};
use crate::metrics::RequestMetrics;

pub struct RpcServer<S> {
    state: AppState<S>,
}

impl<S: Store + 'static> RpcServer<S> {
    /// Build a server around `engine`. Request counters are registered with
    /// `registry`, which is also what `GET /metrics` renders; without one the
    /// counters are kept private and the endpoint answers 404.
    pub fn new(
        engine: Arc<ClaimEngine<S>>,
        registry: Option<Registry>,
    ) -> Result<Self, prometheus::Error> {
        let metrics = match &registry {
            Some(registry) => RequestMetrics::register(registry)?,
            None => RequestMetrics::register(&Registry::new())?,
        };
        Ok(Self {
            state: AppState {
                engine,
                metrics: Arc::new(metrics),
                registry,
            },
        })
    }

    pub fn metrics(&self) -> &RequestMetrics {
        &self.state.metrics
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers(Any);
        let middleware = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors);

        Router::new()
            .route("/health", get(handlers::health))
            .route("/metrics", get(handlers::metrics::<S>))
            .route("/items", get(handlers::list_items::<S>))
            .route("/items/found", post(handlers::report_found::<S>))
            .route("/items/lost", post(handlers::report_lost::<S>))
            .route("/items/my", get(handlers::my_items::<S>))
            .route(
                "/items/:id",
                get(handlers::get_item::<S>)
                    .put(handlers::update_item::<S>)
                    .delete(handlers::delete_item::<S>),
            )
            .route("/items/:id/claim", post(handlers::submit_claim::<S>))
            .route("/items/:id/claims", get(handlers::list_claims::<S>))
            .route("/items/:id/my-claim", get(handlers::my_claim::<S>))
            .route("/items/:id/verify-qr", post(handlers::verify_qr::<S>))
            .route("/claims/:id/answer", put(handlers::answer_claim::<S>))
            .route("/claims/:id/decide", put(handlers::decide_claim::<S>))
            .layer(middleware)
            .with_state(self.state.clone())
    }

    /// Serve on `listener` until `shutdown` resolves, then drain in-flight
    /// requests.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        info!(addr = %listener.local_addr()?, "HTTP API listening");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
    }
}
