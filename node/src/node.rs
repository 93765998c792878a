//! The running service: storage, claim engine, match dispatch and HTTP API.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use prometheus::Registry;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use reclaim_claims::{ClaimEngine, MatchQueue, TracingSink};
use reclaim_matching::{
    run_worker, DisabledMatcher, DispatchMetrics, HttpMatcher, MatchDispatcher, MatchReceiver,
    Matcher,
};
use reclaim_rpc::RpcServer;
use reclaim_store_lmdb::LmdbStore;
use reclaim_types::SystemClock;

use crate::config::NodeConfig;
use crate::shutdown::ShutdownController;
use crate::NodeError;

/// How long `stop` waits for background tasks.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// A running reclaim node.
pub struct ReclaimNode {
    pub config: NodeConfig,
    pub store: Arc<LmdbStore>,
    pub engine: Arc<ClaimEngine<LmdbStore>>,
    /// Registry every component's metrics are registered with.
    pub registry: Registry,
    pub dispatch_metrics: Arc<DispatchMetrics>,
    pub shutdown: Arc<ShutdownController>,

    /// Taken by the match worker on start.
    match_receiver: Option<MatchReceiver>,
    matcher: Arc<dyn Matcher>,
    local_addr: Option<SocketAddr>,
    /// Handles for spawned background tasks (joined during shutdown).
    task_handles: Vec<JoinHandle<()>>,
}

impl ReclaimNode {
    /// Create a node.
    ///
    /// Opens the LMDB environment at `config.data_dir` and wires the claim
    /// engine to the match queue. Call [`start`](Self::start) to spawn the
    /// match worker and begin serving HTTP.
    pub async fn new(config: NodeConfig) -> Result<Self, NodeError> {
        config.validate()?;

        let store = Arc::new(LmdbStore::open(&config.data_dir, config.map_size_bytes())?);

        let registry = Registry::new();
        let dispatch_metrics = Arc::new(DispatchMetrics::register(&registry)?);
        let (dispatcher, match_receiver) =
            MatchDispatcher::channel(config.matching.queue_capacity, Arc::clone(&dispatch_metrics));

        let matcher: Arc<dyn Matcher> = match &config.matching.endpoint {
            Some(endpoint) => {
                tracing::info!(%endpoint, "matching enabled");
                Arc::new(HttpMatcher::new(endpoint.clone(), config.matching.timeout()))
            }
            None => {
                tracing::info!("no matching endpoint configured, matching disabled");
                Arc::new(DisabledMatcher)
            }
        };

        let queue: Arc<dyn MatchQueue> = Arc::new(dispatcher);
        let engine = Arc::new(ClaimEngine::new(
            Arc::clone(&store),
            Arc::new(TracingSink),
            queue,
            Arc::new(SystemClock),
        ));

        Ok(Self {
            config,
            store,
            engine,
            registry,
            dispatch_metrics,
            shutdown: Arc::new(ShutdownController::new()),
            match_receiver: Some(match_receiver),
            matcher,
            local_addr: None,
            task_handles: Vec::new(),
        })
    }

    /// Spawn the match worker and the HTTP API. Returns the bound address.
    pub async fn start(&mut self) -> Result<SocketAddr, NodeError> {
        tracing::info!(
            data_dir = %self.config.data_dir.display(),
            host = %self.config.rpc_host,
            port = self.config.rpc_port,
            metrics = self.config.enable_metrics,
            "reclaim node starting"
        );

        // ── Match worker ──────────────────────────────────────────────────
        if let Some(receiver) = self.match_receiver.take() {
            let worker = run_worker(
                receiver,
                Arc::clone(&self.matcher),
                self.config.matching.retry_policy(),
                Arc::clone(&self.dispatch_metrics),
                self.shutdown.subscribe(),
            );
            self.task_handles.push(tokio::spawn(worker));
        }

        // ── HTTP API ──────────────────────────────────────────────────────
        let registry = self
            .config
            .enable_metrics
            .then(|| self.registry.clone());
        let server = RpcServer::new(Arc::clone(&self.engine), registry)?;
        let listener =
            TcpListener::bind((self.config.rpc_host.as_str(), self.config.rpc_port)).await?;
        let local_addr = listener.local_addr()?;
        let signalled = self.shutdown.signalled();

        let rpc_handle = tokio::spawn(async move {
            match server.serve(listener, signalled).await {
                Ok(()) => tracing::info!("HTTP API stopped"),
                Err(e) => tracing::error!("HTTP API error: {e}"),
            }
        });
        self.task_handles.push(rpc_handle);
        self.local_addr = Some(local_addr);

        tracing::info!(addr = %local_addr, "reclaim node started");
        Ok(local_addr)
    }

    /// The address the HTTP API is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, NodeError> {
        self.local_addr.ok_or(NodeError::NotStarted)
    }

    /// Block until SIGINT or SIGTERM.
    pub async fn wait_for_signal(&self) {
        self.shutdown.wait_for_signal().await;
    }

    /// Stop the node gracefully.
    ///
    /// 1. Sends the shutdown signal to all background tasks.
    /// 2. Waits for them to finish (with timeout).
    /// 3. Flushes LMDB.
    pub async fn stop(&mut self) -> Result<(), NodeError> {
        tracing::info!("reclaim node stopping");
        self.shutdown.shutdown();

        let handles: Vec<JoinHandle<()>> = self.task_handles.drain(..).collect();
        let wait_all = async {
            for handle in handles {
                let _ = handle.await;
            }
        };
        if tokio::time::timeout(SHUTDOWN_TIMEOUT, wait_all).await.is_err() {
            tracing::warn!(
                "shutdown timeout ({:?}), some tasks may still be running",
                SHUTDOWN_TIMEOUT
            );
        }

        self.store.force_sync()?;
        tracing::info!(
            dropped = self.dispatch_metrics.dropped.get(),
            failed = self.dispatch_metrics.failed.get(),
            "reclaim node stopped"
        );
        Ok(())
    }
}
