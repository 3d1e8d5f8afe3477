//! The HTTP server: owns the axum router and the task serving it, and
//! moves through `Created -> Running -> Stopped` exactly once.

mod error_handler;
mod middleware;
mod route;

use std::{fmt, mem, net::SocketAddr, time::Duration};

use axum::{middleware::from_fn, Router};
use thiserror::Error;
use tokio::{net::TcpListener, sync::oneshot, task::JoinError, task::JoinHandle};
use tower_http::trace::TraceLayer;

pub use error_handler::*;
pub use middleware::{HttpMiddleware, Middleware, RequestId, REQUEST_ID_HEADER};
pub use route::*;

use crate::utils::{
    constants::SHUTDOWN_TIMEOUT,
    tracing::{make_span_with_request_id, on_request, on_response},
};
use middleware::layer_global;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Created,
    Running,
    Stopped,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self {
            Self::Created => "created",
            Self::Running => "running",
            Self::Stopped => "stopped",
        };
        f.write_str(state)
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Cannot {operation} a server that is {state}")]
    InvalidLifecycleTransition {
        operation: &'static str,
        state: Lifecycle,
    },
    #[error("Invalid route path: {0}")]
    InvalidRoutePath(String),
    #[error("Failed to bind {address}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("Server stopped unexpectedly")]
    Serve(#[source] std::io::Error),
    #[error("Graceful shutdown did not finish within {0:?}")]
    ShutdownTimeout(Duration),
    #[error("Server task failed")]
    Task(#[source] JoinError),
}

/// Delivers at most one error: the reason serving ended, unless it ended
/// because `stop` was called. Closes without a value otherwise.
pub type ServerErrors = oneshot::Receiver<ServerError>;

pub struct HttpServer<S = ()> {
    address: SocketAddr,
    shutdown_timeout: Duration,
    router: Router<S>,
    state: S,
    middleware: Vec<Middleware>,
    lifecycle: Lifecycle,
    local_address: Option<SocketAddr>,
    shutdown: Option<oneshot::Sender<()>>,
    serve_task: Option<JoinHandle<()>>,
}

impl<S> HttpServer<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// `middleware` wraps every request, including those that match no
    /// route. Port `0` picks a free port, see [`Self::local_address`].
    pub fn new(port: u16, state: S, middleware: Vec<Middleware>) -> Self {
        Self {
            address: SocketAddr::from(([0, 0, 0, 0], port)),
            shutdown_timeout: SHUTDOWN_TIMEOUT,
            router: Router::new(),
            state,
            middleware,
            lifecycle: Lifecycle::Created,
            local_address: None,
            shutdown: None,
            serve_task: None,
        }
    }

    pub fn with_shutdown_timeout(mut self, shutdown_timeout: Duration) -> Self {
        self.shutdown_timeout = shutdown_timeout;
        self
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// The address actually bound, once `start` has succeeded.
    pub fn local_address(&self) -> Option<SocketAddr> {
        self.local_address
    }

    pub fn add_route(&mut self, route: Route<S>) -> Result<(), ServerError> {
        self.expect_lifecycle("add a route to", Lifecycle::Created)?;
        tracing::debug!(
            method = ?route.method(),
            path = route.path(),
            "Adding route"
        );

        let (path, handler) = route.into_parts()?;
        self.router = mem::take(&mut self.router).route(&path, handler);
        Ok(())
    }

    pub fn add_route_group(
        &mut self,
        route_group: RouteGroup<S>,
    ) -> Result<(), ServerError> {
        self.expect_lifecycle("add a route group to", Lifecycle::Created)?;
        tracing::debug!(
            prefix = route_group.prefix(),
            routes = route_group.routes().len(),
            "Adding route group"
        );

        let (prefix, group) = route_group.into_parts()?;
        let router = mem::take(&mut self.router);
        self.router = if prefix.is_empty() {
            router.merge(group)
        } else {
            router.nest(&prefix, group)
        };
        Ok(())
    }

    /// Binds the listener and serves on a spawned task. Returns as soon as
    /// the task is running; bind and serve failures arrive on the returned
    /// channel.
    pub async fn start(&mut self) -> Result<ServerErrors, ServerError> {
        self.expect_lifecycle("start", Lifecycle::Created)?;
        self.lifecycle = Lifecycle::Running;

        let (error_tx, error_rx) = oneshot::channel();

        let listener = match TcpListener::bind(self.address).await {
            Ok(listener) => listener,
            Err(source) => {
                let _ = error_tx.send(ServerError::Bind {
                    address: self.address,
                    source,
                });
                return Ok(error_rx);
            }
        };
        self.local_address = listener.local_addr().ok();
        if let Some(address) = self.local_address {
            tracing::debug!("listening on {}", address);
        }

        let app = self.build_app();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        self.shutdown = Some(shutdown_tx);

        self.serve_task = Some(tokio::spawn(async move {
            let shutdown_signal = async move {
                // A dropped sender shuts the server down as well.
                let _ = shutdown_rx.await;
            };
            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal)
                .await
            {
                let _ = error_tx.send(ServerError::Serve(e));
            }
        }));

        Ok(error_rx)
    }

    /// Stops accepting connections and waits for in-flight requests, up to
    /// the shutdown timeout. Past the timeout the accept loop is dropped
    /// and `ShutdownTimeout` is returned; requests already being served
    /// are not cancelled and may still complete.
    pub async fn stop(&mut self) -> Result<(), ServerError> {
        self.expect_lifecycle("stop", Lifecycle::Running)?;
        self.lifecycle = Lifecycle::Stopped;

        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }

        let Some(mut serve_task) = self.serve_task.take() else {
            return Ok(());
        };

        match tokio::time::timeout(self.shutdown_timeout, &mut serve_task)
            .await
        {
            Ok(Ok(())) => {
                tracing::debug!("Server stopped");
                Ok(())
            }
            Ok(Err(e)) => Err(ServerError::Task(e)),
            Err(_) => {
                serve_task.abort();
                tracing::warn!(
                    timeout = ?self.shutdown_timeout,
                    "Graceful shutdown timed out, accept loop aborted"
                );
                Err(ServerError::ShutdownTimeout(self.shutdown_timeout))
            }
        }
    }

    fn expect_lifecycle(
        &self,
        operation: &'static str,
        expected: Lifecycle,
    ) -> Result<(), ServerError> {
        if self.lifecycle != expected {
            return Err(ServerError::InvalidLifecycleTransition {
                operation,
                state: self.lifecycle,
            });
        }
        Ok(())
    }

    // Error handler innermost, then the global chain, then request tracing.
    fn build_app(&mut self) -> Router {
        let router =
            mem::take(&mut self.router).layer(from_fn(handle_error_responses));
        let router = layer_global(router, &self.middleware);
        router
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(make_span_with_request_id)
                    .on_request(on_request)
                    .on_response(on_response),
            )
            .with_state(self.state.clone())
    }
}
