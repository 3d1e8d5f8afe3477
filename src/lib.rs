use std::{error::Error, net::SocketAddr, sync::Arc};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tokio::signal;
use tracing::Level;

use domain::MemberAPIError;
use routes::member_routes;
use server::{
    ErrorBodyWritten, HttpServer, Middleware, RequestId, ServerError,
    ServerErrors,
};
pub mod app_state;
pub mod domain;
pub mod routes;
pub mod server;
pub mod services;
pub use app_state::AppState;
pub mod utils;

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for MemberAPIError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            MemberAPIError::InvalidMemberId(_) => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::BAD_REQUEST, "Invalid member ID".to_string())
            }
            MemberAPIError::MalformedRequest(_) => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::BAD_REQUEST, "Invalid member data".to_string())
            }
            MemberAPIError::MemberNotFound(_) => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::NOT_FOUND, "Member not found".to_string())
            }
            MemberAPIError::ValidationError(message) => {
                log_error_chain(&self, Level::DEBUG);
                (
                    StatusCode::BAD_REQUEST,
                    format!("Validation error: {message}"),
                )
            }
            MemberAPIError::UnexpectedError(_) => {
                log_error_chain(&self, Level::ERROR);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
            }
        };
        let body = Json(ErrorResponse {
            error: error_message,
        });
        let mut response = (status, body).into_response();
        response.extensions_mut().insert(ErrorBodyWritten);
        response
    }
}

fn log_error_chain(e: &(dyn Error + 'static), debug_level: Level) {
    let separator =
        "\n----------------------------------------------------------------\n";
    let mut report = format!("{}{:?}\n", separator, e);
    let mut current = e.source();
    while let Some(cause) = current {
        let str = format!("Caused by:\n\n{:?}", cause);
        report = format!("{}\n{}", report, str);
        current = cause.source();
    }
    report = format!("{}\n{}", report, separator);
    match debug_level {
        Level::ERROR => tracing::error!("{}", report),
        Level::WARN => tracing::warn!("{}", report),
        Level::INFO => tracing::info!("{}", report),
        Level::DEBUG => tracing::debug!("{}", report),
        Level::TRACE => tracing::trace!("{}", report),
    }
}

/// The roster service: member routes behind request IDs, served by an
/// [`HttpServer`].
pub struct Application {
    server: HttpServer<AppState>,
}

impl Application {
    pub fn build(app_state: AppState, port: u16) -> Result<Self, ServerError> {
        let middleware: Vec<Middleware> = vec![Arc::new(RequestId)];

        let mut server = HttpServer::new(port, app_state, middleware);
        server.add_route_group(member_routes())?;

        Ok(Application { server })
    }

    pub async fn start(&mut self) -> Result<ServerErrors, ServerError> {
        self.server.start().await
    }

    /// The bound address, once started.
    pub fn local_address(&self) -> Option<SocketAddr> {
        self.server.local_address()
    }

    pub async fn stop(&mut self) -> Result<(), ServerError> {
        self.server.stop().await
    }

    /// Serves until the process is told to shut down or the server fails,
    /// then drains in-flight requests.
    pub async fn run(mut self) -> Result<(), ServerError> {
        let errors = self.start().await?;

        let failure = tokio::select! {
            error = errors => error.ok(),
            _ = shutdown_signal() => None,
        };

        let stopped = self.stop().await;
        match failure {
            Some(e) => Err(e),
            None => stopped,
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = ?e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(e) => {
                tracing::error!(error = ?e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

pub async fn get_postgres_pool(
    url: &Secret<String>,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(url.expose_secret())
        .await
}
