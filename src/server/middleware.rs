use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::{from_fn_with_state, Next},
    response::Response,
    routing::MethodRouter,
    Router,
};
use tracing::Span;

use crate::utils::tracing::REQUEST_ID_FIELD;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// A request processor that runs around a handler, or around the rest of
/// the chain it was registered in.
#[async_trait::async_trait]
pub trait HttpMiddleware {
    async fn handle(&self, request: Request, next: Next) -> Response;
}

pub type Middleware = Arc<dyn HttpMiddleware + Send + Sync>;

async fn run_middleware(
    State(middleware): State<Middleware>,
    request: Request,
    next: Next,
) -> Response {
    middleware.handle(request, next).await
}

// Layers are applied innermost first, so each chain is folded in reverse
// to leave the first declared middleware outermost.

pub(crate) fn layer_route<S>(
    route: MethodRouter<S>,
    chain: &[Middleware],
) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    chain.iter().rev().fold(route, |route, middleware| {
        route.route_layer(from_fn_with_state(
            Arc::clone(middleware),
            run_middleware,
        ))
    })
}

pub(crate) fn layer_group<S>(
    router: Router<S>,
    chain: &[Middleware],
) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    chain.iter().rev().fold(router, |router, middleware| {
        router.route_layer(from_fn_with_state(
            Arc::clone(middleware),
            run_middleware,
        ))
    })
}

pub(crate) fn layer_global<S>(
    router: Router<S>,
    chain: &[Middleware],
) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    chain.iter().rev().fold(router, |router, middleware| {
        router.layer(from_fn_with_state(
            Arc::clone(middleware),
            run_middleware,
        ))
    })
}

/// Tags every request and its response with an `x-request-id`, keeping
/// the caller's value when one was sent. The id is also recorded on the
/// request span so log lines match what the caller sees.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestId;

#[async_trait::async_trait]
impl HttpMiddleware for RequestId {
    async fn handle(&self, mut request: Request, next: Next) -> Response {
        let request_id = match request.headers().get(REQUEST_ID_HEADER) {
            Some(value) => Some(value.clone()),
            None => HeaderValue::from_str(&uuid::Uuid::new_v4().to_string())
                .ok(),
        };

        if let Some(request_id) = &request_id {
            if let Ok(value) = request_id.to_str() {
                Span::current().record(REQUEST_ID_FIELD, value);
            }
            request
                .headers_mut()
                .insert(REQUEST_ID_HEADER, request_id.clone());
        }

        let mut response = next.run(request).await;

        if let Some(request_id) = request_id {
            response.headers_mut().insert(REQUEST_ID_HEADER, request_id);
        }
        response
    }
}
