use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::Response,
};

/// Response extension set by error types that write their own body. The
/// error handler leaves such responses alone.
#[derive(Debug, Clone, Copy)]
pub struct ErrorBodyWritten;

pub fn generic_error_message(status: StatusCode) -> &'static str {
    match status.as_u16() {
        400 => "error 400",
        403 => "error 403",
        500 => "error 500",
        503 => "error 503",
        _ => "Generic Exception",
    }
}

/// Gives every error response without a body of its own the generic
/// message for its status. `HEAD` requests get the status only.
pub async fn handle_error_responses(request: Request, next: Next) -> Response {
    let is_head = request.method() == Method::HEAD;
    let response = next.run(request).await;

    let status = response.status();
    if !(status.is_client_error() || status.is_server_error())
        || response.extensions().get::<ErrorBodyWritten>().is_some()
    {
        return response;
    }

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);

    if is_head {
        parts.headers.remove(header::CONTENT_TYPE);
        return Response::from_parts(parts, Body::empty());
    }

    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    let body = serde_json::Value::from(generic_error_message(status));
    Response::from_parts(parts, Body::from(body.to_string()))
}
