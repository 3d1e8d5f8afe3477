use std::sync::Arc;

use axum::{
    handler::Handler,
    routing::{on, MethodFilter, MethodRouter},
    Router,
};

use super::{
    middleware::{layer_group, layer_route},
    HttpMiddleware, Middleware, ServerError,
};

/// An HTTP endpoint: method, path, handler and the middleware that wraps
/// only this handler.
pub struct Route<S = ()> {
    method: MethodFilter,
    path: String,
    handler: MethodRouter<S>,
    middleware: Vec<Middleware>,
}

impl<S> Route<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new<H, T>(
        method: MethodFilter,
        path: impl Into<String>,
        handler: H,
    ) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        Self {
            method,
            path: path.into(),
            handler: on(method, handler),
            middleware: Vec::new(),
        }
    }

    pub fn with_middleware<M>(mut self, middleware: M) -> Self
    where
        M: HttpMiddleware + Send + Sync + 'static,
    {
        self.middleware.push(Arc::new(middleware));
        self
    }

    pub fn method(&self) -> MethodFilter {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Checks the path and wraps the handler in its middleware chain.
    pub(crate) fn into_parts(
        self,
    ) -> Result<(String, MethodRouter<S>), ServerError> {
        if !self.path.starts_with('/') {
            return Err(ServerError::InvalidRoutePath(self.path));
        }
        let handler = layer_route(self.handler, &self.middleware);
        Ok((self.path, handler))
    }
}

/// Routes sharing a path prefix and a middleware chain. The group chain
/// runs outside each route's own chain.
pub struct RouteGroup<S = ()> {
    prefix: String,
    routes: Vec<Route<S>>,
    middleware: Vec<Middleware>,
}

impl<S> RouteGroup<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            routes: Vec::new(),
            middleware: Vec::new(),
        }
    }

    pub fn with_middleware<M>(mut self, middleware: M) -> Self
    where
        M: HttpMiddleware + Send + Sync + 'static,
    {
        self.middleware.push(Arc::new(middleware));
        self
    }

    pub fn add_route(&mut self, route: Route<S>) {
        self.routes.push(route);
    }

    pub fn route(mut self, route: Route<S>) -> Self {
        self.add_route(route);
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn routes(&self) -> &[Route<S>] {
        &self.routes
    }

    /// Builds the group's router. The prefix comes back trimmed of any
    /// trailing `/`, so the root group yields an empty prefix.
    pub(crate) fn into_parts(self) -> Result<(String, Router<S>), ServerError> {
        let prefix = self.prefix.trim_end_matches('/').to_owned();
        if !prefix.is_empty() && !prefix.starts_with('/') {
            return Err(ServerError::InvalidRoutePath(self.prefix));
        }

        if self.routes.is_empty() {
            return Ok((prefix, Router::new()));
        }

        let mut router = Router::new();
        for route in self.routes {
            let (path, handler) = route.into_parts()?;
            router = router.route(&path, handler);
        }

        Ok((prefix, layer_group(router, &self.middleware)))
    }
}
