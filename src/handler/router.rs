//! Request routing dispatch module
//!
//! Decides between a registered route and static file lookup, and turns
//! either outcome into a response descriptor.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::config::AppState;
use crate::error::ServerError;
use crate::http::{Request, Response};
use crate::logger;
use crate::routing::Handler;

/// Main entry point for request handling
///
/// Only `GET` consults the route registry; every other method, and every
/// unmatched path, goes to static resolution.
pub async fn handle_request(req: &Request, state: &AppState) -> Response {
    if req.is_get() {
        if let Some(handler) = state.routes.lookup(req.path()) {
            return invoke_handler(handler.as_ref(), req);
        }
    }
    serve_static(req, state).await
}

/// Run application logic, converting errors and panics into a 500
fn invoke_handler(handler: &dyn Handler, req: &Request) -> Response {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler.handle(req)));
    let message = match outcome {
        Ok(Ok(body)) => return Response::json(body),
        Ok(Err(err)) => err.to_string(),
        Err(payload) => panic_message(payload.as_ref()),
    };

    logger::log_error(&format!("Route handler for '{}' failed: {message}", req.path()));
    ServerError::RouteHandlerFailure(message).into_response()
}

async fn serve_static(req: &Request, state: &AppState) -> Response {
    match state.statics.resolve(req.path()).await {
        Ok(file) => Response::file(file.data, file.content_type),
        Err(err) => {
            if matches!(err, ServerError::Io { .. }) {
                logger::log_error(&err.to_string());
            }
            err.into_response()
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}
