//! Shared request wrapper for resource endpoints.

use std::future::Future;

use axum::response::{IntoResponse, Response};
use tracing::Instrument;

use crate::error::AppError;

/// Run one endpoint body with uniform logging and status translation.
///
/// Entry is logged at info inside a span carrying `resource` and
/// `operation`. An `Err` is rendered through [`AppError`], which logs
/// rejections at warn and faults at error within the same span.
pub async fn guarded<F, R>(resource: &'static str, operation: &'static str, work: F) -> Response
where
    F: Future<Output = Result<R, AppError>>,
    R: IntoResponse,
{
    let span = tracing::info_span!("endpoint", resource, operation);

    async move {
        tracing::info!("handling request");
        match work.await {
            Ok(reply) => reply.into_response(),
            Err(err) => err.into_response(),
        }
    }
    .instrument(span)
    .await
}
