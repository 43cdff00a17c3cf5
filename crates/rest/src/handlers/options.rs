//! Options handler.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ldp_persistence::core::ResourceStorage;
use tracing::debug;

use crate::auth::Authenticated;
use crate::error::RestResult;
use crate::extractors::LdpTarget;
use crate::responses::headers::LdpHeaders;
use crate::state::AppState;

/// Handler for `OPTIONS`.
///
/// Returns the methods and media types the resource accepts, without a
/// body.
///
/// # HTTP Request
///
/// `OPTIONS [base]/[path]`
///
/// # Response
///
/// - `200 OK` - `Allow`, `Accept-Post` (containers), `Accept-Patch` (RDF)
///   and the `Link` type headers
/// - `404 Not Found` - Resource does not exist
pub async fn options_handler<S>(
    State(state): State<AppState<S>>,
    Authenticated(principal): Authenticated,
    LdpTarget(target): LdpTarget,
) -> RestResult<Response>
where
    S: ResourceStorage,
{
    debug!(path = %target.path, "Processing options request");

    let view = state.repository().get(&principal, &target).await?;
    Ok((StatusCode::OK, LdpHeaders::for_view(&view).to_header_map()).into_response())
}
