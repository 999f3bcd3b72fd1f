use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{
    newsletter_client::SubscribeOutcome,
    web::{
        data::{DeserSubscription, GroupSelect},
        Error, WebResult,
    },
    AppState,
};

/// POST /mailer-lite — the caller picks the audience group.
#[tracing::instrument(name = "Forwarding subscription (caller-supplied group)", skip_all)]
pub async fn subscribe_with_group(
    State(app_state): State<AppState>,
    payload: Result<Json<DeserSubscription>, JsonRejection>,
) -> WebResult<Response> {
    forward_subscription(app_state, payload, GroupSelect::FromCaller).await
}

/// POST /api/subscribe — the audience group is a server-side constant.
#[tracing::instrument(name = "Forwarding subscription (configured group)", skip_all)]
pub async fn subscribe(
    State(app_state): State<AppState>,
    payload: Result<Json<DeserSubscription>, JsonRejection>,
) -> WebResult<Response> {
    forward_subscription(app_state, payload, GroupSelect::FromConfig).await
}

/// The one forwarder both route variants share, parameterized by the
/// group-selection policy.
///
/// Checks run in a fixed order, all before any outbound call:
/// missing API key, unparseable body, missing fields. Downstream rejections
/// are relayed verbatim; downstream success is normalized to `{ok: true}`.
async fn forward_subscription(
    app_state: AppState,
    payload: Result<Json<DeserSubscription>, JsonRejection>,
    group_select: GroupSelect,
) -> WebResult<Response> {
    let client = &app_state.newsletter_client;

    // A missing key is a deployment error and takes precedence over any
    // problem with the request itself.
    client.ensure_configured()?;

    let Json(deser_sub) = payload.map_err(|er| Error::BodyRejection(er.body_text()))?;
    let subscription = deser_sub.into_valid(group_select, client.group_id())?;

    match client.subscribe(&subscription).await? {
        SubscribeOutcome::Accepted => Ok((StatusCode::OK, Json(json!({"ok": true}))).into_response()),
        SubscribeOutcome::Rejected { status, body } => Ok((status, Json(body)).into_response()),
    }
}
