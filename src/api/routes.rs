use axum::{
    extract::{rejection::JsonRejection, State},
    http::Uri,
    routing::{get, post},
    Json, Router,
};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::appliance::{ControlEngine, StatusSnapshot};

use super::{commands::*, ApiError, Message};


pub fn router(engine: ControlEngine) -> Router {
    Router::new()
        .route("/api/status", get(status))
        .route(TogglePower::PATH, post(empty_command::<TogglePower>))
        .route(RefillWater::PATH, post(empty_command::<RefillWater>))
        .route(SetTargetTemperature::PATH, post(command::<SetTargetTemperature>))
        .route(SetTargetHumidity::PATH, post(command::<SetTargetHumidity>))
        .route(SetFanSpeed::PATH, post(command::<SetFanSpeed>))
        .route(SetTimer::PATH, post(command::<SetTimer>))
        .fallback(not_found)
        .with_state(engine)
}

async fn status(State(engine): State<ControlEngine>) -> Json<StatusSnapshot> {
    Json(engine.get_status().await)
}

async fn command<C>(
    State(engine): State<ControlEngine>,
    body: Result<Json<C>, JsonRejection>
) -> Result<Json<Message>, ApiError> where
    C: Command + DeserializeOwned
{
    let Json(cmd) = body.map_err(|rejection| {
        warn!(path = C::PATH, "rejected request: {rejection}");
        ApiError::from(rejection)
    })?;

    let ack = cmd.apply(&engine).await;
    debug!(path = C::PATH, ack = %ack, "command applied");

    Ok(Json(ack.into()))
}

async fn empty_command<C>(State(engine): State<ControlEngine>) -> Json<Message> where
    C: Command + Default
{
    let ack = C::default().apply(&engine).await;
    debug!(path = C::PATH, ack = %ack, "command applied");

    Json(ack.into())
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
