use axum::{Json, debug_handler};
use serde::Deserialize;

use crate::{
    AppResult,
    pairs::{GeneratedPairs, generate_pairs},
    participants::ParticipantSet,
};

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateRequest {
    participants: ParticipantSet,
}

#[debug_handler]
pub(crate) async fn generate(
    Json(GenerateRequest { participants }): Json<GenerateRequest>,
) -> AppResult<Json<GeneratedPairs>> {
    Ok(Json(generate_pairs(&participants)?))
}
