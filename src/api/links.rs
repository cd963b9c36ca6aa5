use axum::{
    Json, debug_handler,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{
    AppResult,
    export::{CSV_FILENAME, POSTCARDS_FILENAME, pairs_csv, postcards_html},
    links::LinkCodec,
    pairs::GeneratedPairs,
    participants::ParticipantSet,
};

#[derive(Debug, Deserialize)]
pub(crate) struct LinksRequest {
    pairs: GeneratedPairs,
    participants: ParticipantSet,
    #[serde(default)]
    instructions: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LinksResponse {
    stale: bool,
    links: Vec<IssuedLink>,
}

#[derive(Debug, Serialize)]
pub(crate) struct IssuedLink {
    giver: String,
    link: String,
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn links(
    State(codec): State<LinkCodec>,
    Json(LinksRequest { pairs, participants, instructions }): Json<LinksRequest>,
) -> AppResult<Json<LinksResponse>> {
    let stale = pairs.is_stale(&participants);
    if stale {
        tracing::warn!("issuing links for pairs drawn from an older participant list");
    }

    let links = pairs
        .resolve(&participants)
        .into_iter()
        .map(|pairing| -> AppResult<IssuedLink> {
            let link = codec.encode(
                &pairing.giver,
                &pairing.receiver,
                pairing.hint.as_deref(),
                instructions.as_deref(),
            )?;
            Ok(IssuedLink { giver: pairing.giver, link: link.into() })
        })
        .collect::<AppResult<Vec<_>>>()?;

    tracing::info!(links = links.len(), stale, "issued links");

    Ok(Json(LinksResponse { stale, links }))
}

#[debug_handler]
pub(crate) async fn links_csv(
    Json(LinksRequest { pairs, participants, .. }): Json<LinksRequest>,
) -> AppResult<Response> {
    let csv = pairs_csv(&pairs.resolve(&participants));

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{CSV_FILENAME}\"")),
        ],
        csv,
    )
        .into_response())
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn links_postcards(
    State(codec): State<LinkCodec>,
    Json(LinksRequest { pairs, participants, instructions }): Json<LinksRequest>,
) -> AppResult<Response> {
    let html = postcards_html(&pairs.resolve(&participants), &codec, instructions.as_deref())?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_owned()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{POSTCARDS_FILENAME}\"")),
        ],
        html,
    )
        .into_response())
}
