use axum::{
    debug_handler,
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
};
use tower_cookies::Cookies;

use crate::{
    AppResult, include_res,
    links::{LinkParams, StoredPairing},
    res,
};

use super::{CookiePairingStore, CookieSettings, resolve_pairing};

#[debug_handler(state = crate::AppState)]
pub(crate) async fn pairing_page(
    State(settings): State<CookieSettings>,
    cookies: Cookies,
    Query(params): Query<LinkParams>,
) -> AppResult<Response> {
    let store = CookiePairingStore::new(cookies, settings);
    let (pairing, source) = resolve_pairing(&store, &params).await?;

    tracing::info!(?source, "revealed pairing");

    Ok(Html(render(&pairing)).into_response())
}

fn render(StoredPairing { giver, receiver, instructions }: &StoredPairing) -> String {
    let notes: String = [receiver.hint.as_deref(), instructions.as_deref()]
        .into_iter()
        .flatten()
        .map(res::text_block)
        .collect();
    let notes = if notes.is_empty() {
        notes
    } else {
        res::fill(include_res!(str, "/pages/notes.html"), &[("notes", notes.as_str())])
    };

    let giver = res::escape_html(giver);
    let receiver = res::escape_html(&receiver.name);
    res::fill(
        include_res!(str, "/pages/pairing.html"),
        &[
            ("giver", giver.as_str()),
            ("receiver", receiver.as_str()),
            ("notes", notes.as_str()),
        ],
    )
}
