mod generate;
mod links;

use axum::{Router, routing::post};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pairs", post(generate::generate))
        .route("/links", post(links::links))
        .route("/links/csv", post(links::links_csv))
        .route("/links/postcards", post(links::links_postcards))
}
