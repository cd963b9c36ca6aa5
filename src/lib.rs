pub mod api;
pub mod appresult;
pub mod config;
pub mod error;
pub mod export;
pub mod links;
pub mod pairing;
pub mod pairs;
pub mod participants;
pub mod res;

use axum::{
    Router,
    debug_handler,
    extract::FromRef,
    response::{Html, IntoResponse},
    routing::get,
};
use tower_cookies::CookieManagerLayer;
use tower_http::cors::CorsLayer;

use pairing::CookieSettings;

pub use appresult::{AppError, AppResult};
pub use config::Config;
pub use error::{SantaError, SantaResult};
pub use links::{LinkCodec, LinkParams, ReceiverData, StoredPairing};
pub use pairs::{Assignment, GeneratedPairs, generate_pairs};
pub use participants::{Participant, ParticipantSet};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub codec: LinkCodec,
    pub cookies: CookieSettings,
}

pub fn app(config: &Config) -> anyhow::Result<Router> {
    let app_state = AppState {
        codec: LinkCodec::new(&config.public_url)?,
        cookies: CookieSettings {
            secure: config.public_url.scheme() == "https",
            max_age: time::Duration::days(config.cookie_days),
        },
    };

    Ok(Router::new()
        .route("/", get(index))
        .route("/pairing", get(pairing::pairing_page))
        .nest("/api", api::router())
        .with_state(app_state)
        .layer(CookieManagerLayer::new())
        .layer(CorsLayer::permissive()))
}

#[debug_handler]
async fn index() -> impl IntoResponse {
    Html(include_res!(str, "/pages/index.html"))
}
