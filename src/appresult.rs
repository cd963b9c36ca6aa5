use axum::{http::StatusCode, response::{IntoResponse, Response}};

use crate::{error::SantaError, res};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self.0.downcast_ref::<SantaError>() {
            Some(err) if err.is_unresolvable_link() => {
                tracing::warn!(%err, "could not resolve link");
                res::sorry()
            }
            Some(err) if err.is_invalid_participants() => {
                (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()).into_response()
            }
            _ => {
                tracing::error!(error = %self.0, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("{}\n\n{}", self.0, self.0.backtrace()),
                )
                    .into_response()
            }
        }
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
