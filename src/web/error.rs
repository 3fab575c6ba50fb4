// src/web/error.rs
//
// Erreurs de l’API -> statut HTTP + corps {"error": ...}.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use crate::erreur::ErreurTaux;

use super::dto::ErreurReponse;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Le détail reste dans les journaux : le client reçoit toujours le même message.
    #[error("Invalid Expression")]
    ExpressionInvalide,

    #[error(transparent)]
    Taux(#[from] ErreurTaux),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::ExpressionInvalide => StatusCode::BAD_REQUEST,
            ApiError::Taux(e) => {
                error!(erreur = %e, "taux de change indisponibles");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let corps = ErreurReponse {
            error: self.to_string(),
        };
        (status, Json(corps)).into_response()
    }
}
