//! Error types for the game API server.
//!
//! [`ApiError`] unifies all failure modes into a single enum that
//! converts into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.
//! Validation rejections keep their structured payload so clients can
//! react to the specific reason, not just the status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tycoon_core::commands::CommandError;
use tycoon_types::Rejection;

/// Errors that can occur in the game API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request carries no (or an unparseable) player identity cookie.
    #[error("no player identity; call GET /api/me first")]
    Unauthorized,

    /// A command failed validation; the game state is untouched.
    #[error("{0}")]
    Rejected(Rejection),

    /// The requested entity was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// A serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<CommandError> for ApiError {
    fn from(error: CommandError) -> Self {
        match error {
            CommandError::Rejected { rejection } => Self::Rejected(rejection),
            CommandError::UnknownBuilding { .. }
            | CommandError::UnknownPlanet { .. }
            | CommandError::UnknownSystem { .. }
            | CommandError::UnknownSkill { .. } => Self::NotFound(error.to_string()),
            CommandError::MissingCurrentPlanet { .. } => Self::Internal(error.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Rejected(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Serialization(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let mut body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        // Rejections carry their tagged payload so clients can branch on
        // the reason without parsing the message.
        if let Self::Rejected(rejection) = &self {
            if let (Some(object), Ok(payload)) =
                (body.as_object_mut(), serde_json::to_value(rejection))
            {
                object.insert("rejection".to_owned(), payload);
            }
        }

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use tycoon_types::BuildingId;

    #[test]
    fn command_errors_map_to_status_classes() {
        let rejected: ApiError = CommandError::Rejected {
            rejection: Rejection::TileOccupied,
        }
        .into();
        assert!(matches!(rejected, ApiError::Rejected(_)));

        let unknown: ApiError = CommandError::UnknownBuilding {
            building: BuildingId::from("warp_gate"),
        }
        .into();
        assert!(matches!(unknown, ApiError::NotFound(_)));

        let internal: ApiError = CommandError::MissingCurrentPlanet {
            planet: tycoon_types::PlanetKey::from("sol-9"),
        }
        .into();
        assert!(matches!(internal, ApiError::Internal(_)));
    }

    #[test]
    fn rejection_response_is_conflict() {
        let response = ApiError::Rejected(Rejection::NoBuildingSelected).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn unauthorized_response_is_401() {
        let response = ApiError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
