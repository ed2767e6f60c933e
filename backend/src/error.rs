//! Error handling for the Farm Grid Management server
//!
//! Provides consistent error responses in English and French

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::GridError;
use thiserror::Error;

/// Message shown to owners when a zone does not fit in the farm
pub const CAPACITY_EXCEEDED_FR: &str =
    "La somme des surfaces des zones dépasse la surface de la ferme.";

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_fr: String,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Placement rules
    #[error("Zone area {candidate_area} m² exceeds farm capacity ({used_area} of {farm_area} m² used)")]
    CapacityExceeded {
        farm_area: Decimal,
        used_area: Decimal,
        candidate_area: Decimal,
    },

    #[error("Zone width {width} m is too narrow for a row of trees")]
    InvalidZoneDimensions { width: Decimal },

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Field-level validation failure
    pub fn invalid(field: &str, message: &str, message_fr: &str) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.to_string(),
            message_fr: message_fr.to_string(),
        }
    }
}

impl From<GridError> for AppError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::InvalidZoneDimensions { width } => AppError::InvalidZoneDimensions { width },
            GridError::CountOutOfRange { count } => AppError::Validation {
                field: "count".to_string(),
                message: err.to_string(),
                message_fr: format!(
                    "Le nombre d'arbres ({}) doit être compris entre 1 et {}",
                    count,
                    shared::MAX_BULK_TREES
                ),
            },
            GridError::RowOutOfRange { .. } => AppError::Validation {
                field: "row_start".to_string(),
                message: err.to_string(),
                message_fr: "La rangée dépasse la grille adressable".to_string(),
            },
            GridError::NegativeArea { .. } => AppError::Validation {
                field: "area".to_string(),
                message: err.to_string(),
                message_fr: "La surface ne peut pas être négative".to_string(),
            },
            GridError::AreaOverflow => AppError::Validation {
                field: "area".to_string(),
                message: err.to_string(),
                message_fr: "La surface est trop grande pour être calculée".to_string(),
            },
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let mut fields: Vec<&'static str> = field_errors.keys().copied().collect();
        fields.sort_unstable();

        let Some(&field) = fields.first() else {
            return AppError::ValidationError(errors.to_string());
        };
        let message = field_errors
            .get(&field)
            .and_then(|errs| errs.first())
            .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| format!("Invalid value for {}", field));

        AppError::Validation {
            field: field.to_string(),
            message,
            message_fr: format!("Valeur invalide pour {}", field),
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_fr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Validation {
                field,
                message,
                message_fr,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: message.clone(),
                    message_fr: message_fr.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: msg.clone(),
                    message_fr: format!("Données invalides : {}", msg),
                    field: None,
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message_en: format!("{} not found", resource),
                    message_fr: format!("{} introuvable", resource),
                    field: None,
                },
            ),
            AppError::CapacityExceeded { .. } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "CAPACITY_EXCEEDED".to_string(),
                    message_en: "The total zone area exceeds the farm area".to_string(),
                    message_fr: CAPACITY_EXCEEDED_FR.to_string(),
                    field: None,
                },
            ),
            AppError::InvalidZoneDimensions { width } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "INVALID_ZONE_DIMENSIONS".to_string(),
                    message_en: format!(
                        "Zone width {} m is narrower than the {} m tree spacing",
                        width,
                        shared::SPACING
                    ),
                    message_fr: format!(
                        "La largeur de la zone ({} m) est inférieure à l'espacement de {} m entre les arbres",
                        width,
                        shared::SPACING
                    ),
                    field: Some("width".to_string()),
                },
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message_en: format!("Configuration error: {}", msg),
                    message_fr: format!("Erreur de configuration : {}", msg),
                    field: None,
                },
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATABASE_ERROR".to_string(),
                    message_en: "A database error occurred".to_string(),
                    message_fr: "Une erreur de base de données est survenue".to_string(),
                    field: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: msg.clone(),
                    message_fr: "Erreur interne du serveur".to_string(),
                    field: None,
                },
            ),
        };

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
