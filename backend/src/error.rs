//! Error handling for the inventory backend
//!
//! Provides consistent error responses in English and Spanish

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::{BasketError, SaleError, StockError};
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_es: String,
    },

    #[error("Invalid quantity {quantity}")]
    InvalidQuantity {
        product_id: Option<String>,
        quantity: i32,
    },

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Conflict: {message}")]
    Conflict {
        resource: String,
        message: String,
        message_es: String,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Stock errors
    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        requested: i32,
        available: i32,
    },

    // The sale is committed at this point; only the receipt file is missing
    #[error("Receipt {receipt_id} could not be written: {message}")]
    ReceiptWriteFailed { receipt_id: String, message: String },

    #[error("Storage error: {0}")]
    StorageError(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(sqlx::Error),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

impl AppError {
    pub fn validation(field: &str, message: &str, message_es: &str) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.to_string(),
            message_es: message_es.to_string(),
        }
    }
}

/// Tables whose names prefix their constraint names, longest first
const CONSTRAINT_TABLES: [&str; 7] = [
    "supplier_backups",
    "purchase_lines",
    "categories",
    "suppliers",
    "purchases",
    "products",
    "clients",
];

/// Turn a constraint name such as `clients_email_key` into the field it guards
fn constraint_field(constraint: Option<&str>) -> String {
    match constraint {
        Some(name) if name.ends_with("_pkey") => "id".to_string(),
        Some(name) => {
            let trimmed = name
                .strip_suffix("_fkey")
                .or_else(|| name.strip_suffix("_key"))
                .unwrap_or(name);
            CONSTRAINT_TABLES
                .iter()
                .find_map(|table| {
                    trimmed
                        .strip_prefix(*table)
                        .and_then(|rest| rest.strip_prefix('_'))
                })
                .filter(|field| !field.is_empty())
                .unwrap_or(trimmed)
                .to_string()
        }
        None => "key".to_string(),
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return AppError::DuplicateKey(constraint_field(db_err.constraint()));
            }
            if db_err.is_foreign_key_violation() {
                let resource = constraint_field(db_err.constraint());
                return AppError::Conflict {
                    message: format!("{} is referenced by another record", resource),
                    message_es: format!("{} está referenciado por otro registro", resource),
                    resource,
                };
            }
        }
        AppError::DatabaseError(err)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field = errors
            .field_errors()
            .keys()
            .next()
            .map(|f| f.to_string())
            .unwrap_or_else(|| "input".to_string());
        AppError::Validation {
            message: format!("Invalid value for {}", field),
            message_es: format!("Valor inválido para {}", field),
            field,
        }
    }
}

impl From<BasketError> for AppError {
    fn from(err: BasketError) -> Self {
        match err {
            BasketError::LengthMismatch { .. } => AppError::Validation {
                field: "quantities".to_string(),
                message: err.to_string(),
                message_es: "La cantidad de productos y de cantidades no coincide".to_string(),
            },
            BasketError::Empty => AppError::Validation {
                field: "product_ids".to_string(),
                message: err.to_string(),
                message_es: "La venta no tiene productos".to_string(),
            },
        }
    }
}

impl From<SaleError> for AppError {
    fn from(err: SaleError) -> Self {
        match err {
            SaleError::InvalidQuantity {
                product_id,
                quantity,
                ..
            } => AppError::InvalidQuantity {
                product_id: Some(product_id),
                quantity,
            },
            SaleError::ProductNotFound(id) => AppError::NotFound(format!("Product {}", id)),
            SaleError::InsufficientStock {
                product_id,
                requested,
                available,
            } => AppError::InsufficientStock {
                product_id,
                requested,
                available,
            },
            SaleError::AmountOverflow(product_id) => AppError::Validation {
                message: format!("Sale amount for {} is out of range", product_id),
                message_es: format!("El monto de la venta para {} está fuera de rango", product_id),
                field: "quantities".to_string(),
            },
        }
    }
}

impl From<StockError> for AppError {
    fn from(err: StockError) -> Self {
        match err {
            StockError::InvalidQuantity(quantity) | StockError::NegativeStock(quantity) => {
                AppError::InvalidQuantity {
                    product_id: None,
                    quantity,
                }
            }
            StockError::Insufficient {
                requested,
                available,
            } => AppError::InsufficientStock {
                product_id: String::new(),
                requested,
                available,
            },
            StockError::Overflow => AppError::validation(
                "quantity",
                "Stock would overflow",
                "El stock excedería el máximo permitido",
            ),
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
    pub message_es: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    fn status_and_detail(&self) -> (StatusCode, ErrorDetail) {
        match self {
            AppError::Validation {
                field,
                message,
                message_es,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: message.clone(),
                    message_es: message_es.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::InvalidQuantity {
                product_id,
                quantity,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "INVALID_QUANTITY".to_string(),
                    message_en: format!("Quantity must be positive, got {}", quantity),
                    message_es: format!("La cantidad debe ser positiva, se recibió {}", quantity),
                    field: product_id.clone(),
                },
            ),
            AppError::DuplicateKey(field) => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "DUPLICATE_KEY".to_string(),
                    message_en: format!("A record with this {} already exists", field),
                    message_es: format!("Ya existe un registro con este {}", field),
                    field: Some(field.clone()),
                },
            ),
            AppError::Conflict {
                resource,
                message,
                message_es,
            } => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "CONFLICT".to_string(),
                    message_en: message.clone(),
                    message_es: message_es.clone(),
                    field: Some(resource.clone()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message_en: format!("{} not found", resource),
                    message_es: format!("{} no encontrado", resource),
                    field: None,
                },
            ),
            AppError::InsufficientStock {
                product_id,
                requested,
                available,
            } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "INSUFFICIENT_STOCK".to_string(),
                    message_en: format!(
                        "Not enough stock for {}: requested {}, available {}",
                        product_id, requested, available
                    ),
                    message_es: format!(
                        "No hay suficiente stock de {}: solicitado {}, disponible {}",
                        product_id, requested, available
                    ),
                    field: Some(product_id.clone()),
                },
            ),
            AppError::ReceiptWriteFailed { receipt_id, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "RECEIPT_WRITE_FAILED".to_string(),
                    message_en: format!(
                        "The sale was recorded but receipt {} could not be written",
                        receipt_id
                    ),
                    message_es: format!(
                        "La venta se registró pero no se pudo guardar el recibo {}",
                        receipt_id
                    ),
                    field: Some(receipt_id.clone()),
                },
            ),
            AppError::StorageError(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "STORAGE_ERROR".to_string(),
                    message_en: format!("Storage error: {}", msg),
                    message_es: format!("Error de almacenamiento: {}", msg),
                    field: None,
                },
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATABASE_ERROR".to_string(),
                    message_en: "A database error occurred".to_string(),
                    message_es: "Ocurrió un error en la base de datos".to_string(),
                    field: None,
                },
            ),
            AppError::Template(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "TEMPLATE_ERROR".to_string(),
                    message_en: "The page could not be rendered".to_string(),
                    message_es: "No se pudo generar la página".to_string(),
                    field: None,
                },
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = self.status_and_detail();

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::warn!(code = %error_detail.code, "Request rejected: {}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
