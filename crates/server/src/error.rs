use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson, Response},
};
use services::services::{
    catalog::CatalogError, report::ReportError, sheet::SheetError, week::WeekError,
};
use thiserror::Error;
use utils::response::ApiResponse;

/// Application error codes carried in `ApiResponse::error_code`.
pub mod codes {
    pub const UNKNOWN: u16 = 100;
    pub const NOT_FOUND: u16 = 404;
    pub const MISSING_TITLE: u16 = 500;
    pub const UNKNOWN_CATEGORY: u16 = 501;
    pub const CATEGORY_NOT_EMPTY: u16 = 502;
    pub const INVALID_COLOR: u16 = 600;
    pub const UNKNOWN_ACTIVITY: u16 = 602;
    pub const ACTIVITY_DISABLED: u16 = 603;
    pub const NO_QUARTERS: u16 = 700;
    pub const INVALID_DATE: u16 = 702;
    pub const INVALID_QUARTER: u16 = 703;
    pub const INVALID_REPORT_RANGE: u16 = 704;
    pub const MISSING_COMMENT: u16 = 800;
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Sheet(#[from] SheetError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("'{0}' is not a date in YYYY-MM-DD format")]
    InvalidDate(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
}

macro_rules! impl_from_rejection {
    ($($rejection:ty),*) => {
        $(
            impl From<$rejection> for ApiError {
                fn from(rejection: $rejection) -> Self {
                    ApiError::Rejected {
                        status: rejection.status(),
                        message: rejection.body_text(),
                    }
                }
            }
        )*
    };
}

impl_from_rejection!(JsonRejection, PathRejection, QueryRejection);

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, u16) {
        use self::codes::*;

        match self {
            ApiError::Catalog(err) => match err {
                CatalogError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, UNKNOWN),
                CatalogError::MissingTitle => (StatusCode::BAD_REQUEST, MISSING_TITLE),
                CatalogError::InvalidColor(_) => (StatusCode::BAD_REQUEST, INVALID_COLOR),
                CatalogError::CategoryNotFound(_) => (StatusCode::NOT_FOUND, UNKNOWN_CATEGORY),
                CatalogError::CategoryNotEmpty(_) => (StatusCode::CONFLICT, CATEGORY_NOT_EMPTY),
                CatalogError::ActivityNotFound(_) => (StatusCode::NOT_FOUND, UNKNOWN_ACTIVITY),
            },
            ApiError::Sheet(err) => match err {
                SheetError::Database(_) | SheetError::Sheet(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, UNKNOWN)
                }
                SheetError::NoQuarters => (StatusCode::BAD_REQUEST, NO_QUARTERS),
                SheetError::IndexOutOfRange(_) => (StatusCode::BAD_REQUEST, INVALID_QUARTER),
                SheetError::ActivityNotFound(_) => (StatusCode::BAD_REQUEST, UNKNOWN_ACTIVITY),
                SheetError::ActivityDisabled(_) => (StatusCode::BAD_REQUEST, ACTIVITY_DISABLED),
                SheetError::QuarterNotFound(_) => (StatusCode::NOT_FOUND, NOT_FOUND),
                SheetError::EmptyComment => (StatusCode::BAD_REQUEST, MISSING_COMMENT),
            },
            ApiError::Report(err) => match err {
                ReportError::Database(_) | ReportError::Sheet(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, UNKNOWN)
                }
                ReportError::Week(WeekError::InvalidWeek { .. })
                | ReportError::InvalidRange { .. }
                | ReportError::TooManyWeeks(_) => (StatusCode::BAD_REQUEST, INVALID_REPORT_RANGE),
                ReportError::Week(WeekError::SheetOutsideWeek { .. }) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, UNKNOWN)
                }
            },
            ApiError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, UNKNOWN),
            ApiError::InvalidDate(_) => (StatusCode::BAD_REQUEST, INVALID_DATE),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, NOT_FOUND),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, UNKNOWN),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, UNKNOWN),
            ApiError::Rejected { status, .. } => (*status, UNKNOWN),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = if status.is_server_error() {
            tracing::error!(error = %self, code, "Request failed");
            "An internal error occurred".to_string()
        } else {
            tracing::debug!(error = %self, code, "Request rejected");
            self.to_string()
        };

        (status, ResponseJson(ApiResponse::<()>::error(code, message))).into_response()
    }
}
