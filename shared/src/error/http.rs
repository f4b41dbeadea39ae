//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::OrderNotFound
            | Self::OrderLineNotFound
            | Self::ProductNotFound
            | Self::CategoryNotFound
            | Self::ScreenNotFound
            | Self::RegisterNotFound => StatusCode::NOT_FOUND,

            Self::RegisterAlreadyBound => StatusCode::CONFLICT,

            Self::ValidationFailed => StatusCode::BAD_REQUEST,

            Self::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(ErrorCode::ScreenNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::CategoryNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::RegisterAlreadyBound.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::ValidationFailed.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
