use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Envelope wrapping every JSON body the API returns.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error_code: Option<u16>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error_code: None,
            message: None,
        }
    }

    pub fn error(code: u16, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error_code: Some(code),
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_envelope_has_no_data() {
        let response: ApiResponse<()> = ApiResponse::error(702, "Expected date in YYYY-MM-DD format");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error_code"], 702);
        assert!(json["data"].is_null());
    }

    #[test]
    fn success_envelope_carries_data() {
        let response = ApiResponse::success(vec![1, 2, 3]);
        assert!(response.success);
        assert_eq!(response.data, Some(vec![1, 2, 3]));
        assert!(response.message.is_none());
    }
}
