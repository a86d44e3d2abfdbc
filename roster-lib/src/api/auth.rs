use serde::Deserialize;
use serde::Serialize;

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Successful login response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub access_token: String,
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub message: String,
    pub error: String,
}

impl ErrorBody {
    /// Builds the body for `status`, using the canonical reason as `error`.
    pub fn new(status_code: u16, reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
            error: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_is_camel_case() {
        let body = ErrorBody::new(401, "Unauthorized", "Invalid credentials");
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(
            json,
            r#"{"statusCode":401,"message":"Invalid credentials","error":"Unauthorized"}"#
        );
    }

    #[test]
    fn test_login_response_tolerates_bare_token() {
        let parsed: LoginResponse = serde_json::from_str(r#"{"access_token":"t"}"#).unwrap();
        assert_eq!(parsed.access_token, "t");
        assert!(!parsed.success);
    }
}
