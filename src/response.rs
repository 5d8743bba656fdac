use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The user record returned by the hosted auth service.
///
/// Only fields this crate looks at are modeled explicitly. Everything else is kept in
/// `additional_fields`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct User {
    pub id: String,

    pub email: Option<String>,

    /// Present once the user followed their invite link for the first time.
    pub invited_at: Option<String>,

    #[serde(flatten)]
    pub additional_fields: HashMap<String, serde_json::Value>,
}

/// Response of the token endpoint when refreshing a session.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub(crate) struct SessionResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: Option<String>,
    pub expires_in: Option<i64>,
    pub expires_at: Option<i64>,
    pub user: User,
}

/// Error body of the hosted auth service.
///
/// Depending on the endpoint and service version, the human-readable part is transported in one
/// of several fields. Newer versions send `{"code": 422, "error_code": "...", "msg": "..."}`,
/// token endpoints send OAuth style `{"error": "...", "error_description": "..."}` and proxies in
/// front of the service may send `{"message": "..."}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub code: Option<u16>,
    pub error_code: Option<String>,
    pub msg: Option<String>,
    pub message: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl ErrorResponse {
    /// Used when a non-success response carried no (decodable) body.
    pub(crate) fn from_status(status: http::StatusCode) -> Self {
        Self {
            code: Some(status.as_u16()),
            message: status.canonical_reason().map(str::to_owned),
            ..Default::default()
        }
    }

    /// The message to show to a user, picked in order of specificity.
    pub fn message(&self) -> &str {
        [
            &self.msg,
            &self.message,
            &self.error_description,
            &self.error,
        ]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .find(|it| !it.trim().is_empty())
        .unwrap_or("Unknown error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assertr::prelude::*;

    #[test]
    fn deserialize_current_error_format() {
        let parsed = serde_json::from_str::<ErrorResponse>(
            r#"{"code":422,"error_code":"same_password","msg":"New password should be different from the old password."}"#,
        )
        .unwrap();
        assert_that(parsed.code).is_equal_to(Some(422));
        assert_that(parsed.message())
            .is_equal_to("New password should be different from the old password.");
    }

    #[test]
    fn deserialize_oauth_error_format() {
        let parsed = serde_json::from_str::<ErrorResponse>(
            r#"{"error":"invalid_grant","error_description":"Invalid Refresh Token: Already Used"}"#,
        )
        .unwrap();
        assert_that(parsed.message()).is_equal_to("Invalid Refresh Token: Already Used");
    }

    #[test]
    fn falls_back_to_error_code_string() {
        let parsed = serde_json::from_str::<ErrorResponse>(r#"{"error":"invalid_grant"}"#).unwrap();
        assert_that(parsed.message()).is_equal_to("invalid_grant");
    }

    #[test]
    fn blank_messages_are_skipped() {
        let response = ErrorResponse {
            msg: Some(String::new()),
            message: Some("Password should be at least 6 characters.".to_owned()),
            ..Default::default()
        };
        assert_that(response.message()).is_equal_to("Password should be at least 6 characters.");
    }

    #[test]
    fn from_status_uses_canonical_reason() {
        let response = ErrorResponse::from_status(http::StatusCode::BAD_GATEWAY);
        assert_that(response.message()).is_equal_to("Bad Gateway");
    }

    #[test]
    fn user_keeps_unknown_fields() {
        let user = serde_json::from_str::<User>(
            r#"{"id":"8a1c","email":"bob@foo.bar","invited_at":"2024-05-01T10:00:00Z","aud":"authenticated","role":"authenticated"}"#,
        )
        .unwrap();
        assert_that(user.email).is_equal_to(Some("bob@foo.bar".to_owned()));
        assert_that(user.additional_fields.len()).is_equal_to(2);
    }
}
