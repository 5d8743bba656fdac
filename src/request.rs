use reqwest::{IntoUrl, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use snafu::{ResultExt, Snafu};

use crate::response::{ErrorResponse, SessionResponse, User};

#[derive(Debug, Snafu)]
pub enum RequestError {
    #[snafu(display("RequestError: Could not send request"))]
    Send { source: reqwest::Error },

    #[snafu(display("RequestError: Could not decode payload"))]
    Decode { source: reqwest::Error },

    #[snafu(display("RequestError: Received an error response ({status}): {}", error_response.message()))]
    ErrResponse {
        status: http::StatusCode,
        error_response: ErrorResponse,
    },
}

fn with_api_key(request: RequestBuilder, public_api_key: &str) -> RequestBuilder {
    request
        .header("apikey", public_api_key)
        .header(http::header::ACCEPT, "application/json")
}

async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T, RequestError> {
    let status = response.status();
    if status.is_success() {
        return response.json::<T>().await.context(DecodeSnafu {});
    }

    // Error bodies are best effort. A proxy in front of the service may answer with HTML.
    let error_response = match response.json::<ErrorResponse>().await {
        Ok(error_response) => error_response,
        Err(err) => {
            tracing::debug!(?err, %status, "Could not decode error response body.");
            ErrorResponse::from_status(status)
        }
    };
    Err(ErrResponseSnafu {
        status,
        error_response,
    }
    .build())
}

/// Fetches the user the given access token belongs to. Fails if the service no longer accepts
/// the token.
pub(crate) async fn retrieve_user(
    client: &reqwest::Client,
    user_endpoint: impl IntoUrl,
    public_api_key: &str,
    access_token: &str,
) -> Result<User, RequestError> {
    let response = with_api_key(client.get(user_endpoint), public_api_key)
        .bearer_auth(access_token)
        .send()
        .await
        .context(SendSnafu {})?;
    handle_response::<User>(response).await
}

/// Trades a refresh token for a new session.
pub(crate) async fn refresh_session(
    client: &reqwest::Client,
    token_endpoint: impl IntoUrl,
    public_api_key: &str,
    refresh_token: &str,
) -> Result<SessionResponse, RequestError> {
    let response = with_api_key(client.post(token_endpoint), public_api_key)
        .query(&[("grant_type", "refresh_token")])
        .json(&json!({ "refresh_token": refresh_token }))
        .send()
        .await
        .context(SendSnafu {})?;
    handle_response::<SessionResponse>(response).await
}

/// Sets a new password for the user the access token belongs to.
pub(crate) async fn update_password(
    client: &reqwest::Client,
    user_endpoint: impl IntoUrl,
    public_api_key: &str,
    access_token: &str,
    new_password: &str,
) -> Result<User, RequestError> {
    let response = with_api_key(client.put(user_endpoint), public_api_key)
        .bearer_auth(access_token)
        .json(&json!({ "password": new_password }))
        .send()
        .await
        .context(SendSnafu {})?;
    handle_response::<User>(response).await
}
