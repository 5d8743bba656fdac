use crate::request::RequestError;
use crate::token::ClaimsError;
use snafu::Snafu;

/// Errors reported by an `AuthClient`.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum AuthError {
    #[snafu(display("AuthError: Request error"))]
    Request { source: RequestError },

    #[snafu(display("AuthError: Access token could not be read"))]
    InvalidAccessToken { source: ClaimsError },

    #[snafu(display("AuthError: No session established"))]
    MissingSession,

    /// A rejection that only carries a message, e.g. from clients not backed by HTTP.
    #[snafu(display("AuthError: {message}"))]
    Rejected { message: String },
}

impl AuthError {
    /// A message suitable for showing to the user as-is.
    ///
    /// Messages sent by the hosted service are passed through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Request {
                source: RequestError::ErrResponse { error_response, .. },
            } => error_response.message().to_owned(),
            AuthError::Request { source } => match source {
                RequestError::Send { .. } => {
                    "Could not reach the authentication service. Please try again.".to_owned()
                }
                _ => "The authentication service sent an unexpected response.".to_owned(),
            },
            AuthError::InvalidAccessToken { .. } => "Invalid access token.".to_owned(),
            AuthError::MissingSession => "Auth session missing!".to_owned(),
            AuthError::Rejected { message } => message.clone(),
        }
    }
}
