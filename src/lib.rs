//! Let users who were invited by email set the password of their hosted auth account.
//!
//! Invite links of GoTrue compatible auth services (like Supabase) carry short-lived credentials
//! in their URL fragment. [`SetPasswordForm`](components::SetPasswordForm) reads them, establishes
//! a session and lets the user choose a password for the invited account.
//!
//! ```no_run
//! use leptos::prelude::*;
//! use leptos_set_password::{components::SetPasswordForm, AuthClientOptions, HostedAuthClient};
//!
//! #[component]
//! pub fn SetPasswordPage() -> impl IntoView {
//!     // Note: These values should be served from environment variables.
//!     let options = AuthClientOptions::new(
//!         Some("https://project.example.co"),
//!         Some("public-anon-key"),
//!     )
//!     .expect("valid options");
//!
//!     view! {
//!         <main>
//!             <SetPasswordForm client=HostedAuthClient::new(options) app_name="Alera"/>
//!         </main>
//!     }
//! }
//! ```
//!
//! Any other provider can be used by implementing [`AuthClient`].

mod bootstrap;
mod client;
pub mod components;
mod config;
mod error;
mod flow;
mod fragment;
mod request;
mod response;
mod token;

// Library exports (additional to pub modules).
pub use bootstrap::*;
pub use client::*;
pub use config::*;
pub use error::*;
pub use flow::*;
pub use fragment::*;
pub use request::RequestError;
pub use response::{ErrorResponse, User};
pub use token::{AccessTokenClaims, ClaimsError, Session};
pub mod url {
    pub use url::Url;
}

type UserEndpoint = url::Url;
type TokenEndpoint = url::Url;

type AccessToken = String;
type RefreshToken = String;
