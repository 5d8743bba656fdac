use leptos::prelude::*;
use snafu::Snafu;
use std::fmt::{Debug, Formatter};

use crate::client::AuthClient;
use crate::error::AuthError;

pub const EMPTY_PASSWORD_MESSAGE: &str = "Please enter a password.";
pub const PASSWORD_MISMATCH_MESSAGE: &str = "Passwords do not match.";

/// Where the password submission currently stands. Exactly one is active at a time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// User input of the form.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct FormState {
    pub password: String,
    pub confirm_password: String,
}

impl Debug for FormState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormState")
            .field("password_len", &self.password.len())
            .field("matches", &(self.password == self.confirm_password))
            .finish()
    }
}

impl FormState {
    pub fn new(password: impl Into<String>, confirm_password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            confirm_password: confirm_password.into(),
        }
    }

    pub fn validate(&self) -> Result<&str, ValidationError> {
        if self.password.is_empty() {
            return Err(ValidationError::EmptyPassword);
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::Mismatch);
        }
        Ok(&self.password)
    }
}

/// Local checks done before anything is sent. Display output is shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Snafu)]
pub enum ValidationError {
    #[snafu(display("Please enter a password."))]
    EmptyPassword,

    #[snafu(display("Passwords do not match."))]
    Mismatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Snafu)]
pub enum SubmitError {
    #[snafu(display("SubmitError: Invalid input"))]
    Invalid { source: ValidationError },

    #[snafu(display("SubmitError: A submission is already in flight"))]
    InFlight,

    #[snafu(display("SubmitError: Password was already saved"))]
    AlreadySaved,
}

/// State machine behind the set-password form.
///
/// `Idle -> Loading -> {Success, Error}`, `Error -> Loading` on retry. `Success` is terminal.
/// Validation failures only set the error message and leave the status untouched.
/// An error shown through `show_error` while `Loading` stays visible until the pending submission
/// completes and replaces or clears it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PasswordFlow {
    status: SubmissionStatus,
    error: Option<String>,
}

impl PasswordFlow {
    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether inputs and the submit button should currently be disabled.
    pub fn is_locked(&self) -> bool {
        matches!(
            self.status,
            SubmissionStatus::Loading | SubmissionStatus::Success
        )
    }

    /// Shows an error that did not originate from a submission, e.g. a failed session bootstrap.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Validates `form` and, if it passes, moves to `Loading` and returns the password to submit.
    pub fn begin_submit(&mut self, form: &FormState) -> Result<String, SubmitError> {
        match self.status {
            SubmissionStatus::Loading => return Err(SubmitError::InFlight),
            SubmissionStatus::Success => return Err(SubmitError::AlreadySaved),
            SubmissionStatus::Idle | SubmissionStatus::Error => {}
        }

        match form.validate() {
            Ok(password) => {
                self.status = SubmissionStatus::Loading;
                self.error = None;
                Ok(password.to_owned())
            }
            Err(source) => {
                self.error = Some(source.to_string());
                Err(SubmitError::Invalid { source })
            }
        }
    }

    /// Applies the outcome of the password update started by `begin_submit`.
    pub fn complete_submit(&mut self, result: Result<(), AuthError>) {
        if self.status != SubmissionStatus::Loading {
            tracing::warn!(status = ?self.status, "Ignoring submission result without a pending submission.");
            return;
        }
        match result {
            Ok(()) => {
                self.status = SubmissionStatus::Success;
                self.error = None;
            }
            Err(err) => {
                self.status = SubmissionStatus::Error;
                self.error = Some(err.user_message());
            }
        }
    }
}

/// Runs one submission attempt against `client`, reflecting every step in `flow`.
///
/// Nothing is sent when the attempt is rejected locally.
pub async fn submit_password<C: AuthClient>(
    client: &C,
    flow: RwSignal<PasswordFlow>,
    form: &FormState,
) -> Result<(), SubmitError> {
    let password = flow
        .try_update(|flow| flow.begin_submit(form))
        .unwrap_or(Err(SubmitError::InFlight))?;

    tracing::trace!("Submitting new password.");
    let result = client.update_password(&password).await;
    if let Err(err) = &result {
        tracing::debug!(?err, "Password update failed.");
    }
    flow.try_update(|flow| flow.complete_submit(result));
    Ok(())
}
