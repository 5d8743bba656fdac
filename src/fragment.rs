use snafu::{OptionExt, Snafu};
use std::fmt::{Debug, Formatter};

use crate::{AccessToken, RefreshToken};

/// Which of the two invite credentials could not be found in a URL fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteParam {
    AccessToken,
    RefreshToken,
}

impl InviteParam {
    pub fn key(self) -> &'static str {
        match self {
            InviteParam::AccessToken => "access_token",
            InviteParam::RefreshToken => "refresh_token",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum FragmentError {
    #[snafu(display("FragmentError: Parameter '{}' is missing or empty", param.key()))]
    MissingParam { param: InviteParam },
}

/// Credentials handed to us through an invite link.
///
/// The hosted auth service appends them to the link's fragment, e.g.
/// `#access_token=...&expires_in=3600&refresh_token=...&token_type=bearer&type=invite`.
/// Fragments never reach a server, so this is the only place these values exist.
#[derive(Clone, PartialEq, Eq)]
pub struct InviteCredentials {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
}

impl Debug for InviteCredentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InviteCredentials")
            .field("access_token", &"***")
            .field("refresh_token", &"***")
            .finish()
    }
}

/// Parses a URL fragment (with or without its leading `#`) as form-urlencoded key/value pairs
/// and extracts both invite tokens.
///
/// Unknown keys are ignored. For repeated keys, the first occurrence wins. Empty values are
/// treated like absent ones.
pub fn parse_invite_fragment(fragment: &str) -> Result<InviteCredentials, FragmentError> {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);

    let mut access_token: Option<String> = None;
    let mut refresh_token: Option<String> = None;
    for (key, value) in url::form_urlencoded::parse(fragment.as_bytes()) {
        let slot = match key.as_ref() {
            "access_token" => &mut access_token,
            "refresh_token" => &mut refresh_token,
            _ => continue,
        };
        if slot.is_none() && !value.is_empty() {
            *slot = Some(value.into_owned());
        }
    }

    Ok(InviteCredentials {
        access_token: access_token.context(MissingParamSnafu {
            param: InviteParam::AccessToken,
        })?,
        refresh_token: refresh_token.context(MissingParamSnafu {
            param: InviteParam::RefreshToken,
        })?,
    })
}
