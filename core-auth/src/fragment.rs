//! Redirect-fragment token extraction.

use crate::token::AccessToken;
use url::form_urlencoded;

/// Extracts an [`AccessToken`] from a redirect URL fragment.
///
/// Accepts the fragment with or without its leading `#`. The fragment is
/// form-encoded key-value pairs (`access_token=...&token_type=Bearer&
/// expires_in=3600`); anything without an `access_token` yields `None`.
/// After calling this the host must scrub the fragment from the visible URL
/// so the token cannot be re-read from history.
pub fn extract_token_from_fragment(fragment: &str) -> Option<AccessToken> {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);

    let mut value: Option<String> = None;
    let mut token_type = "Bearer".to_string();
    let mut expires_in: Option<u64> = None;

    for (key, val) in form_urlencoded::parse(fragment.as_bytes()) {
        match key.as_ref() {
            "access_token" if !val.is_empty() => value = Some(val.into_owned()),
            "token_type" => token_type = val.into_owned(),
            "expires_in" => expires_in = val.parse().ok(),
            _ => {}
        }
    }

    let mut token = AccessToken::new(value?, token_type);
    if let Some(secs) = expires_in {
        token = token.with_expires_in(secs);
    }
    Some(token)
}
