//! URL acceptance rules for link creation and scheme handling for redirects.
//!
//! Accepted URLs are stored verbatim; a missing scheme is tolerated at create
//! time and prepended only when the redirect response is built, so the stored
//! value round-trips unchanged.

use url::Url;

/// Upper bound on stored URL length.
pub const MAX_URL_LENGTH: usize = 2048;

/// Errors produced by the URL acceptance rules.
#[derive(Debug, thiserror::Error)]
pub enum UrlRuleError {
    #[error("Invalid URL: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL exceeds the maximum length of {MAX_URL_LENGTH} characters")]
    TooLong,
}

/// Checks that `input` is an absolute HTTP(S) URL, or a scheme-less form that
/// becomes one when `http://` is prepended.
///
/// The input itself is never rewritten; callers persist it verbatim.
///
/// # Errors
///
/// Returns [`UrlRuleError::UnsupportedProtocol`] for non-HTTP(S) schemes and
/// [`UrlRuleError::InvalidFormat`] for anything that fails to parse or has no
/// host.
pub fn validate_url(input: &str) -> Result<(), UrlRuleError> {
    if input.is_empty() {
        return Err(UrlRuleError::InvalidFormat("empty input".to_string()));
    }

    if input.len() > MAX_URL_LENGTH {
        return Err(UrlRuleError::TooLong);
    }

    let candidate = if input.contains("://") {
        let scheme = input.split("://").next().unwrap_or_default();
        if scheme != "http" && scheme != "https" {
            return Err(UrlRuleError::UnsupportedProtocol);
        }
        input.to_string()
    } else {
        // Scheme-less input: the authority part must not smuggle credentials
        // or a scheme-like prefix past the prepended http://.
        let authority = input.split('/').next().unwrap_or(input);
        if authority.contains(':') || authority.contains('@') {
            return Err(UrlRuleError::InvalidFormat(
                "unexpected ':' or '@' in host".to_string(),
            ));
        }
        format!("http://{input}")
    };

    let url = Url::parse(&candidate).map_err(|e| UrlRuleError::InvalidFormat(e.to_string()))?;

    if url.host_str().is_none() {
        return Err(UrlRuleError::InvalidFormat("missing host".to_string()));
    }

    Ok(())
}

/// Prepends `http://` to a stored URL that lacks a scheme.
///
/// Applied on the redirect path only, just before the Location header is built.
pub fn ensure_scheme(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{url}")
    }
}
