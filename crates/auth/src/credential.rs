//! Session credential presence check.
//!
//! The credential is an opaque bearer token issued by an external login flow.
//! This module never inspects its contents; it only decides whether one is
//! present. Validation belongs to an [`IdentitySource`](crate::IdentitySource).

/// Default cookie carrying the session credential.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// An opaque, non-empty session credential.
///
/// The value is never rendered through `Debug` so it cannot leak into logs.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCredential(String);

impl SessionCredential {
    /// Build a credential from a raw value.
    ///
    /// Empty and whitespace-only values are treated as absent.
    pub fn from_raw(raw: Option<&str>) -> Option<Self> {
        let value = raw?.trim();
        if value.is_empty() {
            return None;
        }
        Some(Self(value.to_string()))
    }

    /// Extract the credential from a `Cookie` header value.
    ///
    /// Malformed pairs are skipped. The first cookie named `name` wins.
    pub fn from_cookie_header(header: &str, name: &str) -> Option<Self> {
        let raw = header
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(key, _)| key.trim() == name)
            .map(|(_, value)| value.trim().trim_matches('"'))?;

        Self::from_raw(Some(raw))
    }

    /// Raw token, for handing to an identity source.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SessionCredential(<redacted>)")
    }
}

/// Does the request carry a valid-looking credential?
pub fn has_credential(raw: Option<&str>) -> bool {
    SessionCredential::from_raw(raw).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_blank_values_are_absent() {
        assert!(!has_credential(None));
        assert!(!has_credential(Some("")));
        assert!(!has_credential(Some("   ")));
        assert!(has_credential(Some("abc")));
    }

    #[test]
    fn debug_output_is_redacted() {
        let cred = SessionCredential::from_raw(Some("super-secret")).unwrap();
        let rendered = format!("{cred:?}");
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn cookie_header_lookup() {
        let header = "theme=dark; access_token=tok123; other=1";
        let cred = SessionCredential::from_cookie_header(header, ACCESS_TOKEN_COOKIE).unwrap();
        assert_eq!(cred.expose(), "tok123");

        assert!(SessionCredential::from_cookie_header("access_token=", ACCESS_TOKEN_COOKIE).is_none());
        assert!(SessionCredential::from_cookie_header("garbage;;==", ACCESS_TOKEN_COOKIE).is_none());
        assert!(SessionCredential::from_cookie_header("x_access_token=abc", ACCESS_TOKEN_COOKIE).is_none());
    }
}
