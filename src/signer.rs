//! Onshape API-key request signing.
//!
//! Every request carries an `Authorization` header of the form
//! `On {access_key}:HmacSHA256:{signature}`, where the signature is the
//! base64 HMAC-SHA256 (keyed by the secret key) of the lower-cased string
//!
//! ```text
//! {method}\n{nonce}\n{date}\n{content-type}\n{path}\n{query}\n
//! ```
//!
//! The server rebuilds this string from the received request, so every
//! component must be exactly what goes out on the wire.

use std::fmt;

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, DATE};
use reqwest::Method;
use sha2::Sha256;

use crate::error::{OnshapeError, Result};
use crate::nonce::generate_nonce;

/// Content type assumed when the caller does not set one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Versioned media type requested when the caller does not set `Accept`.
pub const DEFAULT_ACCEPT: &str = "application/vnd.onshape.v1+json";

/// The `On-Nonce` header.
pub const ON_NONCE: HeaderName = HeaderName::from_static("on-nonce");

/// Format a timestamp as an RFC 7231 HTTP date: `Tue, 15 Nov 1994 08:12:31 GMT`.
pub fn format_http_date(time: DateTime<Utc>) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Build the lower-cased string the signature is computed over.
pub fn canonical_string(
    method: &str,
    nonce: &str,
    date: &str,
    content_type: &str,
    path: &str,
    query: &str,
) -> String {
    let mut s = String::new();
    for part in [method, nonce, date, content_type, path, query] {
        s.push_str(part);
        s.push('\n');
    }
    s.to_lowercase()
}

/// Base64 encoded HMAC-SHA256 of `canonical` keyed by `secret_key`.
pub fn sign_canonical(secret_key: &str, canonical: &str) -> String {
    let mut h =
        Hmac::<Sha256>::new_from_slice(secret_key.as_bytes()).expect("HMAC accepts any key length");
    h.update(canonical.as_bytes());

    BASE64_STANDARD.encode(h.finalize().into_bytes())
}

/// Assemble the `Authorization` header value.
pub fn authorization_value(access_key: &str, signature: &str) -> String {
    format!("On {access_key}:HmacSHA256:{signature}")
}

/// Signs outbound requests with an Onshape API key pair.
#[derive(Clone)]
pub struct RequestSigner {
    access_key: String,
    secret_key: String,
}

impl fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSigner").finish_non_exhaustive()
    }
}

impl RequestSigner {
    /// Create a signer.
    ///
    /// # Errors
    ///
    /// Returns [`OnshapeError::ConfigMissing`] if either key is empty.
    pub fn new(access_key: &str, secret_key: &str) -> Result<Self> {
        if access_key.trim().is_empty() {
            return Err(OnshapeError::ConfigMissing(
                "access key must not be empty".to_string(),
            ));
        }
        if secret_key.trim().is_empty() {
            return Err(OnshapeError::ConfigMissing(
                "secret key must not be empty".to_string(),
            ));
        }

        Ok(Self {
            access_key: access_key.to_string(),
            secret_key: secret_key.to_string(),
        })
    }

    /// Sign a request with a fresh nonce and the current time.
    ///
    /// `path` excludes the host and query; `query` excludes the leading `?`.
    /// Returns `headers` extended with `Content-Type`, `Date`, `On-Nonce`,
    /// `Authorization` and `Accept`.
    pub fn sign(
        &self,
        method: &Method,
        path: &str,
        query: &str,
        headers: HeaderMap,
    ) -> Result<HeaderMap> {
        self.sign_at(method, path, query, headers, &generate_nonce(), Utc::now())
    }

    /// Sign a request with an explicit nonce and signing time.
    ///
    /// Deterministic for fixed inputs. Production callers should use
    /// [`RequestSigner::sign`]; a reused nonce is rejected by the server.
    pub fn sign_at(
        &self,
        method: &Method,
        path: &str,
        query: &str,
        mut headers: HeaderMap,
        nonce: &str,
        now: DateTime<Utc>,
    ) -> Result<HeaderMap> {
        if !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
        }
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| OnshapeError::InvalidHeader("Content-Type is not ASCII".to_string()))?
            .to_string();

        let date = format_http_date(now);
        let canonical = canonical_string(method.as_str(), nonce, &date, &content_type, path, query);
        let signature = sign_canonical(&self.secret_key, &canonical);
        let authorization = authorization_value(&self.access_key, &signature);

        headers.insert(ON_NONCE, header_value(nonce)?);
        headers.insert(DATE, header_value(&date)?);
        headers.insert(AUTHORIZATION, header_value(&authorization)?);

        if !headers.contains_key(ACCEPT) {
            headers.insert(ACCEPT, HeaderValue::from_static(DEFAULT_ACCEPT));
        }

        Ok(headers)
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| OnshapeError::InvalidHeader(e.to_string()))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    const NONCE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXY";
    const PATH: &str = "/api/documents/d/f2dd281fff1cee4d67627c2e/w/606e94ad4692296338edd039/elements";

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(1994, 11, 15, 8, 12, 31).unwrap()
    }

    fn signer() -> RequestSigner {
        RequestSigner::new("test-access-key", "test-secret-key").unwrap()
    }

    #[test]
    fn test_http_date_format() {
        assert_eq!(format_http_date(fixed_time()), "Tue, 15 Nov 1994 08:12:31 GMT");
    }

    #[test]
    fn test_canonical_string_is_lowercased_and_newline_terminated() {
        let s = canonical_string(
            "GET",
            NONCE,
            "Tue, 15 Nov 1994 08:12:31 GMT",
            "application/json",
            PATH,
            "elementType=Assembly",
        );
        assert_eq!(
            s,
            "get\nabcdefghijklmnopqrstuvwxy\ntue, 15 nov 1994 08:12:31 gmt\napplication/json\n\
             /api/documents/d/f2dd281fff1cee4d67627c2e/w/606e94ad4692296338edd039/elements\n\
             elementtype=assembly\n"
        );
    }

    #[test]
    fn test_canonical_string_keeps_empty_query_line() {
        assert_eq!(canonical_string("GET", "N", "D", "CT", "/P", ""), "get\nn\nd\nct\n/p\n\n");
    }

    #[test]
    fn test_sign_canonical_known_vector() {
        assert_eq!(
            sign_canonical("key", "get\nn\nd\nct\n/p\n\n"),
            "0v+D9GBcSatLadtwmzBoWv/dGLPi1Jm6HBv0N9xFDyk="
        );
    }

    #[test]
    fn test_sign_at_known_vector() {
        let headers = signer()
            .sign_at(
                &Method::GET,
                PATH,
                "elementType=Assembly",
                HeaderMap::new(),
                NONCE,
                fixed_time(),
            )
            .unwrap();

        assert_eq!(
            headers[AUTHORIZATION],
            "On test-access-key:HmacSHA256:7mi2Ivzv4Y9V2uaQL6NApGTqYyCNcBPAkJ2TqF7t9L0="
        );
        assert_eq!(headers[ON_NONCE], NONCE);
        assert_eq!(headers[DATE], "Tue, 15 Nov 1994 08:12:31 GMT");
        assert_eq!(headers[CONTENT_TYPE], DEFAULT_CONTENT_TYPE);
        assert_eq!(headers[ACCEPT], DEFAULT_ACCEPT);
    }

    #[test]
    fn test_caller_accept_and_content_type_preserved() {
        let mut input = HeaderMap::new();
        input.insert(ACCEPT, HeaderValue::from_static("custom/type"));
        input.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));

        let headers = signer()
            .sign_at(&Method::GET, "/api/x", "", input, NONCE, fixed_time())
            .unwrap();

        assert_eq!(headers[ACCEPT], "custom/type");
        assert_eq!(headers[CONTENT_TYPE], "text/plain");

        // The caller's content type is what gets signed.
        let expected = sign_canonical(
            "test-secret-key",
            &canonical_string("GET", NONCE, "Tue, 15 Nov 1994 08:12:31 GMT", "text/plain", "/api/x", ""),
        );
        assert_eq!(
            headers[AUTHORIZATION].to_str().unwrap(),
            authorization_value("test-access-key", &expected)
        );
    }

    #[test]
    fn test_computed_headers_override_caller_values() {
        let mut input = HeaderMap::new();
        input.insert(AUTHORIZATION, HeaderValue::from_static("Bearer stale"));
        input.insert(ON_NONCE, HeaderValue::from_static("STALE"));

        let headers = signer()
            .sign_at(&Method::GET, "/api/x", "", input, NONCE, fixed_time())
            .unwrap();

        assert!(headers[AUTHORIZATION].to_str().unwrap().starts_with("On test-access-key:"));
        assert_eq!(headers[ON_NONCE], NONCE);
        assert_eq!(headers.get_all(AUTHORIZATION).iter().count(), 1);
    }

    #[test]
    fn test_sign_uses_fresh_nonce_per_call() {
        let s = signer();
        let a = s.sign(&Method::GET, "/api/x", "", HeaderMap::new()).unwrap();
        let b = s.sign(&Method::GET, "/api/x", "", HeaderMap::new()).unwrap();
        assert_ne!(a[ON_NONCE], b[ON_NONCE]);
        assert_ne!(a[AUTHORIZATION], b[AUTHORIZATION]);
    }

    #[test]
    fn test_empty_keys_rejected() {
        assert!(matches!(
            RequestSigner::new("", "secret"),
            Err(OnshapeError::ConfigMissing(_))
        ));
        assert!(matches!(
            RequestSigner::new("access", "  "),
            Err(OnshapeError::ConfigMissing(_))
        ));
    }

    #[test]
    fn test_debug_hides_keys() {
        let debug = format!("{:?}", signer());
        assert!(!debug.contains("test-secret-key"));
        assert!(!debug.contains("test-access-key"));
    }
}
