//! HTTP digest authentication (RFC 7616 / RFC 2617, MD5 family) over reqwest.

use super::{AuthenticatedTransport, TransportRequest, TransportResponse};
use crate::credentials::Credentials;
use crate::error::{CameraError, Result};
use async_trait::async_trait;
use rand::Rng;
use reqwest::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use reqwest::{StatusCode, Url};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlgorithm {
    Md5,
    Md5Sess,
}

impl DigestAlgorithm {
    fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("MD5") {
            Some(Self::Md5)
        } else if value.eq_ignore_ascii_case("MD5-sess") {
            Some(Self::Md5Sess)
        } else {
            None
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Md5 => "MD5",
            Self::Md5Sess => "MD5-sess",
        }
    }
}

/// Parameters of a `WWW-Authenticate: Digest ...` challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestChallenge {
    pub realm: String,
    pub nonce: String,
    pub opaque: Option<String>,
    pub algorithm: DigestAlgorithm,
    /// Whether the camera offered `qop=auth`. Without qop the RFC 2069 form is used.
    pub qop_auth: bool,
}

impl DigestChallenge {
    /// Whether a `WWW-Authenticate` value uses the Digest scheme.
    pub fn is_digest(header: &str) -> bool {
        header
            .trim_start()
            .split(char::is_whitespace)
            .next()
            .is_some_and(|scheme| scheme.eq_ignore_ascii_case("digest"))
    }

    /// Locate the Digest challenge in a `WWW-Authenticate` value that may list
    /// several schemes, e.g. `Basic realm="x", Digest realm="y", nonce="n"`.
    ///
    /// Scheme tokens are only recognized at the start of the value or after a
    /// comma outside quotes.
    pub fn find_in(header: &str) -> Option<&str> {
        let mut in_quotes = false;
        let mut escaped = false;
        let mut at_boundary = true;

        for (i, c) in header.char_indices() {
            if in_quotes {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == '"' {
                    in_quotes = false;
                }
                continue;
            }
            match c {
                '"' => {
                    in_quotes = true;
                    at_boundary = false;
                }
                ',' => at_boundary = true,
                c if c.is_whitespace() => {}
                _ if at_boundary => {
                    at_boundary = false;
                    let rest = &header[i..];
                    if Self::is_digest(rest) {
                        return Some(rest);
                    }
                }
                _ => {}
            }
        }
        None
    }

    pub fn parse(header: &str) -> Result<Self> {
        let header = header.trim();
        let (scheme, rest) = header
            .split_once(char::is_whitespace)
            .ok_or_else(|| CameraError::auth("empty authentication challenge"))?;
        if !scheme.eq_ignore_ascii_case("digest") {
            return Err(CameraError::auth(format!(
                "unsupported authentication scheme {scheme:?}"
            )));
        }

        let params = parse_auth_params(rest);
        let param = |name: &str| {
            params
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone())
        };

        let realm = param("realm").ok_or_else(|| CameraError::auth("digest challenge without realm"))?;
        let nonce = param("nonce").ok_or_else(|| CameraError::auth("digest challenge without nonce"))?;

        let algorithm = match param("algorithm") {
            None => DigestAlgorithm::Md5,
            Some(value) => DigestAlgorithm::parse(&value).ok_or_else(|| {
                CameraError::auth(format!("unsupported digest algorithm {value:?}"))
            })?,
        };

        let qop_auth = match param("qop") {
            None => false,
            Some(offered) => {
                if !offered
                    .split(',')
                    .any(|qop| qop.trim().eq_ignore_ascii_case("auth"))
                {
                    return Err(CameraError::auth(format!(
                        "unsupported digest qop {offered:?}"
                    )));
                }
                true
            }
        };

        Ok(Self {
            realm,
            nonce,
            opaque: param("opaque"),
            algorithm,
            qop_auth,
        })
    }

    /// Build the `Authorization` header value answering this challenge.
    pub fn authorization(
        &self,
        credentials: &Credentials,
        method: &str,
        uri: &str,
        cnonce: &str,
        nonce_count: u32,
    ) -> String {
        let nc = format!("{nonce_count:08x}");

        let mut ha1 = md5_hex(format!(
            "{}:{}:{}",
            credentials.username(),
            self.realm,
            credentials.password()
        ));
        if self.algorithm == DigestAlgorithm::Md5Sess {
            ha1 = md5_hex(format!("{ha1}:{}:{cnonce}", self.nonce));
        }
        let ha2 = md5_hex(format!("{method}:{uri}"));

        let response = if self.qop_auth {
            md5_hex(format!("{ha1}:{}:{nc}:{cnonce}:auth:{ha2}", self.nonce))
        } else {
            md5_hex(format!("{ha1}:{}:{ha2}", self.nonce))
        };

        let mut header = format!(
            r#"Digest username="{}", realm="{}", nonce="{}", uri="{}", algorithm={}, response="{}""#,
            quote_escape(credentials.username()),
            quote_escape(&self.realm),
            quote_escape(&self.nonce),
            uri,
            self.algorithm.as_str(),
            response
        );
        if let Some(opaque) = &self.opaque {
            header.push_str(&format!(r#", opaque="{}""#, quote_escape(opaque)));
        }
        if self.qop_auth {
            header.push_str(&format!(r#", qop=auth, nc={nc}, cnonce="{cnonce}""#));
        }
        header
    }
}

/// Split `key=value, key="quoted, value"` pairs. Keys are lower-cased.
fn parse_auth_params(input: &str) -> Vec<(String, String)> {
    let mut params = Vec::new();
    let mut rest = input.trim();

    while !rest.is_empty() {
        let Some(eq) = rest.find('=') else { break };
        let key = rest[..eq].trim().to_ascii_lowercase();
        rest = rest[eq + 1..].trim_start();

        let value = if let Some(quoted) = rest.strip_prefix('"') {
            let mut value = String::new();
            let mut end = quoted.len();
            let mut escaped = false;
            for (i, c) in quoted.char_indices() {
                if escaped {
                    value.push(c);
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == '"' {
                    end = i;
                    break;
                } else {
                    value.push(c);
                }
            }
            rest = quoted.get(end + 1..).unwrap_or("");
            value
        } else {
            let end = rest.find(',').unwrap_or(rest.len());
            let value = rest[..end].trim().to_string();
            rest = &rest[end..];
            value
        };

        rest = rest.trim_start().trim_start_matches(',').trim_start();
        params.push((key, value));
    }

    params
}

fn quote_escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn md5_hex(data: impl AsRef<[u8]>) -> String {
    format!("{:x}", md5::compute(data))
}

fn generate_cnonce() -> String {
    let bytes: [u8; 8] = rand::thread_rng().gen();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Digest-authenticating transport built on a shared `reqwest::Client`.
///
/// Each call sends the request once without credentials and, if the camera
/// answers `401` with a Digest challenge, retries it exactly once with the
/// computed `Authorization` header.
#[derive(Clone)]
pub struct DigestTransport {
    http_client: reqwest::Client,
}

impl DigestTransport {
    pub fn new() -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| CameraError::Transport(e.to_string()))?;

        Ok(Self { http_client })
    }

    fn build_url(request: &TransportRequest<'_>) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", request.base_url, request.path))
            .map_err(|e| CameraError::Transport(format!("invalid request url: {e}")))?;
        if !request.params.is_empty() {
            url.query_pairs_mut().extend_pairs(request.params.iter());
        }
        Ok(url)
    }

    async fn exchange(
        &self,
        url: Url,
        credentials: &Credentials,
    ) -> Result<TransportResponse> {
        let first = self.send(url.clone(), None).await?;
        if first.status() != StatusCode::UNAUTHORIZED {
            return read_response(first).await;
        }

        let challenge_header = first
            .headers()
            .get_all(WWW_AUTHENTICATE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(DigestChallenge::find_in)
            .map(str::to_string)
            .ok_or_else(|| CameraError::auth("camera did not offer digest authentication"))?;
        let challenge = DigestChallenge::parse(&challenge_header)?;

        debug!(realm = %challenge.realm, algorithm = challenge.algorithm.as_str(), "answering digest challenge");

        let uri = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };
        let authorization =
            challenge.authorization(credentials, "GET", &uri, &generate_cnonce(), 1);

        let second = self.send(url, Some(authorization)).await?;
        if second.status() == StatusCode::UNAUTHORIZED {
            warn!(user = credentials.username(), "camera rejected digest credentials");
            return Err(CameraError::auth(format!(
                "credentials for user {:?} rejected",
                credentials.username()
            )));
        }

        read_response(second).await
    }

    async fn send(
        &self,
        url: Url,
        authorization: Option<String>,
    ) -> Result<reqwest::Response> {
        let mut request = self.http_client.get(url);
        if let Some(value) = authorization {
            request = request.header(AUTHORIZATION, value);
        }
        request.send().await.map_err(map_reqwest_error)
    }
}

async fn read_response(response: reqwest::Response) -> Result<TransportResponse> {
    let status = response.status().as_u16();
    let body = response.text().await.map_err(map_reqwest_error)?;
    Ok(TransportResponse { status, body })
}

fn map_reqwest_error(err: reqwest::Error) -> CameraError {
    CameraError::Transport(err.to_string())
}

#[async_trait]
impl AuthenticatedTransport for DigestTransport {
    async fn get(
        &self,
        request: &TransportRequest<'_>,
        credentials: &Credentials,
    ) -> Result<TransportResponse> {
        let url = Self::build_url(request)?;

        tokio::time::timeout(request.timeout, self.exchange(url, credentials))
            .await
            .map_err(|_| CameraError::NetworkTimeout {
                timeout: request.timeout,
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    // RFC 2617 section 3.5 example.
    const RFC_CHALLENGE: &str = r#"Digest realm="testrealm@host.com", qop="auth,auth-int", nonce="dcd98b7102dd2f0e8b11d0f600bfb0c093", opaque="5ccc069c403ebaf9f0171e9517f40e41""#;

    #[test]
    fn test_parse_challenge() {
        let challenge = DigestChallenge::parse(RFC_CHALLENGE).unwrap();
        assert_eq!(challenge.realm, "testrealm@host.com");
        assert_eq!(challenge.nonce, "dcd98b7102dd2f0e8b11d0f600bfb0c093");
        assert_eq!(
            challenge.opaque.as_deref(),
            Some("5ccc069c403ebaf9f0171e9517f40e41")
        );
        assert_eq!(challenge.algorithm, DigestAlgorithm::Md5);
        assert!(challenge.qop_auth);
    }

    #[test]
    fn test_rfc2617_response() {
        let challenge = DigestChallenge::parse(RFC_CHALLENGE).unwrap();
        let creds = Credentials::new("Mufasa", "Circle Of Life").unwrap();

        let header = challenge.authorization(&creds, "GET", "/dir/index.html", "0a4f113b", 1);

        assert!(header.starts_with("Digest "));
        assert!(header.contains(r#"response="6629fae49393a05397450978507c4ef1""#));
        assert!(header.contains(r#"uri="/dir/index.html""#));
        assert!(header.contains("nc=00000001"));
        assert!(header.contains(r#"cnonce="0a4f113b""#));
        assert!(header.contains(r#"opaque="5ccc069c403ebaf9f0171e9517f40e41""#));
        assert!(!header.contains("Circle Of Life"));
    }

    #[test]
    fn test_challenge_without_qop_uses_legacy_form() {
        let challenge = DigestChallenge::parse(r#"Digest realm="cam", nonce="abc""#).unwrap();
        assert!(!challenge.qop_auth);

        let creds = Credentials::new("admin", "pw").unwrap();
        let header = challenge.authorization(&creds, "GET", "/command/inquiry.cgi", "ff", 1);

        let ha1 = md5_hex("admin:cam:pw");
        let ha2 = md5_hex("GET:/command/inquiry.cgi");
        let expected = md5_hex(format!("{ha1}:abc:{ha2}"));
        assert!(header.contains(&format!(r#"response="{expected}""#)));
        assert!(!header.contains("qop="));
    }

    #[test]
    fn test_md5_sess_hashes_session_key() {
        let challenge = DigestChallenge::parse(
            r#"Digest realm="cam", nonce="n1", qop="auth", algorithm=MD5-sess"#,
        )
        .unwrap();
        assert_eq!(challenge.algorithm, DigestAlgorithm::Md5Sess);

        let creds = Credentials::new("admin", "pw").unwrap();
        let header = challenge.authorization(&creds, "GET", "/x", "c1", 1);

        let ha1 = md5_hex(format!("{}:n1:c1", md5_hex("admin:cam:pw")));
        let ha2 = md5_hex("GET:/x");
        let expected = md5_hex(format!("{ha1}:n1:00000001:c1:auth:{ha2}"));
        assert!(header.contains(&format!(r#"response="{expected}""#)));
        assert!(header.contains("algorithm=MD5-sess"));
    }

    #[test]
    fn test_rejects_unsupported_challenges() {
        assert!(matches!(
            DigestChallenge::parse(r#"Basic realm="cam""#),
            Err(CameraError::AuthenticationFailure(_))
        ));
        assert!(matches!(
            DigestChallenge::parse(r#"Digest realm="cam", nonce="n", algorithm=SHA-256"#),
            Err(CameraError::AuthenticationFailure(_))
        ));
        assert!(matches!(
            DigestChallenge::parse(r#"Digest realm="cam", nonce="n", qop="auth-int""#),
            Err(CameraError::AuthenticationFailure(_))
        ));
        assert!(matches!(
            DigestChallenge::parse(r#"Digest realm="cam""#),
            Err(CameraError::AuthenticationFailure(_))
        ));
    }

    #[test]
    fn test_parse_auth_params_handles_quotes_and_escapes() {
        let params = parse_auth_params(r#"Realm="a, b", nonce=xyz , opaque="q\"uote""#);
        assert_eq!(
            params,
            vec![
                ("realm".to_string(), "a, b".to_string()),
                ("nonce".to_string(), "xyz".to_string()),
                ("opaque".to_string(), "q\"uote".to_string()),
            ]
        );
    }

    #[test]
    fn test_is_digest() {
        assert!(DigestChallenge::is_digest(r#"Digest realm="x""#));
        assert!(DigestChallenge::is_digest(r#"digest realm="x""#));
        assert!(!DigestChallenge::is_digest(r#"Basic realm="x""#));
    }

    #[test]
    fn test_find_digest_among_several_schemes() {
        let header = r#"Basic realm="cam", Digest realm="SRG camera", nonce="n1", qop="auth""#;
        let digest = DigestChallenge::find_in(header).unwrap();
        assert!(digest.starts_with("Digest realm="));

        let challenge = DigestChallenge::parse(digest).unwrap();
        assert_eq!(challenge.realm, "SRG camera");
        assert_eq!(challenge.nonce, "n1");
        assert!(challenge.qop_auth);

        assert_eq!(DigestChallenge::find_in(RFC_CHALLENGE), Some(RFC_CHALLENGE));
    }

    #[test]
    fn test_find_digest_ignores_quoted_text() {
        assert_eq!(DigestChallenge::find_in(r#"Basic realm="a, Digest b""#), None);
        assert_eq!(DigestChallenge::find_in(r#"Basic realm="x""#), None);
        assert_eq!(DigestChallenge::find_in(""), None);
    }

    #[test]
    fn test_build_url_encodes_query() {
        let params = vec![
            ("PresetSet".to_string(), "5,Gate,off".to_string()),
            ("x".to_string(), "a b".to_string()),
        ];
        let request = TransportRequest {
            base_url: "http://192.0.2.1",
            path: "/command/presetposition.cgi",
            params: &params,
            timeout: Duration::from_secs(1),
        };

        let url = DigestTransport::build_url(&request).unwrap();
        assert_eq!(url.path(), "/command/presetposition.cgi");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(pairs, params);
    }

    #[test]
    fn test_cnonce_is_hex() {
        let cnonce = generate_cnonce();
        assert_eq!(cnonce.len(), 16);
        assert!(cnonce.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
