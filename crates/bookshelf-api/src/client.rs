// Catalog HTTP client
//
// Wraps `reqwest::Client` with catalog URL construction and status mapping.
// Endpoint methods live in `books.rs` as inherent methods so this module
// stays focused on transport mechanics.

use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Raw HTTP client for the book catalog.
///
/// Every method returns the unwrapped payload: `{ "books": [...] }` and
/// `{ "book": {...} }` envelopes are stripped before the caller sees them.
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: Url,
    timeout_secs: u64,
}

impl CatalogClient {
    /// Create a client for `base_url` that authenticates with `token`.
    pub fn new(
        base_url: Url,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client(token)?;
        Ok(Self {
            http,
            base_url,
            timeout_secs: transport.timeout.as_secs(),
        })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    ///
    /// The caller is responsible for the `Authorization` default header.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            timeout_secs: 0,
        }
    }

    /// The catalog base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/{path}`, tolerating a base URL with or without a
    /// trailing slash or a path prefix.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// Build `{base}/{collection}/{id}` with `id` percent-encoded as a
    /// single path segment.
    pub(crate) fn item_url(&self, collection: &str, id: &str) -> Result<Url, Error> {
        let mut url = self.url(collection)?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(id);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await.map_err(|e| self.map_send(e))?;
        self.parse_response(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {}", url);
        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_send(e))?;
        self.parse_response(resp).await
    }

    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("PUT {}", url);
        let resp = self
            .http
            .put(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_send(e))?;
        self.parse_response(resp).await
    }

    fn map_send(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() && self.timeout_secs > 0 {
            Error::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::Transport(err)
        }
    }

    /// Map the HTTP status, then decode the JSON body into `T`.
    async fn parse_response<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        let path = resp.url().path().to_owned();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(Error::Authentication {
                message: format!("catalog rejected the token (HTTP {})", status.as_u16()),
            });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound { resource: path });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message: preview(&body).to_owned(),
            });
        }

        let body = resp.text().await.map_err(|e| self.map_send(e))?;
        trace!(bytes = body.len(), "response body received");

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body: body.clone(),
        })
    }
}

/// First 200 bytes of a body, cut on a char boundary.
fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> CatalogClient {
        CatalogClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn url_joins_without_double_slash() {
        let c = client("https://catalog.example.com/");
        assert_eq!(c.url("books").unwrap().as_str(), "https://catalog.example.com/books");
    }

    #[test]
    fn url_keeps_base_path_prefix() {
        let c = client("https://example.com/api/v1");
        assert_eq!(c.url("/search").unwrap().as_str(), "https://example.com/api/v1/search");
    }

    #[test]
    fn item_url_encodes_id() {
        let c = client("https://example.com");
        assert_eq!(
            c.item_url("books", "a b/c").unwrap().as_str(),
            "https://example.com/books/a%20b%2Fc"
        );
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let body = "é".repeat(150);
        let p = preview(&body);
        assert!(p.len() <= 200);
        assert!(body.starts_with(p));
    }
}
