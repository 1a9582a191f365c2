// Hand-crafted async HTTP client for the OpsDesk Remote Data Gateway.
//
// Base path: /rest/v1/
// Auth: `apikey` + `Authorization: Bearer` headers

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;

// ── Error response shape from the gateway ────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the Remote Data Gateway.
///
/// Speaks the gateway's PostgREST-style dialect: collections are addressed
/// by name under `/rest/v1/`, rows are filtered with query operators
/// (`id=eq.{id}`), and inserts opt into a returned representation via the
/// `Prefer` header. Domain row types live upstream; every operation here is
/// generic over the (de)serialized row.
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: Url,
}

impl GatewayClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from an API key and transport config.
    ///
    /// The gateway wants the key twice on every request: raw in `apikey`
    /// and wrapped in `Authorization: Bearer`. Both are injected as
    /// sensitive default headers.
    pub fn from_api_key(
        base_url: &str,
        api_key: &secrecy::SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();

        let mut key_value =
            HeaderValue::from_str(api_key.expose_secret()).map_err(|e| Error::Authentication {
                message: format!("invalid API key header value: {e}"),
            })?;
        key_value.set_sensitive(true);
        headers.insert("apikey", key_value);

        let mut bearer_value = HeaderValue::from_str(&format!(
            "Bearer {}",
            api_key.expose_secret()
        ))
        .map_err(|e| Error::Authentication {
            message: format!("invalid API key header value: {e}"),
        })?;
        bearer_value.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, bearer_value);

        let http = transport.build_client_with_headers(headers)?;
        let base_url = Self::normalize_base_url(base_url)?;

        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Build the base URL with the `/rest/v1/` prefix attached.
    ///
    /// Accepts a bare project URL (`https://host`) or one already carrying
    /// the prefix; either way the result ends with `/rest/v1/` so joining
    /// collection names works.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;

        // Strip trailing slash for uniform handling
        let path = url.path().trim_end_matches('/').to_owned();

        if path.ends_with("/rest/v1") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/rest/v1/"));
        }

        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a collection name onto the base URL.
    fn collection_url(&self, collection: &str) -> Url {
        // base_url always ends with `/rest/v1/`, so joining `tickets` works.
        self.base_url
            .join(collection)
            .expect("collection name should be a valid relative URL")
    }

    // ── Collection operations ────────────────────────────────────────

    /// Fetch every row of a collection, most recently created first.
    ///
    /// `GET /rest/v1/{collection}?select=*&order=created_at.desc`
    pub async fn fetch_ordered<T: DeserializeOwned>(
        &self,
        collection: &str,
    ) -> Result<Vec<T>, Error> {
        let url = self.collection_url(collection);
        debug!("GET {url}");

        let resp = self
            .http
            .get(url)
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await?;
        self.handle_response(resp).await
    }

    /// Insert a row and return the stored representation.
    ///
    /// `POST /rest/v1/{collection}` with `Prefer: return=representation`.
    /// The gateway answers with an array holding the row as stored,
    /// server-assigned fields populated.
    pub async fn insert_returning<T, B>(&self, collection: &str, row: &B) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let url = self.collection_url(collection);
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;
        let rows: Vec<T> = self.handle_response(resp).await?;
        rows.into_iter().next().ok_or_else(|| Error::NoRepresentation {
            collection: collection.to_owned(),
        })
    }

    /// Patch the row whose id matches, sending only the given fields.
    ///
    /// `PATCH /rest/v1/{collection}?id=eq.{id}`. No representation is
    /// requested; the gateway returns `204` even when zero rows matched.
    pub async fn update_by_id<B: Serialize + Sync>(
        &self,
        collection: &str,
        id: &str,
        changes: &B,
    ) -> Result<(), Error> {
        let url = self.collection_url(collection);
        debug!("PATCH {url} id={id}");

        let resp = self
            .http
            .patch(url)
            .query(&[("id", format!("eq.{id}"))])
            .json(changes)
            .send()
            .await?;
        self.handle_empty(resp).await
    }

    /// Delete the row whose id matches.
    ///
    /// `DELETE /rest/v1/{collection}?id=eq.{id}`
    pub async fn delete_by_id(&self, collection: &str, id: &str) -> Result<(), Error> {
        let url = self.collection_url(collection);
        debug!("DELETE {url} id={id}");

        let resp = self
            .http
            .delete(url)
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await?;
        self.handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::InvalidApiKey;
        }

        let raw = resp.text().await.unwrap_or_default();

        if status == reqwest::StatusCode::FORBIDDEN {
            let message = serde_json::from_str::<ErrorBody>(&raw)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| status.to_string());
            return Error::PermissionDenied { message };
        }

        if let Ok(err) = serde_json::from_str::<ErrorBody>(&raw) {
            Error::Gateway {
                status: status.as_u16(),
                message: err.message.unwrap_or_else(|| status.to_string()),
                code: err.code,
            }
        } else {
            Error::Gateway {
                status: status.as_u16(),
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
                code: None,
            }
        }
    }
}
