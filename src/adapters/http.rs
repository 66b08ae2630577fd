use crate::domain::model::{
    Credential, DeviceCode, ListItemsPayload, NewList, PollOutcome, RemoteList, SourceItem,
};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, SyncError};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;

pub const DEFAULT_API_BASE_URL: &str = "https://api.trakt.tv";
const API_VERSION: &str = "2";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

fn build_client() -> Result<Client> {
    Ok(Client::builder().user_agent(USER_AGENT).build()?)
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct OAuthErrorResponse {
    #[serde(default)]
    error_description: Option<String>,
}

/// Maps one token-endpoint reply to a polling decision.
///
/// 400 means the user has not approved the code yet. A reply that is not
/// JSON, or a 200 without a token, is malformed and retried. Any other
/// status with a JSON body is final.
pub fn classify_poll_response(status: u16, body: &str) -> PollOutcome {
    match status {
        200 => match serde_json::from_str::<TokenResponse>(body) {
            Ok(token) if !token.access_token.is_empty() => PollOutcome::Granted(token.access_token),
            _ => PollOutcome::Malformed(body.to_string()),
        },
        400 => PollOutcome::Pending,
        _ => match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value) => {
                let description = serde_json::from_value::<OAuthErrorResponse>(value)
                    .ok()
                    .and_then(|e| e.error_description)
                    .unwrap_or_else(|| "Unknown error".to_string());
                PollOutcome::Rejected {
                    status,
                    description,
                }
            }
            Err(_) => PollOutcome::Malformed(body.to_string()),
        },
    }
}

/// Trakt REST API client. Every authenticated call carries the bearer
/// token, the API version and the client id as API key.
#[derive(Debug, Clone)]
pub struct TraktClient {
    client: Client,
    base_url: String,
    client_id: String,
    client_secret: String,
}

impl TraktClient {
    pub fn new(base_url: &str, client_id: &str, client_secret: &str) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            config.api_base_url(),
            config.client_id(),
            config.client_secret(),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder, credential: &Credential) -> RequestBuilder {
        builder
            .bearer_auth(credential.access_token())
            .header("trakt-api-version", API_VERSION)
            .header("trakt-api-key", &self.client_id)
    }

    /// Returns the status of `GET /users/me`; only 200 means the token works.
    pub async fn probe_identity(&self, credential: &Credential) -> Result<StatusCode> {
        let request = self.authorized(self.client.get(self.url("/users/me")), credential);
        let response = request.send().await?;
        tracing::debug!("Token probe status: {}", response.status());
        Ok(response.status())
    }

    pub async fn request_device_code(&self) -> Result<DeviceCode> {
        let response = self
            .client
            .post(self.url("/oauth/device/code"))
            .form(&[("client_id", self.client_id.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status != StatusCode::OK {
            return Err(SyncError::unexpected_status(
                "Device code request",
                status.as_u16(),
                body,
            ));
        }

        serde_json::from_str(&body).map_err(|e| SyncError::malformed("Device code request", e))
    }

    pub async fn poll_device_token(&self, device_code: &str) -> Result<PollOutcome> {
        let response = self
            .client
            .post(self.url("/oauth/device/token"))
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", device_code),
            ])
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(classify_poll_response(status, &body))
    }

    pub async fn fetch_lists(
        &self,
        credential: &Credential,
        username: &str,
    ) -> Result<Vec<RemoteList>> {
        let url = self.url(&format!("/users/{}/lists", username));
        let response = self
            .authorized(self.client.get(url), credential)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status != StatusCode::OK {
            return Err(SyncError::unexpected_status(
                "Fetch lists",
                status.as_u16(),
                body,
            ));
        }

        serde_json::from_str(&body).map_err(|e| SyncError::malformed("Fetch lists", e))
    }

    pub async fn create_list(
        &self,
        credential: &Credential,
        username: &str,
        list: &NewList,
    ) -> Result<RemoteList> {
        let url = self.url(&format!("/users/{}/lists", username));
        let response = self
            .authorized(self.client.post(url), credential)
            .json(list)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status != StatusCode::CREATED {
            return Err(SyncError::unexpected_status(
                "Create list",
                status.as_u16(),
                body,
            ));
        }

        serde_json::from_str(&body).map_err(|e| SyncError::malformed("Create list", e))
    }

    /// Posts the whole batch; the caller decides what a non-201 means.
    pub async fn add_items(
        &self,
        credential: &Credential,
        username: &str,
        list_id: u64,
        payload: &ListItemsPayload,
    ) -> Result<(StatusCode, String)> {
        let url = self.url(&format!("/users/{}/lists/{}/items", username, list_id));
        let response = self
            .authorized(self.client.post(url), credential)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }
}

/// Reads the recommendation feed (a JSON array of movie objects).
#[derive(Debug, Clone)]
pub struct SourceClient {
    client: Client,
}

impl SourceClient {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: build_client()?,
        })
    }

    pub async fn fetch_items(&self, url: &str) -> Result<Vec<SourceItem>> {
        tracing::debug!("Fetching source list from: {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!("Source response status: {}", status);
        if status != StatusCode::OK {
            return Err(SyncError::unexpected_status(
                "Fetch source items",
                status.as_u16(),
                body,
            ));
        }

        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| SyncError::malformed("Fetch source items", e))?;

        match value {
            serde_json::Value::Array(entries) => Ok(entries.into_iter().map(parse_item).collect()),
            other => Err(SyncError::malformed(
                "Fetch source items",
                format!("expected a JSON array, got {}", json_kind(&other)),
            )),
        }
    }
}

/// Only `imdb_id` matters; a badly typed neighbour must not hide it.
fn parse_item(entry: serde_json::Value) -> SourceItem {
    let Some(fields) = entry.as_object() else {
        tracing::warn!("Source entry is not an object: {}", entry);
        return SourceItem::default();
    };

    let text = |key: &str| {
        fields
            .get(key)
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
    };

    let imdb_id = text("imdb_id");
    if imdb_id.is_none() && fields.contains_key("imdb_id") {
        tracing::warn!("Source entry has a non-string imdb_id: {}", entry);
    }

    SourceItem {
        imdb_id,
        title: text("title"),
        release_year: fields.get("release_year").cloned(),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_classify_granted() {
        assert_eq!(
            classify_poll_response(200, r#"{"access_token": "tok", "token_type": "bearer"}"#),
            PollOutcome::Granted("tok".to_string())
        );
    }

    #[test]
    fn test_classify_pending_ignores_body() {
        assert_eq!(classify_poll_response(400, ""), PollOutcome::Pending);
        assert_eq!(
            classify_poll_response(400, r#"{"error": "authorization_pending"}"#),
            PollOutcome::Pending
        );
    }

    #[test]
    fn test_classify_malformed_success_body() {
        assert_eq!(
            classify_poll_response(200, "<html>"),
            PollOutcome::Malformed("<html>".to_string())
        );
        assert!(matches!(
            classify_poll_response(200, r#"{"access_token": ""}"#),
            PollOutcome::Malformed(_)
        ));
    }

    #[test]
    fn test_classify_rejected() {
        assert_eq!(
            classify_poll_response(418, r#"{"error_description": "The user denied the code"}"#),
            PollOutcome::Rejected {
                status: 418,
                description: "The user denied the code".to_string()
            }
        );
        assert_eq!(
            classify_poll_response(409, r#"{"error": "already_used"}"#),
            PollOutcome::Rejected {
                status: 409,
                description: "Unknown error".to_string()
            }
        );
    }

    #[test]
    fn test_classify_non_json_error_reply_is_retried() {
        assert_eq!(
            classify_poll_response(502, "<html>Bad Gateway</html>"),
            PollOutcome::Malformed("<html>Bad Gateway</html>".to_string())
        );
        assert_eq!(
            classify_poll_response(500, ""),
            PollOutcome::Malformed(String::new())
        );
    }

    #[test]
    fn test_parse_item_keeps_id_beside_bad_fields() {
        let item = parse_item(serde_json::json!({
            "imdb_id": "tt0090605",
            "title": 1986,
            "release_year": "1986"
        }));

        assert_eq!(item.external_id(), Some("tt0090605"));
        assert_eq!(item.title, None);
        assert_eq!(item.release_year, Some(serde_json::json!("1986")));
    }

    #[tokio::test]
    async fn test_authorized_requests_carry_trakt_headers() {
        let server = MockServer::start();
        let probe = server.mock(|when, then| {
            when.method(GET)
                .path("/users/me")
                .header("authorization", "Bearer tok")
                .header("trakt-api-version", "2")
                .header("trakt-api-key", "client-id");
            then.status(200).json_body(serde_json::json!({"username": "d-sync"}));
        });

        let client = TraktClient::new(&server.base_url(), "client-id", "secret").unwrap();
        let status = client.probe_identity(&Credential::new("tok")).await.unwrap();

        probe.assert();
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_fetch_items_rejects_non_array() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/feed");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"imdb_id": "tt001"}));
        });

        let source = SourceClient::new().unwrap();
        let err = source.fetch_items(&server.url("/feed")).await.unwrap_err();

        assert!(matches!(err, SyncError::MalformedResponse { .. }));
        assert!(err.to_string().contains("an object"));
    }

    #[tokio::test]
    async fn test_fetch_items_keeps_entries_without_ids() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/feed");
            then.status(200).json_body(serde_json::json!([
                {"imdb_id": "tt001", "title": "Alien", "poster_url": "x"},
                {"title": "No id"},
                42,
                {"imdb_id": 7}
            ]));
        });

        let source = SourceClient::new().unwrap();
        let items = source.fetch_items(&server.url("/feed")).await.unwrap();

        assert_eq!(items.len(), 4);
        assert_eq!(items[0].external_id(), Some("tt001"));
        assert!(items[1..].iter().all(|item| item.external_id().is_none()));
    }

    #[tokio::test]
    async fn test_fetch_items_status_error_keeps_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/feed");
            then.status(503).body("maintenance");
        });

        let source = SourceClient::new().unwrap();
        let err = source.fetch_items(&server.url("/feed")).await.unwrap_err();

        match err {
            SyncError::UnexpectedStatus { status, body, .. } => {
                assert_eq!(status, 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
