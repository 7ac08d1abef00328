//! Graph API feed publishing.
//!
//! [`FeedClient`] is the seam the poster talks to; [`GraphClient`] is the
//! reqwest-backed implementation hitting `POST /{group-id}/feed`.

use std::fmt;
use std::future::Future;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::ApiError;

pub const GRAPH_URL: &str = "https://graph.facebook.com/v19.0/";

/// One feed post for one group. Built fresh for every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRequest {
    pub group_id: String,
    pub message: String,
    pub link: Option<String>,
    pub image_url: Option<String>,
}

impl PostRequest {
    pub fn new(group_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            message: message.into(),
            link: None,
            image_url: None,
        }
    }

    pub fn with_link(mut self, link: Option<&str>) -> Self {
        self.link = link.map(str::to_owned);
        self
    }

    pub fn with_image_url(mut self, image_url: Option<&str>) -> Self {
        self.image_url = image_url.map(str::to_owned);
        self
    }

    fn body(&self) -> FeedBody<'_> {
        FeedBody {
            message: &self.message,
            link: self.link.as_deref(),
            picture: self.image_url.as_deref(),
        }
    }
}

/// Form body of the feed call. Unset fields are left out entirely.
#[derive(Serialize, Debug)]
struct FeedBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    link: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    picture: Option<&'a str>,
}

/// Id of a created post, as returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostId(String);

impl PostId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Anything able to create a feed post on a group.
pub trait FeedClient {
    fn create_feed_post(
        &self,
        request: &PostRequest,
    ) -> impl Future<Output = Result<PostId, ApiError>> + Send;
}

/// Graph API client holding the access token and a base URL.
#[derive(Debug)]
pub struct GraphClient {
    http: reqwest::Client,
    base: Url,
    token: SecretString,
}

impl GraphClient {
    pub fn new(token: SecretString) -> Result<Self, ApiError> {
        Self::with_base_url(token, GRAPH_URL)
    }

    /// Points the client somewhere else than [`GRAPH_URL`] (another API
    /// version, a mock server).
    pub fn with_base_url(token: SecretString, base_url: &str) -> Result<Self, ApiError> {
        let base: Url = base_url.parse()?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_owned()));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base,
            token,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn feed_url(&self, group_id: &str) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .push(group_id)
            .push("feed");
        Ok(url)
    }
}

impl FeedClient for GraphClient {
    fn create_feed_post(
        &self,
        request: &PostRequest,
    ) -> impl Future<Output = Result<PostId, ApiError>> + Send {
        async move {
            let url = self.feed_url(&request.group_id)?;
            debug!(
                msg = "creating feed post",
                url = %url,
                link = ?request.link,
                picture = ?request.image_url
            );

            let response = self
                .http
                .post(url)
                .bearer_auth(self.token.expose_secret())
                .form(&request.body())
                .send()
                .await?;
            let status = response.status();
            let body = response.text().await?;
            parse_feed_response(status, &body)
        }
    }
}

fn parse_feed_response(status: StatusCode, body: &str) -> Result<PostId, ApiError> {
    let unexpected = || ApiError::UnexpectedResponse {
        status,
        body: body.to_owned(),
    };
    let payload: Value = serde_json::from_str(body).map_err(|_| unexpected())?;

    if let Some(error) = payload.get("error").filter(|e| e.is_object()) {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_owned();
        let kind = error.get("type").and_then(Value::as_str).map(str::to_owned);
        let code = error.get("code").and_then(Value::as_i64);
        return Err(ApiError::Graph {
            status,
            message,
            kind,
            code,
            payload,
        });
    }

    match payload.get("id").and_then(Value::as_str) {
        Some(id) if status.is_success() => Ok(PostId::new(id)),
        _ => Err(unexpected()),
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    fn client(server: &MockServer) -> GraphClient {
        GraphClient::with_base_url(SecretString::from("t0ken".to_string()), &server.base_url())
            .unwrap()
    }

    fn form(body: &[u8]) -> Vec<(String, String)> {
        url::form_urlencoded::parse(body).into_owned().collect()
    }

    #[test]
    fn feed_url_appends_group_segment() {
        let client = GraphClient::new(SecretString::from("t".to_string())).unwrap();
        assert_eq!(
            client.feed_url("1234").unwrap().as_str(),
            "https://graph.facebook.com/v19.0/1234/feed"
        );
        assert_eq!(
            client.feed_url("a/b").unwrap().as_str(),
            "https://graph.facebook.com/v19.0/a%2Fb/feed"
        );
    }

    #[test]
    fn rejects_base_without_path() {
        let err =
            GraphClient::with_base_url(SecretString::from("t".to_string()), "mailto:me@example.com")
                .unwrap_err();
        assert!(matches!(err, ApiError::InvalidBaseUrl(_)));
    }

    #[test]
    fn parses_error_payload() {
        let body = r#"{"error":{"message":"Invalid OAuth access token.","type":"OAuthException","code":190,"fbtrace_id":"x"}}"#;
        match parse_feed_response(StatusCode::BAD_REQUEST, body) {
            Err(ApiError::Graph {
                message,
                kind,
                code,
                payload,
                ..
            }) => {
                assert_eq!(message, "Invalid OAuth access token.");
                assert_eq!(kind.as_deref(), Some("OAuthException"));
                assert_eq!(code, Some(190));
                assert_eq!(payload["error"]["fbtrace_id"], "x");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn success_without_id_is_unexpected() {
        assert!(matches!(
            parse_feed_response(StatusCode::OK, r#"{"success":true}"#),
            Err(ApiError::UnexpectedResponse { .. })
        ));
        assert!(matches!(
            parse_feed_response(StatusCode::BAD_GATEWAY, "<html>"),
            Err(ApiError::UnexpectedResponse { .. })
        ));
    }

    #[tokio::test]
    async fn posts_message_only() {
        let server = MockServer::start_async().await;
        let feed = server.mock(|when, then| {
            when.method(POST)
                .path("/g1/feed")
                .header("authorization", "Bearer t0ken")
                .matches(|req| {
                    let fields = form(req.body().as_ref());
                    fields == [("message".to_string(), "hello groups".to_string())]
                });
            then.status(200).json_body(json!({ "id": "g1_42" }));
        });

        let id = client(&server)
            .create_feed_post(&PostRequest::new("g1", "hello groups"))
            .await
            .unwrap();

        assert_eq!(id, PostId::new("g1_42"));
        feed.assert_calls(1);
    }

    #[tokio::test]
    async fn posts_link_and_picture() {
        let server = MockServer::start_async().await;
        let feed = server.mock(|when, then| {
            when.method(POST).path("/g2/feed").matches(|req| {
                let fields = form(req.body().as_ref());
                fields.contains(&("message".into(), "hi".into()))
                    && fields.contains(&("link".into(), "https://example.com".into()))
                    && fields.contains(&("picture".into(), "/tmp/a.png".into()))
            });
            then.status(200).json_body(json!({ "id": "g2_1" }));
        });

        let request = PostRequest::new("g2", "hi")
            .with_link(Some("https://example.com"))
            .with_image_url(Some("/tmp/a.png"));
        let id = client(&server).create_feed_post(&request).await.unwrap();

        assert_eq!(id.as_str(), "g2_1");
        feed.assert_calls(1);
    }

    #[tokio::test]
    async fn provider_error_is_surfaced() {
        let server = MockServer::start_async().await;
        let feed = server.mock(|when, then| {
            when.method(POST).path("/g3/feed");
            then.status(403).json_body(json!({
                "error": {
                    "message": "(#200) Requires publish_to_groups permission",
                    "type": "OAuthException",
                    "code": 200
                }
            }));
        });

        let err = client(&server)
            .create_feed_post(&PostRequest::new("g3", "hi"))
            .await
            .unwrap_err();

        match err {
            ApiError::Graph { status, code, .. } => {
                assert_eq!(status, StatusCode::FORBIDDEN);
                assert_eq!(code, Some(200));
            }
            other => panic!("unexpected {other:?}"),
        }
        feed.assert_calls(1);
    }
}
