//! Blocking HTTP client for the hosted mem0 API.

use crate::config::Mem0Config;
use crate::schema::{AddRequest, MemoryRecord, Message, SearchFilters, SearchRequest, SearchResponse};
use reqwest::blocking::{Client, Request};
use reqwest::header::{self, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Request timeout in seconds
pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Maximum characters of an error body kept in `Mem0Error::Api`
const ERROR_BODY_MAX_CHARS: usize = 200;

/// Errors from the mem0 API.
#[derive(Debug, thiserror::Error)]
pub enum Mem0Error {
    #[error("MEM0_API_KEY contains characters not allowed in a header")]
    InvalidApiKey,

    #[error("mem0 request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("mem0 API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("unexpected mem0 response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Remote memory operations used by the hooks.
pub trait MemoryApi {
    /// Store messages for a user. Returns the raw API response.
    fn add(&self, messages: &[Message], user_id: &str) -> Result<serde_json::Value, Mem0Error>;

    /// Search a user's memories.
    fn search(
        &self,
        query: &str,
        user_id: &str,
        top_k: usize,
        threshold: f64,
    ) -> Result<Vec<MemoryRecord>, Mem0Error>;
}

/// mem0 platform client.
#[derive(Debug, Clone)]
pub struct Mem0Client {
    client: Client,
    auth: HeaderValue,
    host: String,
    org_id: Option<String>,
    project_id: Option<String>,
}

impl Mem0Client {
    /// Create a client authenticated with the configured API key.
    pub fn new(config: &Mem0Config) -> Result<Self, Mem0Error> {
        let mut auth = HeaderValue::from_str(&format!("Token {}", config.api_key))
            .map_err(|_| Mem0Error::InvalidApiKey)?;
        auth.set_sensitive(true);

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .build()?;

        Ok(Self {
            client,
            auth,
            host: config.host.trim_end_matches('/').to_string(),
            org_id: config.org_id.clone(),
            project_id: config.project_id.clone(),
        })
    }

    /// Full URL for an API path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.host, path)
    }

    /// Authenticated JSON POST.
    fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<Request, Mem0Error> {
        let request = self
            .client
            .post(self.endpoint(path))
            .header(header::AUTHORIZATION, self.auth.clone())
            .json(body)
            .build()?;
        Ok(request)
    }

    fn add_request(&self, messages: &[Message], user_id: &str) -> Result<Request, Mem0Error> {
        let body = AddRequest {
            messages,
            user_id,
            org_id: self.org_id.as_deref(),
            project_id: self.project_id.as_deref(),
        };
        self.post("/v1/memories/", &body)
    }

    fn search_request(
        &self,
        query: &str,
        user_id: &str,
        top_k: usize,
        threshold: f64,
    ) -> Result<Request, Mem0Error> {
        let body = SearchRequest {
            query,
            filters: SearchFilters { user_id },
            top_k,
            threshold,
            org_id: self.org_id.as_deref(),
            project_id: self.project_id.as_deref(),
        };
        self.post("/v2/memories/search/", &body)
    }

    /// Send a request and decode the JSON answer.
    fn send<T: DeserializeOwned>(&self, request: Request) -> Result<T, Mem0Error> {
        tracing::debug!(url = %request.url(), "mem0 request");
        let response = self.client.execute(request)?;
        let status = response.status().as_u16();
        let body = response.text()?;
        decode_response(status, &body)
    }
}

impl MemoryApi for Mem0Client {
    fn add(&self, messages: &[Message], user_id: &str) -> Result<serde_json::Value, Mem0Error> {
        self.send(self.add_request(messages, user_id)?)
    }

    fn search(
        &self,
        query: &str,
        user_id: &str,
        top_k: usize,
        threshold: f64,
    ) -> Result<Vec<MemoryRecord>, Mem0Error> {
        let request = self.search_request(query, user_id, top_k, threshold)?;
        let response: SearchResponse = self.send(request)?;
        Ok(response.into_records())
    }
}

/// Turn a status and body into a decoded value or `Mem0Error::Api`.
fn decode_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, Mem0Error> {
    if !(200..300).contains(&status) {
        return Err(Mem0Error::Api {
            status,
            body: body.chars().take(ERROR_BODY_MAX_CHARS).collect(),
        });
    }

    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn config(host: &str) -> Mem0Config {
        Mem0Config {
            api_key: "m0-test".to_string(),
            host: host.to_string(),
            ..Mem0Config::default()
        }
    }

    fn json_body(request: &Request) -> Value {
        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap();
        serde_json::from_slice(bytes).unwrap()
    }

    fn auth_header(request: &Request) -> &str {
        request
            .headers()
            .get(header::AUTHORIZATION)
            .unwrap()
            .to_str()
            .unwrap()
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let client = Mem0Client::new(&config("https://api.mem0.ai/")).unwrap();
        assert_eq!(
            client.endpoint("/v1/memories/"),
            "https://api.mem0.ai/v1/memories/"
        );
    }

    #[test]
    fn test_rejects_unprintable_api_key() {
        let mut bad = config("https://api.mem0.ai");
        bad.api_key = "line\nbreak".to_string();
        assert!(matches!(Mem0Client::new(&bad), Err(Mem0Error::InvalidApiKey)));
    }

    #[test]
    fn test_add_request() {
        let mut scoped = config("https://api.mem0.ai");
        scoped.org_id = Some("org-1".to_string());
        scoped.project_id = Some("proj-1".to_string());
        let client = Mem0Client::new(&scoped).unwrap();

        let request = client
            .add_request(&[Message::user("likes coffee")], "alice")
            .unwrap();

        assert_eq!(request.method(), &reqwest::Method::POST);
        assert_eq!(request.url().as_str(), "https://api.mem0.ai/v1/memories/");
        assert_eq!(auth_header(&request), "Token m0-test");
        assert_eq!(
            json_body(&request),
            json!({
                "messages": [{"role": "user", "content": "likes coffee"}],
                "user_id": "alice",
                "org_id": "org-1",
                "project_id": "proj-1"
            })
        );
    }

    #[test]
    fn test_search_request() {
        let client = Mem0Client::new(&config("https://api.mem0.ai")).unwrap();
        let request = client.search_request("coffee", "alice", 5, 0.3).unwrap();

        assert_eq!(
            request.url().as_str(),
            "https://api.mem0.ai/v2/memories/search/"
        );
        assert_eq!(auth_header(&request), "Token m0-test");
        assert_eq!(
            json_body(&request),
            json!({
                "query": "coffee",
                "filters": {"user_id": "alice"},
                "top_k": 5,
                "threshold": 0.3
            })
        );
    }

    #[test]
    fn test_error_status_keeps_short_body() {
        let result: Result<Value, _> = decode_response(401, r#"{"detail":"Invalid API key"}"#);
        let err = result.unwrap_err();
        insta::assert_snapshot!(err.to_string(), @r#"mem0 API error 401: {"detail":"Invalid API key"}"#);
    }

    #[test]
    fn test_error_body_cut_to_200_chars() {
        let body = "é".repeat(500);
        let result: Result<Value, _> = decode_response(502, &body);
        match result {
            Err(Mem0Error::Api { status, body }) => {
                assert_eq!(status, 502);
                assert_eq!(body.chars().count(), 200);
            }
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[test]
    fn test_decodes_both_search_shapes() {
        let list: SearchResponse =
            decode_response(200, r#"[{"memory": "likes coffee", "categories": ["preference"]}]"#)
                .unwrap();
        let records = list.into_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text(), Some("likes coffee"));

        let wrapped: SearchResponse =
            decode_response(200, r#"{"results": [{"memory": "uses vim"}]}"#).unwrap();
        assert_eq!(wrapped.into_records()[0].text(), Some("uses vim"));
    }

    #[test]
    fn test_success_with_invalid_json_is_decode_error() {
        let result: Result<Value, _> = decode_response(200, "<html>");
        assert!(matches!(result, Err(Mem0Error::Decode(_))));
    }

    #[test]
    fn test_unreachable_host_is_http_error() {
        let client = Mem0Client::new(&config("http://127.0.0.1:0")).unwrap();
        let result = client.search("coffee", "alice", 5, 0.3);
        assert!(matches!(result, Err(Mem0Error::Http(_))));
    }
}
