use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// Default header carrying the caller token.
pub const IDENTITY_HEADER: &str = "x-authorization-header";

/// Body of a 200/400 response from the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Outcome {
    Ok { greeting: String },
    Error { message: String },
}

/// A raw gateway reply.
#[derive(Debug, Clone)]
pub struct GatewayResponse {
    pub status: StatusCode,
    pub set_cookie: Option<String>,
    pub allow_origin: Option<String>,
    pub allow_credentials: Option<String>,
    pub content_type: Option<String>,
    pub request_id: Option<String>,
    pub body: String,
}

impl GatewayResponse {
    /// Parse the body as a greeting/error outcome.
    pub fn outcome(&self) -> Result<Outcome, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

pub struct GatewayClient {
    client: Client,
    gateway_url: String,
    identity_header: String,
}

impl GatewayClient {
    pub fn new(gateway_url: &str) -> Self {
        Self {
            client: Client::builder()
                .no_proxy()
                .build()
                .unwrap_or_default(),
            gateway_url: gateway_url.trim_end_matches('/').to_string(),
            identity_header: IDENTITY_HEADER.to_string(),
        }
    }

    /// Use a different identity header.
    pub fn with_identity_header(mut self, header: &str) -> Self {
        self.identity_header = header.to_string();
        self
    }

    /// POST `body` to the gateway root with an optional token and extra headers.
    pub async fn invoke(
        &self,
        token: Option<&str>,
        body: &str,
        headers: &[(&str, &str)],
    ) -> Result<GatewayResponse, reqwest::Error> {
        let mut req = self
            .client
            .post(format!("{}/", self.gateway_url))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string());

        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        if let Some(token) = token {
            req = req.header(self.identity_header.as_str(), token);
        }

        let resp = req.send().await?;
        let header = |name: &str| {
            resp.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        let status = resp.status();
        let set_cookie = header("set-cookie");
        let allow_origin = header("access-control-allow-origin");
        let allow_credentials = header("access-control-allow-credentials");
        let content_type = header("content-type");
        let request_id = header("x-request-id");
        let body = resp.text().await?;

        Ok(GatewayResponse {
            status,
            set_cookie,
            allow_origin,
            allow_credentials,
            content_type,
            request_id,
            body,
        })
    }

    /// Invoke with `token` and an empty JSON object.
    pub async fn greet(&self, token: &str) -> Result<GatewayResponse, reqwest::Error> {
        self.invoke(Some(token), "{}", &[]).await
    }
}
