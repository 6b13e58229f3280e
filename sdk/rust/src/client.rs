use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

/// Envelope returned by the proxy for every action.
#[derive(Debug, Deserialize)]
pub struct ActionEnvelope {
    pub success: bool,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub details: Option<Value>,
}

pub struct ProxyClient {
    client: Client,
    proxy_url: String,
    bearer_token: Option<String>,
}

impl ProxyClient {
    pub fn new(proxy_url: &str) -> Self {
        Self {
            client: Client::new(),
            proxy_url: proxy_url.to_string(),
            bearer_token: None,
        }
    }

    /// Attach a bearer token for proxies with inbound auth enabled.
    pub fn with_bearer_token(mut self, token: &str) -> Self {
        self.bearer_token = Some(token.to_string());
        self
    }

    /// Submit one action and return the action data.
    ///
    /// A failure envelope (or non-success HTTP status) becomes an error
    /// carrying the proxy's error message.
    pub async fn invoke(
        &self,
        action: &str,
        assistant_name: Option<&str>,
        data: Value,
    ) -> Result<Value, Box<dyn std::error::Error>> {
        let mut body = json!({ "action": action, "data": data });
        if let Some(name) = assistant_name {
            body["assistant_name"] = json!(name);
        }

        let mut request = self.client.post(&self.proxy_url).json(&body);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let resp = request.send().await?;
        let status = resp.status();
        let envelope: ActionEnvelope = resp.json().await?;

        if !envelope.success {
            let message = envelope
                .error
                .unwrap_or_else(|| format!("proxy returned status {}", status));
            return Err(message.into());
        }

        Ok(envelope.data)
    }

    /// Send one chat message.
    pub async fn chat(
        &self,
        assistant: &str,
        message: &str,
    ) -> Result<Value, Box<dyn std::error::Error>> {
        self.invoke("chat", Some(assistant), json!({ "message": message }))
            .await
    }

    /// Retrieve context snippets for a query.
    pub async fn search(
        &self,
        assistant: &str,
        query: &str,
    ) -> Result<Value, Box<dyn std::error::Error>> {
        self.invoke("search", Some(assistant), json!({ "query": query }))
            .await
    }
}
