use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use tracing::{debug, instrument};

use trigon_core::ActionSpec;

use crate::error::ActionError;
use crate::handler::{ActionHandler, Invocation};

/// Default bound on one outbound webhook call.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Handler for the `webhook` action type.
///
/// Sends the event payload plus a `timestamp` field to the configured URL.
/// A non-2xx response is not an error — the status is reported in the
/// result descriptor — but transport-level failures (DNS, refused
/// connection, timeout) halt the run.
pub struct WebhookHandler {
    client: Client,
    timeout: Duration,
}

impl WebhookHandler {
    /// Create a handler with a default client and a 10-second timeout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set a custom `reqwest::Client` (e.g. with TLS configuration).
    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for WebhookHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// The outbound body: the event payload's fields plus a `timestamp`.
/// Non-object payloads are wrapped under a `data` key.
fn outbound_body(event: &serde_json::Value) -> serde_json::Value {
    let mut map = match event {
        serde_json::Value::Object(fields) => fields.clone(),
        other => {
            let mut map = serde_json::Map::new();
            map.insert("data".to_owned(), other.clone());
            map
        }
    };
    map.insert(
        "timestamp".to_owned(),
        serde_json::json!(Utc::now()),
    );
    serde_json::Value::Object(map)
}

#[async_trait]
impl ActionHandler for WebhookHandler {
    fn kind(&self) -> &str {
        "webhook"
    }

    #[instrument(skip(self, invocation), fields(tenant = %invocation.tenant))]
    async fn execute(
        &self,
        invocation: &Invocation<'_>,
    ) -> Result<serde_json::Value, ActionError> {
        let ActionSpec::Webhook {
            url,
            method,
            headers,
        } = invocation.spec
        else {
            return Err(ActionError::InvalidConfig(format!(
                "webhook handler received {} config",
                invocation.spec.kind()
            )));
        };

        let method = method.as_deref().unwrap_or("POST");
        let method = reqwest::Method::from_bytes(method.to_uppercase().as_bytes())
            .map_err(|_| ActionError::InvalidConfig(format!("invalid HTTP method: {method}")))?;

        let mut request = self
            .client
            .request(method, url)
            .timeout(self.timeout)
            .json(&outbound_body(invocation.event));
        for (key, value) in headers {
            request = request.header(key.as_str(), value.as_str());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ActionError::Timeout(self.timeout)
            } else if e.is_connect() {
                ActionError::Connection(e.to_string())
            } else {
                ActionError::ExecutionFailed(e.to_string())
            }
        })?;

        let status = response.status();
        let response_body: serde_json::Value = response
            .json()
            .await
            .unwrap_or_else(|_| serde_json::json!({"status_code": status.as_u16()}));

        debug!(url = %url, status = status.as_u16(), "webhook call completed");
        Ok(serde_json::json!({
            "delivered": status.is_success(),
            "status": status.as_u16(),
            "response": response_body,
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;
    use crate::context::RunContext;
    use trigon_core::TenantId;

    /// Accept one connection, read the request, answer with a canned status.
    async fn stub_server(status_line: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 8192];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 {status_line}\r\ncontent-length: 2\r\nconnection: close\r\n\r\nok"
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{addr}/hook")
    }

    fn webhook_spec(url: String) -> ActionSpec {
        ActionSpec::Webhook {
            url,
            method: None,
            headers: HashMap::new(),
        }
    }

    async fn run(handler: &WebhookHandler, spec: &ActionSpec) -> Result<serde_json::Value, ActionError> {
        let tenant = TenantId::new("tenant-a");
        let event = serde_json::json!({"amount": 150});
        let ctx = RunContext::new();
        handler
            .execute(&Invocation {
                spec,
                tenant: &tenant,
                event: &event,
                context: &ctx,
            })
            .await
    }

    #[tokio::test]
    async fn delivered_on_2xx() {
        let url = stub_server("200 OK").await;
        let handler = WebhookHandler::new();
        let detail = run(&handler, &webhook_spec(url)).await.unwrap();
        assert_eq!(detail["delivered"], true);
        assert_eq!(detail["status"], 200);
    }

    #[tokio::test]
    async fn non_2xx_is_reported_not_raised() {
        let url = stub_server("500 Internal Server Error").await;
        let handler = WebhookHandler::new();
        let detail = run(&handler, &webhook_spec(url)).await.unwrap();
        assert_eq!(detail["delivered"], false);
        assert_eq!(detail["status"], 500);
    }

    #[tokio::test]
    async fn refused_connection_halts() {
        // Bind to learn a free port, then close it again.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let handler = WebhookHandler::new();
        let err = run(&handler, &webhook_spec(format!("http://{addr}/hook")))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Connection(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept but never answer.
        tokio::spawn(async move {
            let _conn = listener.accept().await;
            tokio::time::sleep(Duration::from_secs(60)).await;
        });

        let handler = WebhookHandler::new().with_timeout(Duration::from_millis(200));
        let err = run(&handler, &webhook_spec(format!("http://{addr}/hook")))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Timeout(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn invalid_method_is_a_config_error() {
        let handler = WebhookHandler::new();
        let spec = ActionSpec::Webhook {
            url: "http://127.0.0.1:1/hook".into(),
            method: Some("not a method".into()),
            headers: HashMap::new(),
        };
        let err = run(&handler, &spec).await.unwrap_err();
        assert_eq!(err.code(), "CONFIGURATION");
    }

    #[test]
    fn body_carries_event_fields_and_timestamp() {
        let body = outbound_body(&serde_json::json!({"amount": 150}));
        assert_eq!(body["amount"], 150);
        assert!(body.get("timestamp").is_some());

        let wrapped = outbound_body(&serde_json::json!(5));
        assert_eq!(wrapped["data"], 5);
        assert!(wrapped.get("timestamp").is_some());
    }
}
