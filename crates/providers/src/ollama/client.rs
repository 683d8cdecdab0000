use crate::ollama::config::OllamaConfig;
use chat_core::llm::{ClientError, PromptClient, PromptRequest, PromptResponse};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, error, warn};

/// Upper bound on the error body carried in `ClientError::Protocol`.
const BODY_SNIPPET_MAX: usize = 2048;

/// Adapter for Ollama's `/api/generate`. One attempt per call, no retry.
#[derive(Clone)]
pub struct OllamaClient {
    http: Client,
    cfg: OllamaConfig,
}

impl OllamaClient {
    pub fn new(cfg: OllamaConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder()
            .use_rustls_tls()
            .connect_timeout(cfg.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(1);
        if let Some(t) = cfg.request_timeout {
            builder = builder.timeout(t);
        }
        builder = match &cfg.proxy {
            Some(p) => {
                let no_proxy = cfg.no_proxy.as_deref().and_then(reqwest::NoProxy::from_string);
                builder.proxy(reqwest::Proxy::all(p)?.no_proxy(no_proxy))
            }
            None => builder.no_proxy(),
        };
        let http = builder.build()?;
        Ok(Self { http, cfg })
    }
}

impl PromptClient for OllamaClient {
    async fn send(&self, prompt: &str) -> Result<PromptResponse, ClientError> {
        let body = PromptRequest::new(self.cfg.model.as_str(), prompt);
        debug!(target: "providers::ollama", "generate model={} url={} prompt_len={}", self.cfg.model, self.cfg.endpoint, prompt.len());
        let resp = self
            .http
            .post(&self.cfg.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_err)?;
        let status = resp.status();
        if status != StatusCode::OK {
            let text = resp.text().await.unwrap_or_default();
            error!(target: "providers::ollama", "generate non-200 status={} body={:?}", status, text);
            return Err(map_status_err(status, text));
        }
        let text = resp.text().await.map_err(map_reqwest_err)?;
        PromptResponse::from_json(&text).map_err(|e| {
            warn!(target: "providers::ollama", "generate decode failed: {}", e);
            e
        })
    }
}

fn map_reqwest_err(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Network(format!("timeout: {}", e))
    } else {
        ClientError::Network(e.to_string())
    }
}

fn map_status_err(status: StatusCode, body: String) -> ClientError {
    ClientError::Protocol {
        status: status.as_u16(),
        body_snippet: snippet(body),
    }
}

fn snippet(mut body: String) -> String {
    if body.len() > BODY_SNIPPET_MAX {
        let mut end = BODY_SNIPPET_MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn cfg_for(endpoint: String) -> OllamaConfig {
        OllamaConfig {
            endpoint,
            model: "test-model".into(),
            connect_timeout: Duration::from_secs(2),
            request_timeout: None,
            proxy: None,
            no_proxy: None,
        }
    }

    /// Serves exactly one canned HTTP response, returning the raw request body.
    async fn one_shot(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let request_body = read_request_body(&mut sock).await;
            let resp = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            sock.write_all(resp.as_bytes()).await.unwrap();
            sock.shutdown().await.ok();
            request_body
        });
        (format!("http://{}/api/generate", addr), handle)
    }

    async fn read_request_body(sock: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        let header_end = loop {
            let n = sock.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed before sending headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(p) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break p + 4;
            }
        };
        let head = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
        assert!(head.starts_with("post /api/generate "), "unexpected request line: {head}");
        assert!(head.contains("content-type: application/json"));
        let len: usize = head
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .map(|v| v.trim().parse().unwrap())
            .unwrap_or(0);
        while buf.len() < header_end + len {
            let n = sock.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        String::from_utf8_lossy(&buf[header_end..]).into_owned()
    }

    #[tokio::test]
    async fn ok_response_yields_text_and_sends_expected_body() {
        let (url, server) = one_shot("200 OK", r#"{"model":"test-model","response":"hello\nworld","done":true}"#).await;
        let client = OllamaClient::new(cfg_for(url)).unwrap();
        let resp = client.send("say hi").await.unwrap();
        assert_eq!(resp.text, "hello\nworld");

        let sent: serde_json::Value = serde_json::from_str(&server.await.unwrap()).unwrap();
        assert_eq!(
            sent,
            serde_json::json!({"model": "test-model", "prompt": "say hi", "stream": false})
        );
    }

    #[tokio::test]
    async fn prompt_is_sent_untrimmed() {
        let (url, server) = one_shot("200 OK", r#"{"response":"ok"}"#).await;
        let client = OllamaClient::new(cfg_for(url)).unwrap();
        client.send("  padded \n").await.unwrap();
        let sent: serde_json::Value = serde_json::from_str(&server.await.unwrap()).unwrap();
        assert_eq!(sent["prompt"], "  padded \n");
    }

    #[tokio::test]
    async fn server_error_maps_to_protocol() {
        let (url, _server) = one_shot("500 Internal Server Error", "overloaded").await;
        let client = OllamaClient::new(cfg_for(url)).unwrap();
        let err = client.send("x").await.unwrap_err();
        assert_eq!(
            err,
            ClientError::Protocol {
                status: 500,
                body_snippet: "overloaded".into()
            }
        );
    }

    #[tokio::test]
    async fn non_200_success_status_is_still_protocol() {
        let (url, _server) = one_shot("202 Accepted", r#"{"response":"queued"}"#).await;
        let client = OllamaClient::new(cfg_for(url)).unwrap();
        let err = client.send("x").await.unwrap_err();
        assert!(matches!(err, ClientError::Protocol { status: 202, .. }));
    }

    #[tokio::test]
    async fn missing_response_field_maps_to_decode() {
        let (url, _server) = one_shot("200 OK", r#"{"done":true}"#).await;
        let client = OllamaClient::new(cfg_for(url)).unwrap();
        let err = client.send("x").await.unwrap_err();
        assert!(matches!(err, ClientError::Decode { .. }));
    }

    #[tokio::test]
    async fn malformed_json_maps_to_decode() {
        let (url, _server) = one_shot("200 OK", "{not json").await;
        let client = OllamaClient::new(cfg_for(url)).unwrap();
        let err = client.send("x").await.unwrap_err();
        assert!(matches!(err, ClientError::Decode { .. }));
    }

    #[tokio::test]
    async fn refused_connection_maps_to_network() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = OllamaClient::new(cfg_for(format!("http://{}/api/generate", addr))).unwrap();
        let err = client.send("x").await.unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
    }

    #[tokio::test]
    async fn request_timeout_opt_in_bounds_a_silent_server() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let _server = tokio::spawn(async move {
            let (sock, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(sock);
        });
        let mut cfg = cfg_for(format!("http://{}/api/generate", addr));
        cfg.request_timeout = Some(Duration::from_millis(200));
        let client = OllamaClient::new(cfg).unwrap();
        let err = client.send("x").await.unwrap_err();
        match err {
            ClientError::Network(msg) => assert!(msg.starts_with("timeout")),
            other => panic!("expected network timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn truncated_error_body_is_still_protocol() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let _server = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            read_request_body(&mut sock).await;
            let head = "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 100\r\nConnection: close\r\n\r\nbusy";
            sock.write_all(head.as_bytes()).await.unwrap();
            sock.shutdown().await.ok();
        });
        let client = OllamaClient::new(cfg_for(format!("http://{}/api/generate", addr))).unwrap();
        let err = client.send("x").await.unwrap_err();
        assert!(matches!(err, ClientError::Protocol { status: 503, .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn no_proxy_list_bypasses_proxy_for_local_server() {
        let dead = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let dead_addr = dead.local_addr().unwrap();
        drop(dead);
        let (url, _server) = one_shot("200 OK", r#"{"response":"direct"}"#).await;
        let mut cfg = cfg_for(url);
        cfg.proxy = Some(format!("http://{}", dead_addr));
        cfg.no_proxy = Some("localhost,127.0.0.1".into());
        let client = OllamaClient::new(cfg).unwrap();
        assert_eq!(client.send("x").await.unwrap().text, "direct");
    }

    #[tokio::test]
    async fn proxy_without_exemption_is_used() {
        let dead = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let dead_addr = dead.local_addr().unwrap();
        drop(dead);
        let mut cfg = cfg_for("http://127.0.0.1:9/api/generate".into());
        cfg.proxy = Some(format!("http://{}", dead_addr));
        let client = OllamaClient::new(cfg).unwrap();
        assert!(matches!(client.send("x").await, Err(ClientError::Network(_))));
    }

    #[test]
    fn snippet_caps_long_bodies_on_char_boundary() {
        let body = "é".repeat(BODY_SNIPPET_MAX);
        let s = snippet(body);
        assert!(s.len() <= BODY_SNIPPET_MAX);
        assert!(s.chars().all(|c| c == 'é'));
        assert_eq!(snippet("short".into()), "short");
    }
}
