//! Stage Client - 通用的阶段 RPC 调用器
//!
//! 每次调用：一次出站 HTTP 请求 + 该阶段的超时 + 统一的 StageError。
//! 不做重试：阶段失败直接中止整条流水线。

use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::{Duration, Instant};

use crate::domain::pipeline::{Stage, StageError, StageErrorKind};

/// 健康检查超时
const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// 错误响应体写入错误信息时的最大长度
const MAX_ERROR_BODY_CHARS: usize = 512;

/// 阶段服务端点：静态配置的基础地址 + 该阶段的超时
#[derive(Debug, Clone)]
pub struct StageEndpoint {
    pub stage: Stage,
    pub base_url: String,
    pub timeout: Duration,
}

impl StageEndpoint {
    pub fn new(stage: Stage, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            stage,
            base_url: base_url.into(),
            timeout,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// 共享的 HTTP 客户端（连接池），启动时构造一次
#[derive(Debug, Clone)]
pub struct StageClient {
    client: Client,
}

impl StageClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;
        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// POST JSON 请求体，解析 JSON 响应
    pub async fn call_json<Req, Resp>(
        &self,
        endpoint: &StageEndpoint,
        path: &str,
        payload: &Req,
    ) -> Result<Resp, StageError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let request = self.client.post(endpoint.url(path)).json(payload);
        self.call(endpoint, path, request).await
    }

    /// POST multipart 表单，解析 JSON 响应
    pub async fn call_multipart<Resp>(
        &self,
        endpoint: &StageEndpoint,
        path: &str,
        form: Form,
    ) -> Result<Resp, StageError>
    where
        Resp: DeserializeOwned,
    {
        let request = self.client.post(endpoint.url(path)).multipart(form);
        self.call(endpoint, path, request).await
    }

    /// GET {base}/health，2xx 视为可用
    pub async fn probe(&self, endpoint: &StageEndpoint) -> bool {
        match self
            .client
            .get(endpoint.url("health"))
            .timeout(HEALTH_CHECK_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(stage = %endpoint.stage, error = %e, "Health check failed");
                false
            }
        }
    }

    async fn call<Resp>(
        &self,
        endpoint: &StageEndpoint,
        path: &str,
        request: RequestBuilder,
    ) -> Result<Resp, StageError>
    where
        Resp: DeserializeOwned,
    {
        let stage = endpoint.stage;
        let started = Instant::now();

        tracing::debug!(
            stage = %stage,
            url = %endpoint.url(path),
            timeout_secs = endpoint.timeout.as_secs_f64(),
            "Sending stage request"
        );

        // 超时覆盖连接、发送和读取整个响应体
        let result = match tokio::time::timeout(endpoint.timeout, exchange(stage, request)).await
        {
            Ok(result) => result,
            Err(_) => Err(StageError::timeout(stage, endpoint.timeout)),
        };

        match &result {
            Ok(_) => tracing::debug!(
                stage = %stage,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Stage request succeeded"
            ),
            Err(e) => tracing::error!(
                stage = %stage,
                kind = %e.kind,
                cause = %e.cause,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Stage request failed"
            ),
        }

        result
    }
}

async fn exchange<Resp>(stage: Stage, request: RequestBuilder) -> Result<Resp, StageError>
where
    Resp: DeserializeOwned,
{
    let response = request
        .send()
        .await
        .map_err(|e| transport_error(stage, e))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let body: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
        return Err(StageError::rejected(
            stage,
            format!("HTTP {}: {}", status, body),
        ));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| transport_error(stage, e))?;

    serde_json::from_slice(&body)
        .map_err(|e| StageError::rejected(stage, format!("Invalid response body: {}", e)))
}

fn transport_error(stage: Stage, err: reqwest::Error) -> StageError {
    if err.is_timeout() {
        StageError::new(stage, StageErrorKind::StageTimeout, err.to_string())
    } else if err.is_connect() {
        StageError::unreachable(
            stage,
            format!("Cannot connect to {} service: {}", stage, err),
        )
    } else {
        StageError::unreachable(stage, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Echo {
        value: String,
    }

    fn endpoint(base_url: &str, timeout: Duration) -> StageEndpoint {
        StageEndpoint::new(Stage::Rag, base_url, timeout)
    }

    #[test]
    fn test_url_joining() {
        let ep = endpoint("http://rag:8002/", Duration::from_secs(30));
        assert_eq!(ep.url("/retrieve"), "http://rag:8002/retrieve");
        assert_eq!(ep.url("health"), "http://rag:8002/health");
    }

    #[tokio::test]
    async fn test_json_call_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/echo"))
            .and(body_json(json!({"query": "hello"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": "world"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = StageClient::new().unwrap();
        let resp: Echo = client
            .call_json(
                &endpoint(&server.uri(), Duration::from_secs(5)),
                "/echo",
                &json!({"query": "hello"}),
            )
            .await
            .unwrap();

        assert_eq!(resp.value, "world");
    }

    #[tokio::test]
    async fn test_non_success_status_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/echo"))
            .respond_with(ResponseTemplate::new(422).set_body_string("query must be a string"))
            .expect(1)
            .mount(&server)
            .await;

        let client = StageClient::new().unwrap();
        let err = client
            .call_json::<_, Echo>(
                &endpoint(&server.uri(), Duration::from_secs(5)),
                "/echo",
                &json!({"query": 1}),
            )
            .await
            .unwrap_err();

        assert_eq!(err.stage, Stage::Rag);
        assert_eq!(err.kind, StageErrorKind::StageRejected);
        assert!(!err.transient);
        assert!(err.cause.contains("422"));
        assert!(err.cause.contains("query must be a string"));
    }

    #[tokio::test]
    async fn test_contract_violation_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": 1})))
            .mount(&server)
            .await;

        let client = StageClient::new().unwrap();
        let err = client
            .call_json::<_, Echo>(
                &endpoint(&server.uri(), Duration::from_secs(5)),
                "/echo",
                &json!({}),
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind, StageErrorKind::StageRejected);
        assert!(err.cause.starts_with("Invalid response body"));
    }

    #[tokio::test]
    async fn test_slow_stage_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"value": "late"}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = StageClient::new().unwrap();
        let err = client
            .call_json::<_, Echo>(
                &endpoint(&server.uri(), Duration::from_millis(50)),
                "/echo",
                &json!({}),
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind, StageErrorKind::StageTimeout);
        assert!(err.transient);
    }

    #[tokio::test]
    async fn test_refused_connection_is_unreachable() {
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };

        let client = StageClient::new().unwrap();
        let err = client
            .call_json::<_, Echo>(
                &endpoint(&format!("http://{}", addr), Duration::from_secs(5)),
                "/echo",
                &json!({}),
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind, StageErrorKind::StageUnreachable);
        assert!(err.transient);
    }

    #[tokio::test]
    async fn test_probe() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "healthy"})))
            .mount(&server)
            .await;

        let client = StageClient::new().unwrap();
        assert!(client.probe(&endpoint(&server.uri(), Duration::from_secs(1))).await);

        let down = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&down)
            .await;
        assert!(!client.probe(&endpoint(&down.uri(), Duration::from_secs(1))).await);
    }
}
