use crate::error::HttpError;
use routedash_shared::protocol::HttpMethod;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body.to_string());
        self
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// HTTP 客户端特性 (Trait)
/// (?Send) 是因为浏览器环境下的 future 不是 Send 的
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError>;
}

// =========================================================
// 实现层: 浏览器 fetch 客户端
// =========================================================

#[derive(Clone, Copy, Default)]
pub struct FetchHttpClient;

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        crate::web::http::fetch(req).await
    }
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

/// 记录的一次请求 (Method, URL, Headers, Body)
#[cfg(test)]
pub type RecordedRequest = (HttpMethod, String, HashMap<String, String>, Option<String>);

/// 可克隆的模拟客户端：测试保留一份句柄，客户端持有另一份
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MockHttpClient {
    // ((Method, URL), (Status, Response Body))
    responses: Rc<RefCell<HashMap<(HttpMethod, String), (u16, Vec<u8>)>>>,
    // 模拟网络故障的 URL
    offline: Rc<RefCell<Vec<String>>>,
    pub requests: Rc<RefCell<Vec<RecordedRequest>>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mock_response(
        &self,
        method: HttpMethod,
        url: &str,
        status: u16,
        body: serde_json::Value,
    ) {
        self.mock_bytes(method, url, status, body.to_string().into_bytes());
    }

    pub fn mock_bytes(&self, method: HttpMethod, url: &str, status: u16, body: Vec<u8>) {
        self.responses
            .borrow_mut()
            .insert((method, url.to_string()), (status, body));
    }

    pub fn mock_offline(&self, url: &str) {
        self.offline.borrow_mut().push(url.to_string());
    }

    /// 命中某个 URL 的请求次数
    pub fn count(&self, method: HttpMethod, url: &str) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|(m, u, _, _)| *m == method && u == url)
            .count()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.borrow().last().cloned()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.requests.borrow_mut().push((
            req.method,
            req.url.clone(),
            req.headers.clone(),
            req.body.clone(),
        ));

        if self.offline.borrow().contains(&req.url) {
            return Err(HttpError::NetworkError("connection refused".to_string()));
        }

        let responses = self.responses.borrow();
        match responses.get(&(req.method, req.url.clone())) {
            Some((status, body)) => Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            }),
            None => Ok(HttpResponse {
                status: 404,
                body: b"Not Found".to_vec(),
            }),
        }
    }
}
