//! 接口协议模块
//!
//! 每个 REST 端点对应一个请求结构体，通过 `ApiRequest` 描述方法、路径、查询参数与请求体。

use crate::{
    LoginRequest, LoginResponse, Order, OrderStatus, Paginated, RegisterRequest,
    RegisterResponse, Route, RouteStatus, StatusUpdate,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =========================================================
// 查询字符串 (Query String)
// =========================================================

/// 查询字符串构建器
///
/// 只追加有值的参数；空字符串视为缺省。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString {
    pairs: Vec<(&'static str, String)>,
}

impl QueryString {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, key: &'static str, value: impl ToString) -> Self {
        let value = value.to_string();
        if !value.is_empty() {
            self.pairs.push((key, value));
        }
        self
    }

    pub fn push_opt<V: ToString>(self, key: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.push(key, v),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// 渲染为 `?a=1&b=2`，无参数时为空串
impl fmt::Display for QueryString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", sep, encode_component(key), encode_component(value))?;
        }
        Ok(())
    }
}

/// 百分号编码（RFC 3986 unreserved 字符原样保留，空格编码为 `%20`）
pub fn encode_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len() * 3);
    for byte in s.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

// =========================================================
// 请求抽象 (Request Abstraction)
// =========================================================

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest {
    /// The response type returned by this request.
    type Response;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Stable endpoint name, used as the first half of a cache key.
    const ENDPOINT: &'static str;

    /// The URL path relative to the API base, e.g. `/routes/7`.
    fn path(&self) -> String;

    fn query(&self) -> QueryString {
        QueryString::new()
    }

    fn body(&self) -> Option<serde_json::Value> {
        None
    }

    /// 路径加查询字符串
    fn target(&self) -> String {
        format!("{}{}", self.path(), self.query())
    }
}

// =========================================================
// 认证 (Authentication)
// =========================================================

impl ApiRequest for LoginRequest {
    type Response = LoginResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const ENDPOINT: &'static str = "auth.login";

    fn path(&self) -> String {
        "/auth/login".to_string()
    }

    fn body(&self) -> Option<serde_json::Value> {
        serde_json::to_value(self).ok()
    }
}

impl ApiRequest for RegisterRequest {
    type Response = RegisterResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const ENDPOINT: &'static str = "auth.register";

    fn path(&self) -> String {
        "/auth/register".to_string()
    }

    fn body(&self) -> Option<serde_json::Value> {
        serde_json::to_value(self).ok()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogoutRequest;

impl ApiRequest for LogoutRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Post;
    const ENDPOINT: &'static str = "auth.logout";

    fn path(&self) -> String {
        "/auth/logout".to_string()
    }
}

// =========================================================
// 路线 (Routes)
// =========================================================

/// 路线列表，支持状态过滤、分页与搜索
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListRoutesRequest {
    pub status: Option<RouteStatus>,
    pub page: Option<u32>,
    pub search: Option<String>,
}

impl ApiRequest for ListRoutesRequest {
    type Response = Paginated<Route>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const ENDPOINT: &'static str = "routes.list";

    fn path(&self) -> String {
        "/routes".to_string()
    }

    fn query(&self) -> QueryString {
        QueryString::new()
            .push_opt("status", self.status)
            // 第 0 页视为缺省
            .push_opt("page", self.page.filter(|p| *p > 0))
            .push_opt("search", self.search.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetRouteRequest {
    pub id: u64,
}

impl ApiRequest for GetRouteRequest {
    type Response = Route;
    const METHOD: HttpMethod = HttpMethod::Get;
    const ENDPOINT: &'static str = "routes.get";

    fn path(&self) -> String {
        format!("/routes/{}", self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateRouteStatusRequest {
    pub id: u64,
    pub status: RouteStatus,
}

/// 后端只回显 `{ "status": ... }`
impl ApiRequest for UpdateRouteStatusRequest {
    type Response = StatusUpdate<RouteStatus>;
    const METHOD: HttpMethod = HttpMethod::Put;
    const ENDPOINT: &'static str = "routes.update_status";

    fn path(&self) -> String {
        format!("/routes/{}/status", self.id)
    }

    fn body(&self) -> Option<serde_json::Value> {
        serde_json::to_value(StatusUpdate {
            status: self.status,
        })
        .ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRouteOrdersRequest {
    pub route_id: u64,
    pub search: Option<String>,
}

impl ApiRequest for ListRouteOrdersRequest {
    type Response = Vec<Order>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const ENDPOINT: &'static str = "routes.orders";

    fn path(&self) -> String {
        format!("/routes/{}/orders", self.route_id)
    }

    fn query(&self) -> QueryString {
        QueryString::new().push_opt("search", self.search.as_deref())
    }
}

/// CSV 导出，响应是原始字节流
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportRoutesCsvRequest {
    pub search: Option<String>,
}

impl ApiRequest for ExportRoutesCsvRequest {
    type Response = Vec<u8>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const ENDPOINT: &'static str = "routes.export_csv";

    fn path(&self) -> String {
        "/routes/export.csv".to_string()
    }

    // 导出端点使用 `q` 而不是 `search`
    fn query(&self) -> QueryString {
        QueryString::new().push_opt("q", self.search.as_deref())
    }
}

// =========================================================
// 订单 (Orders)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetOrderRequest {
    pub id: u64,
}

impl ApiRequest for GetOrderRequest {
    type Response = Order;
    const METHOD: HttpMethod = HttpMethod::Get;
    const ENDPOINT: &'static str = "orders.get";

    fn path(&self) -> String {
        format!("/orders/{}", self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOrderStatusRequest {
    pub id: u64,
    pub status: OrderStatus,
}

impl ApiRequest for UpdateOrderStatusRequest {
    type Response = StatusUpdate<OrderStatus>;
    const METHOD: HttpMethod = HttpMethod::Put;
    const ENDPOINT: &'static str = "orders.update_status";

    fn path(&self) -> String {
        format!("/orders/{}/status", self.id)
    }

    fn body(&self) -> Option<serde_json::Value> {
        serde_json::to_value(StatusUpdate {
            status: self.status,
        })
        .ok()
    }
}
