//! API 客户端模块
//!
//! 把类型化的操作转换为 HTTP 请求：
//! - 从会话存储读取令牌并附加 `Authorization: Bearer`
//! - 查询结果写入标签缓存，变更成功后按标签失效并通知订阅者
//! - 任何 401 响应都会同步地注销会话并跳转到登录页
//!
//! 导航回调通过构造参数注入；未注入时退化为整页跳转。

use crate::cache::{CacheKey, CacheTag, QueryCache, TagKind};
use crate::config::{ClientConfig, LOGIN_PATH};
use crate::error::{ApiError, ApiResult};
use crate::request::{FetchHttpClient, HttpClient, HttpRequest, HttpResponse};
use crate::session::SessionStore;
use routedash_shared::protocol::{
    ApiRequest, ExportRoutesCsvRequest, GetOrderRequest, GetRouteRequest, ListRouteOrdersRequest,
    ListRoutesRequest, LogoutRequest, UpdateOrderStatusRequest, UpdateRouteStatusRequest,
};
use routedash_shared::{
    CONTENT_TYPE_JSON, HEADER_AUTHORIZATION, HEADER_CONTENT_TYPE, LoginRequest, LoginResponse,
    Order, OrderStatus, Paginated, RegisterRequest, RegisterResponse, Route, RouteStatus,
    StatusUpdate,
};
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::rc::Rc;

/// 导航回调：接收目标路径，以替换历史记录的方式跳转
pub type Navigator = Rc<dyn Fn(&str)>;

/// 缓存失效监听器：接收本次失效的标签
pub type CacheListener = Rc<dyn Fn(&[CacheTag])>;

struct ClientInner<C> {
    http: C,
    config: ClientConfig,
    session: SessionStore,
    navigator: Option<Navigator>,
    cache: RefCell<QueryCache>,
    listeners: RefCell<Vec<CacheListener>>,
}

/// API 客户端
///
/// 内部共享状态，克隆开销只是一次引用计数。
pub struct ApiClient<C = FetchHttpClient> {
    inner: Rc<ClientInner<C>>,
}

impl<C> Clone for ApiClient<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<C: HttpClient> ApiClient<C> {
    pub fn new(
        http: C,
        config: ClientConfig,
        session: SessionStore,
        navigator: Option<Navigator>,
    ) -> Self {
        Self {
            inner: Rc::new(ClientInner {
                http,
                config,
                session,
                navigator,
                cache: RefCell::new(QueryCache::new()),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn session(&self) -> SessionStore {
        self.inner.session
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// 订阅缓存失效事件
    pub fn subscribe(&self, listener: CacheListener) {
        self.inner.listeners.borrow_mut().push(listener);
    }

    /// 清空缓存（注销时调用）
    pub fn clear_cache(&self) {
        self.inner.cache.borrow_mut().clear();
    }

    /// 某个查询当前是否有缓存
    pub fn is_cached<R: ApiRequest>(&self, req: &R) -> bool {
        self.inner.cache.borrow().contains(&cache_key(req))
    }

    // =========================================================
    // 请求管线 (Request Pipeline)
    // =========================================================

    fn build_request<R: ApiRequest>(&self, req: &R) -> HttpRequest {
        let url = self.inner.config.url(&req.target());
        let mut http_req = HttpRequest::new(&url, R::METHOD);

        if let Some(token) = self.inner.session.token() {
            http_req = http_req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
        }
        if let Some(body) = req.body() {
            http_req = http_req
                .with_header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON)
                .with_body(body);
        }
        http_req
    }

    /// 发送请求并归一化响应状态
    async fn execute(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let method = req.method;
        let url = req.url.clone();
        let resp = self.inner.http.send(req).await.map_err(|e| {
            log::error!("[Api] {} {} failed: {}", method, url, e);
            ApiError::from(e)
        })?;

        if resp.status == 401 {
            log::warn!("[Api] {} {} returned 401, forcing logout", method, url);
            self.handle_unauthorized();
            return Err(ApiError::Unauthorized);
        }
        if !resp.ok() {
            log::warn!("[Api] {} {} returned {}", method, url, resp.status);
            return Err(ApiError::Status(resp.status));
        }
        Ok(resp)
    }

    /// 会话过期：注销并跳转登录页
    fn handle_unauthorized(&self) {
        self.inner.session.logout();
        self.clear_cache();
        match &self.inner.navigator {
            Some(navigate) => navigate(LOGIN_PATH),
            None => crate::web::router::hard_redirect(LOGIN_PATH),
        }
    }

    async fn send_json<R>(&self, req: &R) -> ApiResult<R::Response>
    where
        R: ApiRequest,
        R::Response: DeserializeOwned,
    {
        let resp = self.execute(self.build_request(req)).await?;
        Ok(resp.json()?)
    }

    /// 带缓存的查询
    async fn query<R>(&self, req: &R, tags: Vec<CacheTag>) -> ApiResult<R::Response>
    where
        R: ApiRequest,
        R::Response: DeserializeOwned,
    {
        let key = cache_key(req);
        let cached = self.inner.cache.borrow_mut().get(&key);
        if let Some(body) = cached {
            log::debug!("[Api] cache hit {}", key.params);
            return Ok(serde_json::from_slice(&body)?);
        }

        let ticket = self.inner.cache.borrow_mut().begin();
        let resp = self.execute(self.build_request(req)).await?;
        let value: R::Response = resp.json()?;

        let stored = self
            .inner
            .cache
            .borrow_mut()
            .store(key.clone(), ticket, Rc::from(resp.body), tags);
        if !stored {
            log::debug!("[Api] discarded stale response for {}", key.params);
        }
        Ok(value)
    }

    /// 变更：任何 2xx 都先失效声明的标签，再解码响应体
    ///
    /// 服务端状态已经改变，响应体解码失败不能让缓存停留在旧值。
    async fn mutate<R>(&self, req: &R, invalidates: &[CacheTag]) -> ApiResult<R::Response>
    where
        R: ApiRequest,
        R::Response: DeserializeOwned,
    {
        let resp = self.execute(self.build_request(req)).await?;
        self.invalidate(invalidates);
        Ok(resp.json()?)
    }

    fn invalidate(&self, tags: &[CacheTag]) {
        let removed = self.inner.cache.borrow_mut().invalidate(tags);
        log::info!(
            "[Api] invalidated {} cached queries for [{}]",
            removed,
            tags.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );

        // 先复制监听器列表，允许回调中再次订阅
        let listeners = self.inner.listeners.borrow().clone();
        for listener in listeners {
            listener(tags);
        }
    }

    // =========================================================
    // 认证 (Authentication)
    // =========================================================

    /// 登录，任何非 2xx 响应都视为凭据无效，不重试
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.send_json(&req).await.map_err(|e| match e {
            ApiError::Network(_) | ApiError::Decode(_) => e,
            ApiError::Unauthorized | ApiError::Status(_) | ApiError::InvalidCredentials => {
                ApiError::InvalidCredentials
            }
        })
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        password_confirmation: &str,
    ) -> ApiResult<RegisterResponse> {
        let req = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            password2: password_confirmation.to_string(),
        };
        self.send_json(&req).await
    }

    /// 通知后端注销；响应体被忽略
    pub async fn logout(&self) -> ApiResult<()> {
        self.execute(self.build_request(&LogoutRequest)).await?;
        Ok(())
    }

    // =========================================================
    // 路线 (Routes)
    // =========================================================

    pub async fn list_routes(
        &self,
        status: Option<RouteStatus>,
        page: Option<u32>,
        search: Option<String>,
    ) -> ApiResult<Paginated<Route>> {
        let req = ListRoutesRequest {
            status,
            page,
            search,
        };
        self.query(&req, vec![CacheTag::kind(TagKind::Route)]).await
    }

    pub async fn get_route(&self, id: u64) -> ApiResult<Route> {
        self.query(
            &GetRouteRequest { id },
            vec![CacheTag::entity(TagKind::Route, id)],
        )
        .await
    }

    pub async fn update_route_status(
        &self,
        id: u64,
        status: RouteStatus,
    ) -> ApiResult<StatusUpdate<RouteStatus>> {
        self.mutate(
            &UpdateRouteStatusRequest { id, status },
            &[
                CacheTag::entity(TagKind::Route, id),
                CacheTag::kind(TagKind::Route),
            ],
        )
        .await
    }

    pub async fn list_route_orders(
        &self,
        route_id: u64,
        search: Option<String>,
    ) -> ApiResult<Vec<Order>> {
        self.query(
            &ListRouteOrdersRequest { route_id, search },
            vec![
                CacheTag::list(TagKind::Order),
                CacheTag::entity(TagKind::Route, route_id),
            ],
        )
        .await
    }

    /// 导出 CSV，返回原始字节，不缓存
    pub async fn export_routes_csv(&self, search: Option<String>) -> ApiResult<Vec<u8>> {
        let req = ExportRoutesCsvRequest { search };
        let resp = self.execute(self.build_request(&req)).await?;
        Ok(resp.body)
    }

    // =========================================================
    // 订单 (Orders)
    // =========================================================

    pub async fn get_order(&self, id: u64) -> ApiResult<Order> {
        self.query(
            &GetOrderRequest { id },
            vec![CacheTag::entity(TagKind::Order, id)],
        )
        .await
    }

    /// 订单状态变化会影响所属路线的完成度，因此同时失效 `Route`
    pub async fn update_order_status(
        &self,
        id: u64,
        status: OrderStatus,
    ) -> ApiResult<StatusUpdate<OrderStatus>> {
        self.mutate(
            &UpdateOrderStatusRequest { id, status },
            &[
                CacheTag::entity(TagKind::Order, id),
                CacheTag::list(TagKind::Order),
                CacheTag::kind(TagKind::Route),
            ],
        )
        .await
    }
}

fn cache_key<R: ApiRequest>(req: &R) -> CacheKey {
    CacheKey::new(R::ENDPOINT, req.target())
}

#[cfg(test)]
mod tests;
