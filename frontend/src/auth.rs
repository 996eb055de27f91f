//! 认证模块
//!
//! 把会话存储和 API 客户端打包成上下文，供组件共享。
//! 路由服务只接收会话派生出的准入信号，与本模块解耦。

use crate::api::ApiClient;
use crate::cache::CacheTag;
use crate::error::ApiResult;
use crate::request::HttpClient;
use crate::session::SessionStore;
use leptos::prelude::*;
use leptos::reactive::owner::LocalStorage as LocalArena;
use std::rc::Rc;

/// 认证上下文
///
/// `ApiClient` 内部持有 `Rc`，不能直接放进 Context，
/// 因此存放在本地线程的 `StoredValue` 中。
#[derive(Clone, Copy)]
pub struct AuthContext {
    pub session: SessionStore,
    client: StoredValue<ApiClient, LocalArena>,
    /// 每次缓存失效时递增，视图读取它以触发重新查询
    cache_revision: ReadSignal<u64>,
}

impl AuthContext {
    /// 创建上下文并订阅客户端的缓存失效事件
    pub fn new(client: ApiClient) -> Self {
        let (cache_revision, set_revision) = signal(0u64);
        client.subscribe(Rc::new(move |_: &[CacheTag]| {
            set_revision.update(|r| *r += 1);
        }));

        Self {
            session: client.session(),
            client: StoredValue::new_local(client),
            cache_revision,
        }
    }

    pub fn client(&self) -> ApiClient {
        self.client.get_value()
    }

    pub fn cache_revision(&self) -> ReadSignal<u64> {
        self.cache_revision
    }
}

/// 创建认证上下文并放入 Context
pub fn provide_auth(client: ApiClient) -> AuthContext {
    let ctx = AuthContext::new(client);
    provide_context(ctx);
    ctx
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 登录并保存令牌 (仅内存)
///
/// 成功后会话变为已认证，路由服务会随之把登录页重定向到面板。
pub async fn sign_in<C: HttpClient>(
    client: &ApiClient<C>,
    email: &str,
    password: &str,
) -> ApiResult<()> {
    let resp = client.login(email, password).await?;
    client.session().set_token(resp.access);
    log::info!("[Auth] signed in as {}", email);
    Ok(())
}

/// 注销
///
/// 后端注销失败只记录警告，本地会话和缓存总是被清除。
/// 导航由路由服务监听会话变化自动完成。
pub async fn sign_out<C: HttpClient>(client: &ApiClient<C>) {
    if let Err(e) = client.logout().await {
        log::warn!("[Auth] backend logout failed: {}", e);
    }
    client.session().logout();
    client.clear_cache();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::error::ApiError;
    use crate::request::MockHttpClient;
    use crate::session::Session;
    use routedash_shared::protocol::{GetRouteRequest, HttpMethod};
    use serde_json::json;

    const BASE: &str = "http://api.test/api";

    fn client(http: &MockHttpClient) -> ApiClient<MockHttpClient> {
        ApiClient::new(
            http.clone(),
            ClientConfig::new(BASE),
            SessionStore::new(),
            Some(Rc::new(|_: &str| {})),
        )
    }

    #[tokio::test]
    async fn test_sign_in_authenticates_session() {
        let http = MockHttpClient::new();
        http.mock_response(
            HttpMethod::Post,
            "http://api.test/api/auth/login",
            200,
            json!({ "access": "tok-7" }),
        );
        let client = client(&http);

        sign_in(&client, "ops@example.com", "secret").await.unwrap();
        assert_eq!(
            client.session().snapshot(),
            Session {
                token: Some("tok-7".to_string()),
                is_authenticated: true
            }
        );
    }

    #[tokio::test]
    async fn test_failed_sign_in_leaves_session_unauthenticated() {
        let http = MockHttpClient::new();
        http.mock_response(
            HttpMethod::Post,
            "http://api.test/api/auth/login",
            401,
            json!({ "detail": "No active account" }),
        );
        let client = client(&http);

        let err = sign_in(&client, "ops@example.com", "bad").await.unwrap_err();
        assert_eq!(err, ApiError::InvalidCredentials);
        assert_eq!(err.user_message(), "Invalid credentials. Please try again.");
        assert!(!client.session().snapshot().is_admitted());
    }

    #[tokio::test]
    async fn test_sign_in_then_sign_out_resets_everything() {
        let http = MockHttpClient::new();
        http.mock_response(
            HttpMethod::Post,
            "http://api.test/api/auth/login",
            200,
            json!({ "access": "tok" }),
        );
        http.mock_response(
            HttpMethod::Get,
            "http://api.test/api/routes/1",
            200,
            json!({
                "id": 1,
                "name": "North Loop",
                "driver_name": "Ana",
                "status": "PLANNED",
                "created_at": "2024-03-01T08:00:00Z",
                "updated_at": "2024-03-01T08:00:00Z"
            }),
        );
        http.mock_bytes(HttpMethod::Post, "http://api.test/api/auth/logout", 204, Vec::new());
        let client = client(&http);

        sign_in(&client, "ops@example.com", "secret").await.unwrap();
        client.get_route(1).await.unwrap();
        assert!(client.is_cached(&GetRouteRequest { id: 1 }));

        sign_out(&client).await;
        assert_eq!(client.session().snapshot(), Session::default());
        assert!(!client.is_cached(&GetRouteRequest { id: 1 }));
        assert_eq!(http.count(HttpMethod::Post, "http://api.test/api/auth/logout"), 1);
    }

    #[tokio::test]
    async fn test_sign_out_survives_backend_failure() {
        let http = MockHttpClient::new();
        http.mock_offline("http://api.test/api/auth/logout");
        let client = client(&http);
        client.session().set_token("tok");

        sign_out(&client).await;
        assert_eq!(client.session().snapshot(), Session::default());
    }
}
