//! RouteDash 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route` / `web::router`: 路由定义与路由服务（守卫）
//! - `session`: 会话存储，认证状态的唯一来源
//! - `api` / `cache` / `request`: 类型化 API 客户端、标签缓存与 HTTP 抽象
//! - `auth`: 把会话和客户端打包成上下文
//! - `components`: UI 组件层

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod display;
pub mod error;
pub mod request;
pub mod session;
mod components {
    pub mod dashboard;
    mod feedback;
    mod icons;
    pub mod login;
    mod pagination;
    pub mod route_detail;
    mod status_badge;
}

use crate::api::{ApiClient, Navigator};
use crate::auth::provide_auth;
use crate::components::dashboard::DashboardPage;
use crate::components::login::LoginPage;
use crate::components::route_detail::RouteDetailPage;
use crate::config::ClientConfig;
use crate::request::FetchHttpClient;
use crate::session::SessionStore;

use leptos::prelude::*;
use std::rc::Rc;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub(crate) mod web {
    pub mod download;
    pub(crate) mod http;
    pub mod route;
    pub mod router;
    mod storage;

    pub use storage::LocalStorage;
}

use web::route::AppRoute;
use web::router::{RouterOutlet, provide_router};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::RouteDetail(id) => view! { <RouteDetailPage id=id /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                    <a href="/dashboard" class="btn btn-primary mt-6">"Go to dashboard"</a>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 会话存储：认证状态的唯一来源
    let session = SessionStore::new();

    // 2. 路由服务只拿到准入信号（解耦！）
    let router = provide_router(session.is_admitted_signal());

    // 3. API 客户端：401 时通过路由服务跳转登录页
    let navigator: Navigator = Rc::new(move |path: &str| router.replace(path));
    let client = ApiClient::new(
        FetchHttpClient,
        ClientConfig::from_build_env(),
        session,
        Some(navigator),
    );
    log::info!("[App] API base URL: {}", client.config().base_url);

    // 4. 认证上下文：客户端 + 会话 + 缓存版本号
    provide_auth(client);

    view! { <RouterOutlet matcher=route_matcher /> }
}
