//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 和 window.location 的操作都集中在此模块。
//! 实现了"监听 -> 验证 -> 处理 -> 加载"的导航流程。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::{Admission, AppRoute, admit};

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 整页跳转（没有路由服务可用时的兜底）
pub fn hard_redirect(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.location().replace(path) {
            log::error!("[Router] hard redirect to {} failed: {:?}", path, e);
        }
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 通过注入准入信号实现与会话存储的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 准入状态（注入的信号，实现解耦）
    is_admitted: Signal<bool>,
}

impl RouterService {
    /// 创建新的路由服务
    ///
    /// # Arguments
    /// * `is_admitted` - 准入状态信号，由外部注入实现解耦
    fn new(is_admitted: Signal<bool>) -> Self {
        let (current_route, set_route) = signal(AppRoute::default());
        let router = Self {
            current_route,
            set_route,
            is_admitted,
        };

        // 初次加载同样经过守卫，并把地址栏改写为规范路径
        router.navigate_to_route(AppRoute::from_path(&current_path()), false);
        router
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 验证(Guard) -> 处理 -> 加载
    pub fn navigate(&self, path: &str) {
        self.navigate_to_route(AppRoute::from_path(path), true);
    }

    /// 导航但不产生新的历史记录
    pub fn replace(&self, path: &str) {
        self.navigate_to_route(AppRoute::from_path(path), false);
    }

    /// 导航到指定路由
    ///
    /// # Arguments
    /// * `target_route` - 目标路由
    /// * `use_push` - true 使用 pushState, false 使用 replaceState；重定向总是 replaceState
    fn navigate_to_route(&self, target_route: AppRoute, use_push: bool) {
        let admitted = self.is_admitted.get_untracked();

        match admit(target_route, admitted) {
            Admission::Redirect(redirect) => {
                log::info!(
                    "[Router] {} not admitted (admitted={}), redirecting to {}",
                    target_route,
                    admitted,
                    redirect
                );
                replace_history_state(&redirect.to_path());
                self.set_route.set(redirect);
            }
            Admission::Allow(route) => {
                let path = route.to_path();
                if use_push && path != current_path() {
                    push_history_state(&path);
                } else {
                    replace_history_state(&path);
                }
                self.set_route.set(route);
            }
        }
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let router = *self;

        let closure = Closure::<dyn Fn()>::new(move || {
            // popstate 时也执行守卫逻辑
            router.navigate_to_route(AppRoute::from_path(&current_path()), false);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 设置会话状态变化时的自动重定向
    fn setup_auth_redirect(&self) {
        let router = *self;

        // 使用 Effect 监听准入状态变化
        Effect::new(move |_| {
            let admitted = router.is_admitted.get();
            let route = router.current_route.get_untracked();

            if let Admission::Redirect(redirect) = admit(route, admitted) {
                log::info!(
                    "[Router] Session changed (admitted={}), redirecting to {}.",
                    admitted,
                    redirect
                );
                replace_history_state(&redirect.to_path());
                router.set_route.set(redirect);
            }
        });
    }
}

/// 创建路由服务、放入 Context 并初始化监听器
pub fn provide_router(is_admitted: Signal<bool>) -> RouterService {
    let router = RouterService::new(is_admitted);

    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure provide_router was called.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 站内链接：拦截点击，改由路由服务导航
#[component]
pub fn Link(
    /// 目标路径
    #[prop(into)]
    to: String,
    #[prop(optional, into)] class: String,
    /// 子内容
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let target = to.clone();
    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate(&target);
    };

    view! {
        <a href=to class=class on:click=on_click>
            {children()}
        </a>
    }
}
