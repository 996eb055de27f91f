//! 会话存储模块
//!
//! 认证状态的唯一来源。令牌只保存在内存中，刷新页面即需重新登录。
//! 路由守卫通过注入的信号读取状态，与本模块解耦。

use leptos::prelude::*;

/// 会话状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub is_authenticated: bool,
}

impl Session {
    /// 令牌存在且已认证时才允许进入受保护页面
    pub fn is_admitted(&self) -> bool {
        self.token.is_some() && self.is_authenticated
    }
}

/// 会话存储
///
/// 基于 `RwSignal`，实现了 `Copy`，可以在组件和客户端之间自由传递。
#[derive(Clone, Copy)]
pub struct SessionStore {
    state: RwSignal<Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            state: RwSignal::new(Session::default()),
        }
    }

    /// 保存令牌并标记为已认证
    pub fn set_token(&self, token: impl Into<String>) {
        let token = token.into();
        self.state.update(|s| {
            s.token = Some(token);
            s.is_authenticated = true;
        });
    }

    /// 清除令牌（幂等）
    pub fn logout(&self) {
        if self.state.with_untracked(|s| *s == Session::default()) {
            return;
        }
        self.state.set(Session::default());
    }

    /// 当前令牌（非响应式读取）
    pub fn token(&self) -> Option<String> {
        self.state.with_untracked(|s| s.token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.with_untracked(|s| s.is_authenticated)
    }

    pub fn snapshot(&self) -> Session {
        self.state.get_untracked()
    }

    /// 准入信号（用于路由服务注入）
    pub fn is_admitted_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.with(Session::is_admitted))
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
