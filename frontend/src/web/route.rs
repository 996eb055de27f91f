//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由、它们的属性以及守卫规则。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面
    Login,
    /// 路线列表面板 (需要认证，默认路由)
    #[default]
    Dashboard,
    /// 单条路线详情 (需要认证)
    RouteDetail(u64),
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    ///
    /// `/` 视为面板；末尾斜杠被忽略。
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" | "/dashboard" => Self::Dashboard,
            "/login" => Self::Login,
            _ => match trimmed.strip_prefix("/routes/") {
                Some(id) => id.parse().map_or(Self::NotFound, Self::RouteDetail),
                None => Self::NotFound,
            },
        }
    }

    /// 获取路由对应的规范 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::RouteDetail(id) => format!("/routes/{}", id),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::Dashboard | Self::RouteDetail(_))
    }

    /// 定义已认证用户是否应该离开此路由（如登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功时的重定向目标（从登录页）
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

/// 守卫判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// 渲染目标路由
    Allow(AppRoute),
    /// 以替换历史记录的方式重定向
    Redirect(AppRoute),
}

/// 路由守卫：只依赖目标路由和会话准入状态
pub fn admit(target: AppRoute, admitted: bool) -> Admission {
    if target.requires_auth() && !admitted {
        Admission::Redirect(AppRoute::auth_failure_redirect())
    } else if target.should_redirect_when_authenticated() && admitted {
        Admission::Redirect(AppRoute::auth_success_redirect())
    } else {
        Admission::Allow(target)
    }
}
