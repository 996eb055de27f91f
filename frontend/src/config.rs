//! 客户端配置模块
//!
//! 后端地址默认指向本地开发服务，可在构建时通过 `ROUTEDASH_API_URL` 覆盖。

use routedash_shared::DEFAULT_PAGE_SIZE;

/// 默认后端地址（包含 `/api` 前缀）
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

/// 登录页路径，401 时强制跳转到此处
pub const LOGIN_PATH: &str = "/login";

/// 客户端配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API 基础地址，不含结尾的 `/`
    pub base_url: String,
    /// 列表分页大小，需与后端一致
    pub page_size: u32,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// 构建时配置：优先读取 `ROUTEDASH_API_URL`，否则使用默认地址
    pub fn from_build_env() -> Self {
        Self::new(option_env!("ROUTEDASH_API_URL").unwrap_or(DEFAULT_API_BASE_URL))
    }

    /// 拼接完整 URL
    pub fn url(&self, target: &str) -> String {
        if target.starts_with('/') {
            format!("{}{}", self.base_url, target)
        } else {
            format!("{}/{}", self.base_url, target)
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}
