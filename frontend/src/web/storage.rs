//! LocalStorage 封装模块
//!
//! 使用 `web_sys::Storage` 替代 `gloo-storage`。
//! 只持久化方便用户的非敏感数据；令牌永远不落盘。

const LAST_EMAIL_KEY: &str = "routedash_last_email";

/// 本地存储操作封装
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    /// 获取存储的字符串值，键不存在或出错时返回 `None`
    pub fn get(key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    /// 设置存储值，返回操作是否成功
    pub fn set(key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    /// 上次成功登录使用的邮箱（用于自动填充）
    pub fn last_email() -> Option<String> {
        Self::get(LAST_EMAIL_KEY).filter(|e| !e.is_empty())
    }

    pub fn remember_email(email: &str) {
        if !Self::set(LAST_EMAIL_KEY, email) {
            log::warn!("[Storage] could not persist last email");
        }
    }
}
