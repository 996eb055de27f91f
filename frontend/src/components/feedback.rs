use crate::components::icons::AlertTriangle;
use crate::error::ApiError;
use leptos::prelude::*;

/// 请求失败提示
///
/// 401 已由客户端全局处理（注销并跳转），这里什么都不渲染。
#[component]
pub fn ErrorAlert(error: ApiError) -> impl IntoView {
    (!error.is_unauthorized()).then(|| {
        view! {
            <div role="alert" class="alert alert-error">
                <AlertTriangle attr:class="h-5 w-5 shrink-0" />
                <span>{error.user_message()}</span>
            </div>
        }
    })
}

#[component]
pub fn Loading() -> impl IntoView {
    view! {
        <div class="flex justify-center py-12">
            <span class="loading loading-spinner loading-lg text-primary"></span>
        </div>
    }
}
