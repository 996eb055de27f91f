use crate::components::icons::StatusIcon;
use crate::display::{StatusMeta, order_status_meta, route_status_meta};
use leptos::prelude::*;
use routedash_shared::{OrderStatus, RouteStatus};

#[component]
fn Badge(meta: StatusMeta) -> impl IntoView {
    view! {
        <span class=format!("{} gap-1 whitespace-nowrap", meta.tone.badge_class())>
            <StatusIcon icon=meta.icon class="h-3 w-3" />
            {meta.label}
        </span>
    }
}

#[component]
pub fn RouteStatusBadge(status: RouteStatus) -> impl IntoView {
    view! { <Badge meta=route_status_meta(status) /> }
}

#[component]
pub fn OrderStatusBadge(status: OrderStatus) -> impl IntoView {
    view! { <Badge meta=order_status_meta(status) /> }
}
