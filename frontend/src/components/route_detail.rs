use crate::auth::use_auth;
use crate::components::feedback::{ErrorAlert, Loading};
use crate::components::icons::{ArrowLeft, CheckCircle, Package, Search, User};
use crate::components::status_badge::{OrderStatusBadge, RouteStatusBadge};
use crate::display::{
    completion_label, delivered_count, format_datetime, order_status_meta, route_status_meta,
};
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use routedash_shared::{Order, OrderStatus, Route, RouteStatus};

#[component]
pub fn RouteDetailPage(id: u64) -> impl IntoView {
    let auth = use_auth();
    let revision = auth.cache_revision();

    let (order_search, set_order_search) = signal(String::new());
    // 变更失败时递增，用于把下拉框恢复成服务端的值
    let (reset, set_reset) = signal(0u32);

    let route = LocalResource::new(move || {
        revision.track();
        let client = auth.client();
        async move { client.get_route(id).await }
    });

    let orders = LocalResource::new(move || {
        revision.track();
        let client = auth.client();
        let search = order_search.get();
        async move { client.list_route_orders(id, Some(search)).await }
    });

    // 已加载的订单列表，用于统计送达数
    let loaded_orders = Signal::derive(move || orders.get().and_then(Result::ok));

    let change_route_status = move |status: RouteStatus| {
        let client = auth.client();
        spawn_local(async move {
            if let Err(e) = client.update_route_status(id, status).await {
                log::error!("[RouteDetail] update route {} to {} failed: {}", id, status, e);
                set_reset.update(|n| *n += 1);
            }
        });
    };

    let change_order_status = move |order_id: u64, status: OrderStatus| {
        let client = auth.client();
        spawn_local(async move {
            if let Err(e) = client.update_order_status(order_id, status).await {
                log::error!("[RouteDetail] update order {} to {} failed: {}", order_id, status, e);
                set_reset.update(|n| *n += 1);
            }
        });
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-6">
                <Link to="/dashboard" class="btn btn-ghost gap-2">
                    <ArrowLeft attr:class="h-4 w-4" />
                    "Back to routes"
                </Link>

                {move || {
                    reset.track();
                    match route.get() {
                        None => view! { <Loading /> }.into_any(),
                        Some(Err(e)) => view! { <ErrorAlert error=e /> }.into_any(),
                        Some(Ok(route)) => {
                            view! {
                                <RouteSummary
                                    route=route
                                    orders=loaded_orders
                                    on_status=change_route_status
                                />
                            }
                                .into_any()
                        }
                    }
                }}

                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body p-0">
                        <div class="flex flex-col md:flex-row md:items-center justify-between gap-4 p-6 pb-2">
                            <h3 class="card-title">"Orders"</h3>
                            <label class="input input-bordered flex items-center gap-2 md:w-80">
                                <Search attr:class="h-4 w-4 opacity-70" />
                                <input
                                    type="text"
                                    class="grow"
                                    placeholder="Search orders"
                                    prop:value=order_search
                                    on:input=move |ev| set_order_search.set(event_target_value(&ev))
                                />
                            </label>
                        </div>
                        {move || {
                            reset.track();
                            match orders.get() {
                                None => view! { <Loading /> }.into_any(),
                                Some(Err(e)) => {
                                    view! {
                                        <div class="p-6">
                                            <ErrorAlert error=e />
                                        </div>
                                    }
                                        .into_any()
                                }
                                Some(Ok(orders)) => {
                                    view! { <OrderTable orders=orders on_status=change_order_status /> }
                                        .into_any()
                                }
                            }
                        }}
                    </div>
                </div>

                {move || {
                    route
                        .get()
                        .and_then(Result::ok)
                        .map(|route| view! { <RouteMetadata route=route /> })
                }}
            </div>
        </div>
    }
}

#[component]
fn RouteSummary<F>(
    route: Route,
    orders: Signal<Option<Vec<Order>>>,
    on_status: F,
) -> impl IntoView
where
    F: Fn(RouteStatus) + Copy + 'static,
{
    let current = route.status;
    let reported = route.delivered_count;

    view! {
        <div class="flex flex-col md:flex-row md:items-center justify-between gap-4">
            <div class="flex items-center gap-3">
                <h1 class="text-3xl font-bold">{route.name}</h1>
                <RouteStatusBadge status=current />
            </div>
            <select
                class="select select-bordered"
                on:change=move |ev| {
                    if let Some(status) = RouteStatus::parse(&event_target_value(&ev)) {
                        if status != current {
                            on_status(status);
                        }
                    }
                }
            >
                {RouteStatus::ALL
                    .into_iter()
                    .map(|status| {
                        view! {
                            <option value=status.as_str() selected=status == current>
                                {route_status_meta(status).label}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>
        </div>

        <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
            <div class="stat">
                <div class="stat-figure text-primary">
                    <User attr:class="h-8 w-8" />
                </div>
                <div class="stat-title">"Driver"</div>
                <div class="stat-value text-2xl">{route.driver_name}</div>
            </div>
            <div class="stat">
                <div class="stat-figure text-secondary">
                    <Package attr:class="h-8 w-8" />
                </div>
                <div class="stat-title">"Total Orders"</div>
                <div class="stat-value">{route.order_count.unwrap_or(0)}</div>
            </div>
            <div class="stat">
                <div class="stat-figure text-success">
                    <CheckCircle attr:class="h-8 w-8" />
                </div>
                <div class="stat-title">"Delivered"</div>
                <div class="stat-value text-success">
                    {move || delivered_count(orders.get().as_deref(), reported)}
                </div>
            </div>
            <div class="stat">
                <div class="stat-title">"Completion"</div>
                <div class="stat-value text-primary">
                    {completion_label(route.completion_percentage)}
                </div>
            </div>
        </div>
    }
}

#[component]
fn OrderTable<F>(orders: Vec<Order>, on_status: F) -> impl IntoView
where
    F: Fn(u64, OrderStatus) + Copy + 'static,
{
    if orders.is_empty() {
        return view! {
            <div class="text-center py-8 text-base-content/50">"No orders found."</div>
        }
        .into_any();
    }

    view! {
        <div class="overflow-x-auto w-full">
            <table class="table table-zebra w-full">
                <thead>
                    <tr>
                        <th>"Code"</th>
                        <th>"Customer"</th>
                        <th class="hidden md:table-cell">"Address"</th>
                        <th>"Status"</th>
                        <th>"Update"</th>
                    </tr>
                </thead>
                <tbody>
                    {orders
                        .into_iter()
                        .map(|order| {
                            let order_id = order.id;
                            let current = order.status;
                            view! {
                                <tr>
                                    <td class="font-mono">{order.code}</td>
                                    <td>{order.customer_name}</td>
                                    <td class="hidden md:table-cell">{order.address}</td>
                                    <td>
                                        <OrderStatusBadge status=current />
                                    </td>
                                    <td>
                                        <select
                                            class="select select-bordered select-sm"
                                            on:change=move |ev| {
                                                if let Some(status) = OrderStatus::parse(&event_target_value(&ev)) {
                                                    if status != current {
                                                        on_status(order_id, status);
                                                    }
                                                }
                                            }
                                        >
                                            {OrderStatus::ALL
                                                .into_iter()
                                                .map(|status| {
                                                    view! {
                                                        <option value=status.as_str() selected=status == current>
                                                            {order_status_meta(status).label}
                                                        </option>
                                                    }
                                                })
                                                .collect_view()}
                                        </select>
                                    </td>
                                </tr>
                            }
                        })
                        .collect_view()}
                </tbody>
            </table>
        </div>
    }
    .into_any()
}

#[component]
fn RouteMetadata(route: Route) -> impl IntoView {
    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <h3 class="card-title">"Route Information"</h3>
                <dl class="grid grid-cols-1 md:grid-cols-3 gap-4 text-sm">
                    <div>
                        <dt class="text-base-content/60">"Route ID"</dt>
                        <dd class="font-mono">{route.id}</dd>
                    </div>
                    <div>
                        <dt class="text-base-content/60">"Created"</dt>
                        <dd>{format_datetime(&route.created_at)}</dd>
                    </div>
                    <div>
                        <dt class="text-base-content/60">"Last Updated"</dt>
                        <dd>{format_datetime(&route.updated_at)}</dd>
                    </div>
                </dl>
            </div>
        </div>
    }
}
