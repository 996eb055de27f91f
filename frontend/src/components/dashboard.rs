use crate::auth::{sign_out, use_auth};
use crate::components::feedback::{ErrorAlert, Loading};
use crate::components::icons::{Download, LogOut, Search, Truck};
use crate::components::pagination::Pagination;
use crate::components::status_badge::RouteStatusBadge;
use crate::display::{Pager, completion_percent, format_date};
use crate::web::download::save_bytes;
use crate::web::router::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;
use routedash_shared::{Paginated, Route, RouteStatus};

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let page_size = auth.client().config().page_size;

    let (search, set_search) = signal(String::new());
    let (status_filter, set_status_filter) = signal(Option::<RouteStatus>::None);
    let (page, set_page) = signal(1u32);
    let (exporting, set_exporting) = signal(false);

    let revision = auth.cache_revision();
    let routes = LocalResource::new(move || {
        // 缓存失效时重新查询
        revision.track();
        let client = auth.client();
        let status = status_filter.get();
        let page = page.get();
        let search = search.get();
        async move { client.list_routes(status, Some(page), Some(search)).await }
    });

    // 搜索或筛选变化都回到第一页
    let apply_search = move |value: String| {
        set_search.set(value);
        set_page.set(1);
    };
    let apply_filter = move |value: String| {
        set_status_filter.set(RouteStatus::parse(&value));
        set_page.set(1);
    };

    let on_export = move |_| {
        set_exporting.set(true);
        let client = auth.client();
        let search = search.get_untracked();
        spawn_local(async move {
            match client.export_routes_csv(Some(search)).await {
                Ok(bytes) => {
                    if let Err(e) = save_bytes("routes.csv", "text/csv", &bytes) {
                        log::error!("[Dashboard] CSV download failed: {}", e);
                    }
                }
                Err(e) => log::error!("[Dashboard] CSV export failed: {}", e),
            }
            set_exporting.set(false);
        });
    };

    let on_logout = move |_| {
        let client = auth.client();
        spawn_local(async move { sign_out(&client).await });
    };

    let on_page = Callback::new(move |target: u32| set_page.set(target));

    let open_route = move |id: u64| router.navigate(&format!("/routes/{}", id));

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <div class="navbar bg-base-100 rounded-box shadow-xl">
                    <div class="flex-1 gap-2">
                        <Truck attr:class="text-primary h-6 w-6" />
                        <span class="text-xl font-semibold px-2">"Delivery Routes"</span>
                    </div>
                    <div class="flex-none gap-2">
                        <button
                            class="btn btn-outline gap-2"
                            disabled=move || exporting.get()
                            on:click=on_export
                        >
                            <Download attr:class="h-4 w-4" />
                            "Export CSV"
                        </button>
                        <button on:click=on_logout class="btn btn-outline btn-error gap-2">
                            <LogOut attr:class="h-4 w-4" />
                            "Log out"
                        </button>
                    </div>
                </div>

                {move || {
                    routes
                        .get()
                        .and_then(Result::ok)
                        .map(|data| view! { <RouteStats data=data /> })
                }}

                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body p-0">
                        <div class="flex flex-col md:flex-row gap-4 p-6 pb-2">
                            <label class="input input-bordered flex items-center gap-2 flex-1">
                                <Search attr:class="h-4 w-4 opacity-70" />
                                <input
                                    type="text"
                                    class="grow"
                                    placeholder="Search routes or drivers"
                                    prop:value=search
                                    on:input=move |ev| apply_search(event_target_value(&ev))
                                />
                            </label>
                            <select class="select select-bordered" on:change=move |ev| apply_filter(event_target_value(&ev))>
                                <option value="all" selected=move || status_filter.get().is_none()>
                                    "All statuses"
                                </option>
                                {RouteStatus::ALL
                                    .into_iter()
                                    .map(|status| {
                                        view! {
                                            <option
                                                value=status.as_str()
                                                selected=move || status_filter.get() == Some(status)
                                            >
                                                {crate::display::route_status_meta(status).label}
                                            </option>
                                        }
                                    })
                                    .collect_view()}
                            </select>
                        </div>

                        {move || match routes.get() {
                            None => view! { <Loading /> }.into_any(),
                            Some(Err(e)) => {
                                view! {
                                    <div class="p-6">
                                        <ErrorAlert error=e />
                                    </div>
                                }
                                    .into_any()
                            }
                            Some(Ok(data)) => {
                                let pager = Pager::new(page.get_untracked(), data.count, page_size);
                                let has_previous = data.has_previous();
                                let has_next = data.has_next();
                                view! {
                                    <RouteTable routes=data.results on_open=open_route />
                                    <Pagination
                                        pager=pager
                                        has_previous=has_previous
                                        has_next=has_next
                                        on_page=on_page
                                    />
                                }
                                    .into_any()
                            }
                        }}
                    </div>
                </div>
            </div>
        </div>
    }
}

/// 顶部统计：总数来自 `count`，其余按当前页统计
#[component]
fn RouteStats(data: Paginated<Route>) -> impl IntoView {
    let tally = |status: RouteStatus| data.results.iter().filter(|r| r.status == status).count();
    let in_progress = tally(RouteStatus::InProgress);
    let completed = tally(RouteStatus::Completed);
    let planned = tally(RouteStatus::Planned);

    view! {
        <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
            <div class="stat">
                <div class="stat-title">"Total Routes"</div>
                <div class="stat-value text-primary">{data.count}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"In Progress"</div>
                <div class="stat-value text-warning">{in_progress}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Completed"</div>
                <div class="stat-value text-success">{completed}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Planned"</div>
                <div class="stat-value text-info">{planned}</div>
            </div>
        </div>
    }
}

#[component]
fn RouteTable<F>(routes: Vec<Route>, on_open: F) -> impl IntoView
where
    F: Fn(u64) + Copy + 'static,
{
    if routes.is_empty() {
        return view! {
            <div class="text-center py-8 text-base-content/50">"No routes found."</div>
        }
        .into_any();
    }

    view! {
        <div class="overflow-x-auto w-full">
            <table class="table table-zebra w-full">
                <thead>
                    <tr>
                        <th>"Route"</th>
                        <th>"Driver"</th>
                        <th>"Status"</th>
                        <th class="hidden md:table-cell">"Orders"</th>
                        <th>"Progress"</th>
                        <th class="hidden md:table-cell">"Last Updated"</th>
                    </tr>
                </thead>
                <tbody>
                    {routes
                        .into_iter()
                        .map(|route| {
                            let id = route.id;
                            let percent = completion_percent(route.completion_percentage);
                            view! {
                                <tr class="hover cursor-pointer" on:click=move |_| on_open(id)>
                                    <td class="font-medium">{route.name}</td>
                                    <td>{route.driver_name}</td>
                                    <td>
                                        <RouteStatusBadge status=route.status />
                                    </td>
                                    <td class="hidden md:table-cell">{route.order_count.unwrap_or(0)}</td>
                                    <td>
                                        <div class="flex items-center gap-2">
                                            <progress
                                                class="progress progress-primary w-20"
                                                value=percent
                                                max="100"
                                            ></progress>
                                            <span class="text-xs">{format!("{}%", percent)}</span>
                                        </div>
                                    </td>
                                    <td class="hidden md:table-cell">{format_date(&route.updated_at)}</td>
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
