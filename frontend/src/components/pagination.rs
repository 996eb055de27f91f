use crate::components::icons::{ChevronLeft, ChevronRight};
use crate::display::{PAGE_WINDOW, Pager};
use leptos::prelude::*;

/// 分页页脚
///
/// 上一页/下一页需要服务端游标存在，且 `Pager` 认为目标页在范围内；
/// 页码按钮由 `Pager` 计算的窗口给出。
#[component]
pub fn Pagination(
    pager: Pager,
    has_previous: bool,
    has_next: bool,
    /// 点击页码或翻页时回调目标页
    on_page: Callback<u32>,
) -> impl IntoView {
    let current = pager.current;
    let can_previous = has_previous && pager.has_previous();
    let can_next = has_next && pager.has_next();

    view! {
        <div class="flex flex-col md:flex-row items-center justify-between gap-4 p-4 border-t border-base-200">
            <span class="text-sm text-base-content/70">{pager.summary("routes")}</span>
            <div class="join">
                <button
                    class="join-item btn btn-sm"
                    disabled=!can_previous
                    on:click=move |_| on_page.run(current.saturating_sub(1).max(1))
                >
                    <ChevronLeft attr:class="h-4 w-4" />
                    "Previous"
                </button>
                {pager
                    .window(PAGE_WINDOW)
                    .into_iter()
                    .map(|page| {
                        let class = if page == current {
                            "join-item btn btn-sm btn-active"
                        } else {
                            "join-item btn btn-sm"
                        };
                        view! {
                            <button class=class on:click=move |_| on_page.run(page)>
                                {page}
                            </button>
                        }
                    })
                    .collect_view()}
                <button
                    class="join-item btn btn-sm"
                    disabled=!can_next
                    on:click=move |_| on_page.run(current + 1)
                >
                    "Next"
                    <ChevronRight attr:class="h-4 w-4" />
                </button>
            </div>
        </div>
    }
}
