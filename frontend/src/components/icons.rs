//! 内联 SVG 图标 (Lucide)
//!
//! 使用 `attr:class` 传入尺寸和颜色。

use crate::display::Icon;
use leptos::prelude::*;

macro_rules! lucide_icon {
    ($name:ident, $($body:tt)*) => {
        #[component]
        pub fn $name() -> impl IntoView {
            view! {
                <svg
                    xmlns="http://www.w3.org/2000/svg"
                    viewBox="0 0 24 24"
                    fill="none"
                    stroke="currentColor"
                    stroke-width="2"
                    stroke-linecap="round"
                    stroke-linejoin="round"
                >
                    $($body)*
                </svg>
            }
        }
    };
}

lucide_icon!(LogOut,
    <path d="M9 21H5a2 2 0 0 1-2-2V5a2 2 0 0 1 2-2h4" />
    <polyline points="16 17 21 12 16 7" />
    <line x1="21" x2="9" y1="12" y2="12" />
);

lucide_icon!(Truck,
    <path d="M14 18V6a2 2 0 0 0-2-2H4a2 2 0 0 0-2 2v11a1 1 0 0 0 1 1h2" />
    <path d="M15 18H9" />
    <path d="M19 18h2a1 1 0 0 0 1-1v-3.65a1 1 0 0 0-.22-.624l-3.48-4.35A1 1 0 0 0 17.52 8H14" />
    <circle cx="17" cy="18" r="2" />
    <circle cx="7" cy="18" r="2" />
);

lucide_icon!(Download,
    <path d="M21 15v4a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2v-4" />
    <polyline points="7 10 12 15 17 10" />
    <line x1="12" x2="12" y1="15" y2="3" />
);

lucide_icon!(Search,
    <circle cx="11" cy="11" r="8" />
    <path d="m21 21-4.3-4.3" />
);

lucide_icon!(ArrowLeft,
    <path d="m12 19-7-7 7-7" />
    <path d="M19 12H5" />
);

lucide_icon!(ChevronLeft,
    <path d="m15 18-6-6 6-6" />
);

lucide_icon!(ChevronRight,
    <path d="m9 18 6-6-6-6" />
);

lucide_icon!(Clock,
    <circle cx="12" cy="12" r="10" />
    <polyline points="12 6 12 12 16 14" />
);

lucide_icon!(CheckCircle,
    <path d="M22 11.08V12a10 10 0 1 1-5.93-9.14" />
    <polyline points="22 4 12 14.01 9 11.01" />
);

lucide_icon!(XCircle,
    <circle cx="12" cy="12" r="10" />
    <path d="m15 9-6 6" />
    <path d="m9 9 6 6" />
);

lucide_icon!(Package,
    <path d="m7.5 4.27 9 5.15" />
    <path d="M21 8a2 2 0 0 0-1-1.73l-7-4a2 2 0 0 0-2 0l-7 4A2 2 0 0 0 3 8v8a2 2 0 0 0 1 1.73l7 4a2 2 0 0 0 2 0l7-4A2 2 0 0 0 21 16Z" />
    <path d="m3.3 7 8.7 5 8.7-5" />
    <path d="M12 22V12" />
);

lucide_icon!(AlertTriangle,
    <path d="m21.73 18-8-14a2 2 0 0 0-3.48 0l-8 14A2 2 0 0 0 4 21h16a2 2 0 0 0 1.73-3" />
    <path d="M12 9v4" />
    <path d="M12 17h.01" />
);

lucide_icon!(HelpCircle,
    <circle cx="12" cy="12" r="10" />
    <path d="M9.09 9a3 3 0 0 1 5.83 1c0 2-3 3-3 3" />
    <path d="M12 17h.01" />
);

lucide_icon!(User,
    <path d="M19 21v-2a4 4 0 0 0-4-4H9a4 4 0 0 0-4 4v2" />
    <circle cx="12" cy="7" r="4" />
);

/// 按状态元数据选择图标
#[component]
pub fn StatusIcon(icon: Icon, #[prop(optional, into)] class: String) -> impl IntoView {
    match icon {
        Icon::Clock => view! { <Clock attr:class=class /> }.into_any(),
        Icon::Truck => view! { <Truck attr:class=class /> }.into_any(),
        Icon::Check => view! { <CheckCircle attr:class=class /> }.into_any(),
        Icon::Cross => view! { <XCircle attr:class=class /> }.into_any(),
        Icon::Package => view! { <Package attr:class=class /> }.into_any(),
        Icon::Alert => view! { <AlertTriangle attr:class=class /> }.into_any(),
        Icon::Question => view! { <HelpCircle attr:class=class /> }.into_any(),
    }
}
