//! 展示辅助模块
//!
//! 与 DOM 无关的纯函数：状态元数据、分页窗口、进度与时间格式化。
//! 组件只负责把这里的结果渲染出来。

use chrono::{DateTime, Utc};
use routedash_shared::{Order, OrderStatus, RouteStatus};

// =========================================================
// 状态元数据 (Status Metadata)
// =========================================================

/// 徽章色调
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Info,
    Success,
    Warning,
    Error,
}

impl Tone {
    /// daisyUI 徽章样式
    pub fn badge_class(self) -> &'static str {
        match self {
            Tone::Neutral => "badge badge-ghost",
            Tone::Info => "badge badge-info",
            Tone::Success => "badge badge-success",
            Tone::Warning => "badge badge-warning",
            Tone::Error => "badge badge-error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Clock,
    Truck,
    Check,
    Cross,
    Package,
    Alert,
    Question,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusMeta {
    pub label: &'static str,
    pub tone: Tone,
    pub icon: Icon,
}

impl StatusMeta {
    const fn new(label: &'static str, tone: Tone, icon: Icon) -> Self {
        Self { label, tone, icon }
    }
}

const UNKNOWN_META: StatusMeta = StatusMeta::new("Unknown", Tone::Neutral, Icon::Question);

pub fn route_status_meta(status: RouteStatus) -> StatusMeta {
    match status {
        RouteStatus::Planned => StatusMeta::new("Planned", Tone::Info, Icon::Clock),
        RouteStatus::InProgress => StatusMeta::new("In Progress", Tone::Warning, Icon::Truck),
        RouteStatus::Completed => StatusMeta::new("Completed", Tone::Success, Icon::Check),
        RouteStatus::Cancelled => StatusMeta::new("Cancelled", Tone::Error, Icon::Cross),
        RouteStatus::Unknown => UNKNOWN_META,
    }
}

pub fn order_status_meta(status: OrderStatus) -> StatusMeta {
    match status {
        OrderStatus::Pending => StatusMeta::new("Pending", Tone::Neutral, Icon::Clock),
        OrderStatus::Assigned => StatusMeta::new("Assigned", Tone::Info, Icon::Package),
        OrderStatus::InTransit => StatusMeta::new("In Transit", Tone::Warning, Icon::Truck),
        OrderStatus::Delivered => StatusMeta::new("Delivered", Tone::Success, Icon::Check),
        OrderStatus::Failed => StatusMeta::new("Failed", Tone::Error, Icon::Alert),
        OrderStatus::Unknown => UNKNOWN_META,
    }
}

// =========================================================
// 分页 (Pagination)
// =========================================================

/// 页码按钮的最大数量
pub const PAGE_WINDOW: u32 = 5;

/// 分页计算，页码从 1 开始
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub current: u32,
    pub count: u64,
    pub page_size: u32,
}

impl Pager {
    pub fn new(current: u32, count: u64, page_size: u32) -> Self {
        Self {
            current: current.max(1),
            count,
            page_size: page_size.max(1),
        }
    }

    pub fn total_pages(&self) -> u32 {
        self.count.div_ceil(u64::from(self.page_size)) as u32
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages()
    }

    /// 以当前页为中心、最多 `width` 个的页码窗口
    ///
    /// 靠近末尾时窗口左移，保证尽量显示满 `width` 个按钮。
    pub fn window(&self, width: u32) -> Vec<u32> {
        let total = self.total_pages();
        if total == 0 || width == 0 {
            return Vec::new();
        }
        let mut start = self.current.saturating_sub(width / 2).max(1);
        let end = (start + width - 1).min(total);
        if end + 1 - start < width {
            start = (end + 1).saturating_sub(width).max(1);
        }
        (start..=end).collect()
    }

    /// 当前页显示的条目区间 (起, 止)，均从 1 开始；空列表返回 (0, 0)
    pub fn showing(&self) -> (u64, u64) {
        if self.count == 0 {
            return (0, 0);
        }
        let size = u64::from(self.page_size);
        let first = u64::from(self.current - 1) * size + 1;
        let last = (u64::from(self.current) * size).min(self.count);
        (first.min(self.count), last)
    }

    pub fn summary(&self, noun: &str) -> String {
        let (first, last) = self.showing();
        format!("Showing {} to {} of {} {}", first, last, self.count, noun)
    }
}

// =========================================================
// 格式化 (Formatting)
// =========================================================

/// 完成度四舍五入到整数百分比，缺失视为 0
pub fn completion_percent(value: Option<f64>) -> u32 {
    value.map(|v| v.clamp(0.0, 100.0).round() as u32).unwrap_or(0)
}

pub fn completion_label(value: Option<f64>) -> String {
    format!("{}%", completion_percent(value))
}

/// 已送达订单数
///
/// 订单列表加载后按其中 `DELIVERED` 的数量计算；
/// 尚未加载时退回到路线自带的 `delivered_count`，都没有则为 0。
pub fn delivered_count(orders: Option<&[Order]>, reported: Option<u32>) -> u32 {
    match orders {
        Some(orders) => orders
            .iter()
            .filter(|o| o.status == OrderStatus::Delivered)
            .count() as u32,
        None => reported.unwrap_or(0),
    }
}

pub fn format_date(ts: &DateTime<Utc>) -> String {
    ts.format("%b %-d, %Y").to_string()
}

pub fn format_datetime(ts: &DateTime<Utc>) -> String {
    ts.format("%b %-d, %Y %H:%M UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_every_route_status_has_meta() {
        for status in RouteStatus::ALL {
            assert_ne!(route_status_meta(status), UNKNOWN_META);
        }
        assert_eq!(route_status_meta(RouteStatus::Unknown).label, "Unknown");
        assert_eq!(
            route_status_meta(RouteStatus::InProgress).tone.badge_class(),
            "badge badge-warning"
        );
    }

    #[test]
    fn test_every_order_status_has_meta() {
        for status in OrderStatus::ALL {
            assert_ne!(order_status_meta(status), UNKNOWN_META);
        }
        assert_eq!(order_status_meta(OrderStatus::Delivered).icon, Icon::Check);
    }

    #[test]
    fn test_last_partial_page() {
        let pager = Pager::new(3, 25, 10);
        assert_eq!(pager.total_pages(), 3);
        assert!(!pager.has_next());
        assert!(pager.has_previous());
        assert_eq!(pager.showing(), (21, 25));
        assert_eq!(pager.summary("routes"), "Showing 21 to 25 of 25 routes");
    }

    #[test]
    fn test_first_page() {
        let pager = Pager::new(1, 25, 10);
        assert!(!pager.has_previous());
        assert!(pager.has_next());
        assert_eq!(pager.showing(), (1, 10));
    }

    #[test]
    fn test_empty_result() {
        let pager = Pager::new(1, 0, 10);
        assert_eq!(pager.total_pages(), 0);
        assert!(!pager.has_next());
        assert!(pager.window(PAGE_WINDOW).is_empty());
        assert_eq!(pager.summary("routes"), "Showing 0 to 0 of 0 routes");
    }

    #[test]
    fn test_window_is_centred() {
        assert_eq!(Pager::new(6, 200, 10).window(5), vec![4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_window_clamps_at_edges() {
        assert_eq!(Pager::new(1, 200, 10).window(5), vec![1, 2, 3, 4, 5]);
        assert_eq!(Pager::new(2, 200, 10).window(5), vec![1, 2, 3, 4, 5]);
        assert_eq!(Pager::new(20, 200, 10).window(5), vec![16, 17, 18, 19, 20]);
        assert_eq!(Pager::new(19, 200, 10).window(5), vec![16, 17, 18, 19, 20]);
        assert_eq!(Pager::new(2, 25, 10).window(5), vec![1, 2, 3]);
    }

    #[test]
    fn test_completion_rounding() {
        assert_eq!(completion_label(Some(66.6)), "67%");
        assert_eq!(completion_label(Some(12.4)), "12%");
        assert_eq!(completion_label(None), "0%");
        assert_eq!(completion_percent(Some(140.0)), 100);
    }

    fn order(id: u64, status: OrderStatus) -> Order {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        Order {
            id,
            route_id: 7,
            code: format!("ORD-{}", id),
            customer_name: "Bo".to_string(),
            address: "1 Main St".to_string(),
            status,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn test_delivered_count_comes_from_loaded_orders() {
        let orders = vec![
            order(1, OrderStatus::Delivered),
            order(2, OrderStatus::InTransit),
            order(3, OrderStatus::Delivered),
            order(4, OrderStatus::Unknown),
        ];
        assert_eq!(delivered_count(Some(&orders), None), 2);
        // 已加载的订单优先于路线自带的计数
        assert_eq!(delivered_count(Some(&orders), Some(9)), 2);
        assert_eq!(delivered_count(Some(&[]), Some(9)), 0);
    }

    #[test]
    fn test_delivered_count_falls_back_before_orders_load() {
        assert_eq!(delivered_count(None, Some(3)), 3);
        assert_eq!(delivered_count(None, None), 0);
    }

    #[test]
    fn test_date_formatting() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 5, 9, 7, 0).unwrap();
        assert_eq!(format_date(&ts), "Mar 5, 2024");
        assert_eq!(format_datetime(&ts), "Mar 5, 2024 09:07 UTC");
    }
}
