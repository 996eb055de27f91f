use super::*;
use crate::request::MockHttpClient;
use crate::session::Session;
use routedash_shared::protocol::HttpMethod;
use routedash_shared::DEFAULT_PAGE_SIZE;
use serde_json::{Value, json};

// =========================================================
// 辅助函数
// =========================================================

const BASE: &str = "http://api.test/api";

struct Harness {
    client: ApiClient<MockHttpClient>,
    http: MockHttpClient,
    session: SessionStore,
    navigations: Rc<RefCell<Vec<String>>>,
}

fn harness() -> Harness {
    let http = MockHttpClient::new();
    let session = SessionStore::new();
    let navigations = Rc::new(RefCell::new(Vec::new()));
    let nav_log = Rc::clone(&navigations);
    let navigator: Navigator =
        Rc::new(move |path: &str| nav_log.borrow_mut().push(path.to_string()));
    let client = ApiClient::new(
        http.clone(),
        ClientConfig::new(BASE),
        session,
        Some(navigator),
    );
    Harness {
        client,
        http,
        session,
        navigations,
    }
}

fn url(target: &str) -> String {
    format!("{}{}", BASE, target)
}

fn route_json(id: u64, status: &str, completion: f64) -> Value {
    json!({
        "id": id,
        "name": format!("Route {}", id),
        "driver_name": "Ana",
        "status": status,
        "order_count": 4,
        "delivered_count": 1,
        "completion_percentage": completion,
        "created_at": "2024-03-01T08:00:00Z",
        "updated_at": "2024-03-01T09:00:00Z"
    })
}

fn order_json(id: u64, route_id: u64, status: &str) -> Value {
    json!({
        "id": id,
        "route": route_id,
        "code": format!("ORD-{}", id),
        "customer_name": "Bo",
        "address": "1 Main St",
        "status": status,
        "created_at": "2024-03-01T08:00:00Z",
        "updated_at": "2024-03-01T08:00:00Z"
    })
}

fn page_json(
    ids: std::ops::RangeInclusive<u64>,
    count: u64,
    next: Option<&str>,
    previous: Option<&str>,
) -> Value {
    let results: Vec<Value> = ids.map(|id| route_json(id, "PLANNED", 0.0)).collect();
    json!({ "results": results, "count": count, "next": next, "previous": previous })
}

// =========================================================
// 认证测试
// =========================================================

#[tokio::test]
async fn test_login_returns_access_token() {
    let h = harness();
    h.http.mock_response(
        HttpMethod::Post,
        &url("/auth/login"),
        200,
        json!({ "access": "tok-1", "refresh": "ref-1" }),
    );

    let resp = h.client.login("a@b.com", "x").await.unwrap();
    assert_eq!(resp.access, "tok-1");
    assert_eq!(resp.refresh.as_deref(), Some("ref-1"));

    let (method, _, headers, body) = h.http.last_request().unwrap();
    assert_eq!(method, HttpMethod::Post);
    assert_eq!(headers.get("Content-Type").map(String::as_str), Some("application/json"));
    let body: Value = serde_json::from_str(&body.unwrap()).unwrap();
    assert_eq!(body, json!({ "email": "a@b.com", "password": "x" }));
}

#[tokio::test]
async fn test_login_rejection_maps_to_invalid_credentials() {
    let h = harness();
    h.http
        .mock_response(HttpMethod::Post, &url("/auth/login"), 401, json!({ "detail": "nope" }));

    let err = h.client.login("a@b.com", "wrong").await.unwrap_err();
    assert_eq!(err, ApiError::InvalidCredentials);
    assert_eq!(h.session.snapshot(), Session::default());

    h.http
        .mock_response(HttpMethod::Post, &url("/auth/login"), 400, json!({ "email": ["bad"] }));
    let err = h.client.login("", "").await.unwrap_err();
    assert_eq!(err, ApiError::InvalidCredentials);
}

#[tokio::test]
async fn test_login_network_failure_is_not_credentials() {
    let h = harness();
    h.http.mock_offline(&url("/auth/login"));
    let err = h.client.login("a@b.com", "x").await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}

#[tokio::test]
async fn test_register_sends_confirmation_as_password2() {
    let h = harness();
    h.http.mock_response(
        HttpMethod::Post,
        &url("/auth/register"),
        201,
        json!({ "id": 5, "email": "new@b.com" }),
    );

    let resp = h.client.register("new@b.com", "pw", "pw").await.unwrap();
    assert_eq!(resp.id, 5);

    let (_, _, _, body) = h.http.last_request().unwrap();
    let body: Value = serde_json::from_str(&body.unwrap()).unwrap();
    assert_eq!(body["password2"], "pw");
}

#[tokio::test]
async fn test_logout_posts_to_backend() {
    let h = harness();
    h.session.set_token("tok");
    h.http
        .mock_bytes(HttpMethod::Post, &url("/auth/logout"), 204, Vec::new());

    h.client.logout().await.unwrap();
    assert_eq!(h.http.count(HttpMethod::Post, &url("/auth/logout")), 1);
}

// =========================================================
// 请求头与 401 处理
// =========================================================

#[tokio::test]
async fn test_bearer_header_attached_only_with_token() {
    let h = harness();
    h.http
        .mock_response(HttpMethod::Get, &url("/orders/1"), 200, order_json(1, 7, "PENDING"));

    h.client.get_order(1).await.unwrap();
    let (_, _, headers, _) = h.http.last_request().unwrap();
    assert!(!headers.contains_key("Authorization"));

    h.session.set_token("tok-9");
    h.client.clear_cache();
    h.client.get_order(1).await.unwrap();
    let (_, _, headers, _) = h.http.last_request().unwrap();
    assert_eq!(headers.get("Authorization").map(String::as_str), Some("Bearer tok-9"));
}

#[tokio::test]
async fn test_unauthorized_forces_logout_and_redirect() {
    let h = harness();
    h.session.set_token("expired");
    h.http
        .mock_response(HttpMethod::Get, &url("/routes/7"), 401, json!({ "detail": "expired" }));

    let err = h.client.get_route(7).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(h.session.snapshot(), Session::default());
    assert_eq!(*h.navigations.borrow(), vec!["/login".to_string()]);
}

#[tokio::test]
async fn test_unauthorized_handled_for_every_operation() {
    let h = harness();
    let targets = [
        (HttpMethod::Get, "/routes?page=1"),
        (HttpMethod::Put, "/routes/3/status"),
        (HttpMethod::Get, "/routes/3/orders"),
        (HttpMethod::Get, "/routes/export.csv"),
        (HttpMethod::Put, "/orders/4/status"),
        (HttpMethod::Post, "/auth/logout"),
    ];
    for (method, target) in targets {
        h.http.mock_response(method, &url(target), 401, json!({}));
    }

    let results = vec![
        h.client.list_routes(None, Some(1), None).await.map(|_| ()),
        h.client
            .update_route_status(3, RouteStatus::Completed)
            .await
            .map(|_| ()),
        h.client.list_route_orders(3, None).await.map(|_| ()),
        h.client.export_routes_csv(None).await.map(|_| ()),
        h.client
            .update_order_status(4, OrderStatus::Failed)
            .await
            .map(|_| ()),
        h.client.logout().await,
    ];

    for result in results {
        assert_eq!(result.unwrap_err(), ApiError::Unauthorized);
    }
    assert_eq!(h.navigations.borrow().len(), targets.len());
    assert!(h.navigations.borrow().iter().all(|p| p == "/login"));
    assert!(!h.session.is_authenticated());
}

// =========================================================
// 路线查询
// =========================================================

#[tokio::test]
async fn test_list_routes_builds_query_string() {
    let h = harness();
    let target = "/routes?status=PLANNED&search=Main%20St";
    h.http
        .mock_response(HttpMethod::Get, &url(target), 200, page_json(1..=1, 1, None, None));

    let page = h
        .client
        .list_routes(Some(RouteStatus::Planned), None, Some("Main St".to_string()))
        .await
        .unwrap();
    assert_eq!(page.results.len(), 1);
    assert_eq!(h.http.count(HttpMethod::Get, &url(target)), 1);
}

#[tokio::test]
async fn test_last_page_has_partial_results_and_no_next() {
    let h = harness();
    h.http.mock_response(
        HttpMethod::Get,
        &url("/routes?page=3"),
        200,
        page_json(21..=25, 25, None, Some("http://api.test/api/routes?page=2")),
    );

    let page = h.client.list_routes(None, Some(3), None).await.unwrap();
    assert_eq!(page.count, 25);
    assert_eq!(page.results.len(), 5);
    assert!(!page.has_next());
    assert!(page.has_previous());

    let pager = crate::display::Pager::new(3, page.count, DEFAULT_PAGE_SIZE);
    assert_eq!(pager.total_pages(), 3);
    assert!(!pager.has_next());
}

#[tokio::test]
async fn test_queries_are_served_from_cache() {
    let h = harness();
    h.http
        .mock_response(HttpMethod::Get, &url("/routes/7"), 200, route_json(7, "PLANNED", 0.0));

    let first = h.client.get_route(7).await.unwrap();
    let second = h.client.get_route(7).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(h.http.count(HttpMethod::Get, &url("/routes/7")), 1);
    assert!(h.client.is_cached(&GetRouteRequest { id: 7 }));
}

#[tokio::test]
async fn test_distinct_params_are_distinct_cache_entries() {
    let h = harness();
    h.http.mock_response(
        HttpMethod::Get,
        &url("/routes?page=1"),
        200,
        page_json(1..=10, 12, Some("n"), None),
    );
    h.http.mock_response(
        HttpMethod::Get,
        &url("/routes?page=2"),
        200,
        page_json(11..=12, 12, None, Some("p")),
    );

    let p1 = h.client.list_routes(None, Some(1), None).await.unwrap();
    let p2 = h.client.list_routes(None, Some(2), None).await.unwrap();
    assert_eq!(p1.results.len(), 10);
    assert_eq!(p2.results.len(), 2);
    h.client.list_routes(None, Some(1), None).await.unwrap();
    assert_eq!(h.http.count(HttpMethod::Get, &url("/routes?page=1")), 1);
}

#[tokio::test]
async fn test_update_route_status_invalidates_route_and_list() {
    let h = harness();
    h.http
        .mock_response(HttpMethod::Get, &url("/routes/7"), 200, route_json(7, "IN_PROGRESS", 50.0));
    h.http
        .mock_response(HttpMethod::Get, &url("/routes"), 200, page_json(7..=7, 1, None, None));
    h.client.get_route(7).await.unwrap();
    h.client.list_routes(None, None, None).await.unwrap();

    h.http.mock_response(
        HttpMethod::Put,
        &url("/routes/7/status"),
        200,
        route_json(7, "COMPLETED", 50.0),
    );
    h.http.mock_response(
        HttpMethod::Get,
        &url("/routes/7"),
        200,
        route_json(7, "COMPLETED", 50.0),
    );

    let updated = h
        .client
        .update_route_status(7, RouteStatus::Completed)
        .await
        .unwrap();
    assert_eq!(updated.status, RouteStatus::Completed);

    let (_, _, _, body) = h.http.last_request().unwrap();
    assert_eq!(body.as_deref(), Some(r#"{"status":"COMPLETED"}"#));

    assert!(!h.client.is_cached(&GetRouteRequest { id: 7 }));
    assert!(!h.client.is_cached(&ListRoutesRequest::default()));

    let refreshed = h.client.get_route(7).await.unwrap();
    assert_eq!(refreshed.status, RouteStatus::Completed);
    assert_eq!(h.http.count(HttpMethod::Get, &url("/routes/7")), 2);
}

#[tokio::test]
async fn test_status_only_echo_still_refreshes_route() {
    let h = harness();
    h.http.mock_response(
        HttpMethod::Get,
        &url("/routes/7"),
        200,
        route_json(7, "PLANNED", 0.0),
    );
    let before = h.client.get_route(7).await.unwrap();
    assert_eq!(before.status, RouteStatus::Planned);

    // 状态更新接口只回显 status 字段
    h.http.mock_response(
        HttpMethod::Put,
        &url("/routes/7/status"),
        200,
        json!({ "status": "COMPLETED" }),
    );
    h.http.mock_response(
        HttpMethod::Get,
        &url("/routes/7"),
        200,
        route_json(7, "COMPLETED", 100.0),
    );

    let echo = h
        .client
        .update_route_status(7, RouteStatus::Completed)
        .await
        .unwrap();
    assert_eq!(
        echo,
        StatusUpdate {
            status: RouteStatus::Completed
        }
    );

    let after = h.client.get_route(7).await.unwrap();
    assert_eq!(after.status, RouteStatus::Completed);
    assert_eq!(h.http.count(HttpMethod::Get, &url("/routes/7")), 2);
}

#[tokio::test]
async fn test_undecodable_success_body_still_invalidates() {
    let h = harness();
    let seen = Rc::new(RefCell::new(0usize));
    let sink = Rc::clone(&seen);
    h.client
        .subscribe(Rc::new(move |_: &[CacheTag]| *sink.borrow_mut() += 1));

    h.http.mock_response(
        HttpMethod::Get,
        &url("/orders/42"),
        200,
        order_json(42, 7, "PENDING"),
    );
    h.client.get_order(42).await.unwrap();

    h.http
        .mock_bytes(HttpMethod::Put, &url("/orders/42/status"), 204, Vec::new());
    let err = h
        .client
        .update_order_status(42, OrderStatus::Delivered)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
    assert!(!h.client.is_cached(&GetOrderRequest { id: 42 }));
    assert_eq!(*seen.borrow(), 1);
}

#[tokio::test]
async fn test_update_order_status_invalidates_orders_and_parent_route() {
    let h = harness();
    h.http
        .mock_response(HttpMethod::Get, &url("/routes/7"), 200, route_json(7, "IN_PROGRESS", 25.0));
    h.http.mock_response(
        HttpMethod::Get,
        &url("/routes/7/orders"),
        200,
        json!([order_json(42, 7, "IN_TRANSIT"), order_json(43, 7, "PENDING")]),
    );
    h.http
        .mock_response(HttpMethod::Get, &url("/orders/42"), 200, order_json(42, 7, "IN_TRANSIT"));
    h.http
        .mock_response(HttpMethod::Get, &url("/orders/43"), 200, order_json(43, 7, "PENDING"));

    h.client.get_route(7).await.unwrap();
    h.client.list_route_orders(7, None).await.unwrap();
    h.client.get_order(42).await.unwrap();
    h.client.get_order(43).await.unwrap();

    h.http.mock_response(
        HttpMethod::Put,
        &url("/orders/42/status"),
        200,
        json!({ "status": "DELIVERED" }),
    );
    let order = h
        .client
        .update_order_status(42, OrderStatus::Delivered)
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Delivered);

    let orders_req = ListRouteOrdersRequest {
        route_id: 7,
        search: None,
    };
    assert!(!h.client.is_cached(&orders_req));
    assert!(!h.client.is_cached(&GetRouteRequest { id: 7 }));
    assert!(!h.client.is_cached(&GetOrderRequest { id: 42 }));
    // 其他订单的详情不受影响
    assert!(h.client.is_cached(&GetOrderRequest { id: 43 }));
}

#[tokio::test]
async fn test_failed_mutation_keeps_cache() {
    let h = harness();
    h.http
        .mock_response(HttpMethod::Get, &url("/routes/7"), 200, route_json(7, "PLANNED", 0.0));
    h.client.get_route(7).await.unwrap();

    h.http.mock_response(
        HttpMethod::Put,
        &url("/routes/7/status"),
        400,
        json!({ "status": ["invalid"] }),
    );
    let err = h
        .client
        .update_route_status(7, RouteStatus::Cancelled)
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Status(400));
    assert!(h.client.is_cached(&GetRouteRequest { id: 7 }));
    assert!(h.navigations.borrow().is_empty());
}

#[tokio::test]
async fn test_invalidation_notifies_subscribers() {
    let h = harness();
    let seen = Rc::new(RefCell::new(Vec::<String>::new()));
    let sink = Rc::clone(&seen);
    h.client.subscribe(Rc::new(move |tags: &[CacheTag]| {
        sink.borrow_mut()
            .extend(tags.iter().map(ToString::to_string));
    }));

    h.http.mock_response(
        HttpMethod::Put,
        &url("/orders/42/status"),
        200,
        order_json(42, 7, "DELIVERED"),
    );
    h.client
        .update_order_status(42, OrderStatus::Delivered)
        .await
        .unwrap();

    assert_eq!(
        *seen.borrow(),
        vec!["Order:42".to_string(), "Order:LIST".to_string(), "Route".to_string()]
    );
}

#[tokio::test]
async fn test_list_route_orders_search() {
    let h = harness();
    h.http.mock_response(
        HttpMethod::Get,
        &url("/routes/7/orders?search=ORD-4"),
        200,
        json!([order_json(42, 7, "PENDING")]),
    );

    let orders = h
        .client
        .list_route_orders(7, Some("ORD-4".to_string()))
        .await
        .unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].route_id, 7);
}

// =========================================================
// 错误分类
// =========================================================

#[tokio::test]
async fn test_server_error_is_surfaced_as_status() {
    let h = harness();
    h.http
        .mock_response(HttpMethod::Get, &url("/routes/1"), 500, json!({}));
    assert_eq!(h.client.get_route(1).await.unwrap_err(), ApiError::Status(500));
    assert!(!h.client.is_cached(&GetRouteRequest { id: 1 }));
}

#[tokio::test]
async fn test_network_failure_is_surfaced() {
    let h = harness();
    h.http.mock_offline(&url("/routes/1"));
    assert!(matches!(
        h.client.get_route(1).await.unwrap_err(),
        ApiError::Network(_)
    ));
    assert!(h.navigations.borrow().is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let h = harness();
    h.http
        .mock_bytes(HttpMethod::Get, &url("/routes/1"), 200, b"<html>".to_vec());
    assert!(matches!(
        h.client.get_route(1).await.unwrap_err(),
        ApiError::Decode(_)
    ));
}

// =========================================================
// CSV 导出
// =========================================================

#[tokio::test]
async fn test_export_returns_raw_bytes_uncached() {
    let h = harness();
    let csv = b"id,name\n1,North Loop\n".to_vec();
    h.http
        .mock_bytes(HttpMethod::Get, &url("/routes/export.csv?q=north"), 200, csv.clone());

    let first = h.client.export_routes_csv(Some("north".to_string())).await.unwrap();
    let second = h.client.export_routes_csv(Some("north".to_string())).await.unwrap();
    assert_eq!(first, csv);
    assert_eq!(second, csv);
    assert_eq!(
        h.http.count(HttpMethod::Get, &url("/routes/export.csv?q=north")),
        2
    );
}
