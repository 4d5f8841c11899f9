//! End-to-end HTTP tests: the real router over mocked repositories.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;

use lemon_api::{build_router, throttle::Throttle, AppState};
use lemon_core::access::Role;
use lemon_core::domain::{
    Category, MenuItem, MenuItemRef, Order, OrderItem, OrderStatus, User, UserRef,
};
use lemon_core::error::DomainError;
use lemon_core::query::PageLimits;
use lemon_core::repositories::{
    MockCartRepository, MockCategoryRepository, MockMenuItemRepository, MockOrderRepository,
    MockRoleDirectory, MockUserRepository, Repositories,
};
use lemon_core::services::Services;
use lemon_security::{JwtService, PasswordService};
use lemon_shared::config::ThrottleSettings;

const SECRET: &str = "http-test-secret";
const MANAGER: i32 = 1;
const CUSTOMER: i32 = 5;
const OTHER_CUSTOMER: i32 = 6;
const CREW: i32 = 8;

fn username(id: i32) -> String {
    match id {
        MANAGER => "maria".to_string(),
        CUSTOMER => "tilly".to_string(),
        OTHER_CUSTOMER => "adrian".to_string(),
        CREW => "mario".to_string(),
        other => format!("user{}", other),
    }
}

fn user(id: i32) -> User {
    User {
        id,
        username: username(id),
        email: String::new(),
        password_hash: String::new(),
        is_superuser: false,
        date_joined: Utc::now(),
    }
}

fn roles_of(id: i32) -> BTreeSet<Role> {
    match id {
        MANAGER => BTreeSet::from([Role::Manager]),
        CREW => BTreeSet::from([Role::DeliveryCrew]),
        _ => BTreeSet::new(),
    }
}

fn token(id: i32) -> String {
    JwtService::new(SECRET, 3600)
        .generate_access_token(id, &username(id))
        .unwrap()
}

fn menu_item(id: i32) -> MenuItem {
    MenuItem {
        id,
        title: "Greek Salad".to_string(),
        price: Decimal::new(1250, 2),
        featured: true,
        category: Category {
            id: 1,
            slug: "mains".to_string(),
            title: "Mains".to_string(),
        },
    }
}

fn order(id: i32, owner: i32) -> Order {
    Order {
        id,
        user: UserRef {
            id: owner,
            username: username(owner),
        },
        delivery_crew: None,
        status: OrderStatus::Pending,
        total: Decimal::new(1300, 2),
        date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        order_items: vec![OrderItem {
            id: 1,
            menuitem: MenuItemRef {
                id: 3,
                title: "Lemon Cake".to_string(),
                price: Decimal::new(500, 2),
            },
            quantity: 2,
            unit_price: Decimal::new(500, 2),
            price: Decimal::new(1000, 2),
        }],
    }
}

struct Mocks {
    users: MockUserRepository,
    roles: MockRoleDirectory,
    categories: MockCategoryRepository,
    menu_items: MockMenuItemRepository,
    carts: MockCartRepository,
    orders: MockOrderRepository,
    per_minute: u32,
}

impl Mocks {
    /// Users 1..=9 exist; role lookups follow `roles_of`.
    fn new() -> Self {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(|id| Ok((1..=9).contains(&id).then(|| user(id))));
        let mut roles = MockRoleDirectory::new();
        roles.expect_roles_of().returning(|id| Ok(roles_of(id)));
        roles
            .expect_has_role()
            .returning(|id, role| Ok(roles_of(id).contains(&role)));

        Self {
            users,
            roles,
            categories: MockCategoryRepository::new(),
            menu_items: MockMenuItemRepository::new(),
            carts: MockCartRepository::new(),
            orders: MockOrderRepository::new(),
            per_minute: 1000,
        }
    }

    fn into_app(self) -> Router {
        let repos = Repositories {
            users: Arc::new(self.users),
            roles: Arc::new(self.roles),
            categories: Arc::new(self.categories),
            menu_items: Arc::new(self.menu_items),
            carts: Arc::new(self.carts),
            orders: Arc::new(self.orders),
        };
        let services = Services::new(repos, JwtService::new(SECRET, 3600), PageLimits::default());
        let throttle = Throttle::new(&ThrottleSettings {
            manager_per_minute: self.per_minute,
            delivery_per_minute: self.per_minute,
            customer_per_minute: self.per_minute,
        });
        build_router(AppState::new(services, throttle), Duration::from_secs(5))
    }
}

async fn send(app: Router, method: Method, uri: &str, caller: Option<i32>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(id) = caller {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token(id)));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

#[tokio::test]
async fn test_health_is_public() {
    let (status, body) = send(Mocks::new().into_app(), Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let (status, body) = send(Mocks::new().into_app(), Method::GET, "/menu-items", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");

    let mut builder = Request::builder().uri("/categories");
    builder = builder.header(header::AUTHORIZATION, "Bearer not-a-jwt");
    let response = Mocks::new()
        .into_app()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_menu_listing_renders_tax_and_rejects_bad_ordering() {
    let mut mocks = Mocks::new();
    mocks
        .menu_items
        .expect_list()
        .withf(|query| query.page.per_page == 2 && query.search.as_deref() == Some("salad"))
        .returning(|_| Ok(vec![menu_item(1)]));
    let app = mocks.into_app();

    let (status, body) = send(
        app.clone(),
        Method::GET,
        "/menu-items?search=salad&perpage=2",
        Some(CUSTOMER),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["price"], "12.50");
    assert_eq!(body[0]["price_after_tax"], "14.00");
    assert_eq!(body[0]["category"]["title"], "Mains");

    let (status, body) = send(app, Method::GET, "/menu-items?ordering=password", Some(CUSTOMER), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid ordering field: password");
}

#[tokio::test]
async fn test_malformed_path_and_query_answer_json() {
    let app = Mocks::new().into_app();

    let (status, body) = send(app.clone(), Method::GET, "/orders/abc", Some(CUSTOMER), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NotFound");
    assert!(body["message"].is_string());

    let (status, body) = send(
        app.clone(),
        Method::DELETE,
        "/groups/manager/users/abc",
        Some(MANAGER),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NotFound");

    let (status, body) = send(app, Method::GET, "/menu-items?page=1&page=2", Some(CUSTOMER), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadRequest");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_customer_cannot_create_menu_item() {
    let (status, body) = send(
        Mocks::new().into_app(),
        Method::POST,
        "/menu-items",
        Some(CUSTOMER),
        Some(json!({"title": "Soup", "price": "6.00", "category_id": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "You are not allowed to perform this action");
}

#[tokio::test]
async fn test_manager_price_validation() {
    let (status, body) = send(
        Mocks::new().into_app(),
        Method::POST,
        "/menu-items",
        Some(MANAGER),
        Some(json!({"title": "Water", "price": "1.50", "category_id": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ValidationError");
    assert!(body["fields"]["price"].is_array());
}

#[tokio::test]
async fn test_place_order_with_empty_cart() {
    let mut mocks = Mocks::new();
    mocks
        .orders
        .expect_place_from_cart()
        .returning(|_, _| Err(DomainError::CartEmpty));

    let (status, body) = send(mocks.into_app(), Method::POST, "/orders", Some(CUSTOMER), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Cart is empty");
}

#[tokio::test]
async fn test_place_order_returns_created_order() {
    let mut mocks = Mocks::new();
    mocks
        .orders
        .expect_place_from_cart()
        .withf(|user_id, _| *user_id == CUSTOMER)
        .returning(|user_id, _| Ok(order(10, user_id)));

    let (status, body) = send(mocks.into_app(), Method::POST, "/orders", Some(CUSTOMER), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["total"], "13.00");
    assert_eq!(body["status"], "Pending");
    assert_eq!(body["order_items"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_order_visibility() {
    let mut mocks = Mocks::new();
    mocks
        .orders
        .expect_find_by_id()
        .returning(|id| Ok(Some(order(id, CUSTOMER))));
    let app = mocks.into_app();

    let (status, _) = send(app.clone(), Method::GET, "/orders/10", Some(CUSTOMER), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(app.clone(), Method::GET, "/orders/10", Some(OTHER_CUSTOMER), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "You are not allowed to perform this action");

    let (status, body) = send(app, Method::GET, "/orders/10", Some(MANAGER), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "tilly");
}

#[tokio::test]
async fn test_assigning_customer_as_crew_fails() {
    let mut mocks = Mocks::new();
    mocks
        .orders
        .expect_find_by_id()
        .returning(|id| Ok(Some(order(id, CUSTOMER))));
    mocks.orders.expect_update().never();

    let (status, body) = send(
        mocks.into_app(),
        Method::PUT,
        "/orders/10",
        Some(MANAGER),
        Some(json!({"crew_id": OTHER_CUSTOMER})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["crew_id"][0], "User is not in Delivery Crew group");
}

#[tokio::test]
async fn test_crew_marks_order_delivered() {
    let mut mocks = Mocks::new();
    mocks
        .orders
        .expect_find_by_id()
        .returning(|id| Ok(Some(order(id, CUSTOMER))));
    mocks
        .orders
        .expect_update()
        .withf(|_, changes| changes.status == Some(OrderStatus::Delivered))
        .returning(|id, _| {
            let mut updated = order(id, CUSTOMER);
            updated.status = OrderStatus::Delivered;
            Ok(Some(updated))
        });

    let (status, body) = send(
        mocks.into_app(),
        Method::PATCH,
        "/orders/10",
        Some(CREW),
        Some(json!({"status": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Status changed successfully");
}

#[tokio::test]
async fn test_group_assignment_requires_username() {
    let app = Mocks::new().into_app();

    let (status, body) = send(
        app.clone(),
        Method::POST,
        "/groups/manager/users",
        Some(MANAGER),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["username"][0], "Username is required");

    let (status, _) = send(app, Method::GET, "/groups/chefs/users", Some(MANAGER), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_group_assignment_by_manager() {
    let mut mocks = Mocks::new();
    mocks
        .users
        .expect_find_by_username()
        .returning(|_| Ok(Some(user(CREW))));
    mocks
        .roles
        .expect_grant()
        .withf(|id, role| *id == CREW && *role == Role::DeliveryCrew)
        .returning(|_, _| Ok(()));

    let (status, body) = send(
        mocks.into_app(),
        Method::POST,
        "/groups/delivery-crew/users",
        Some(MANAGER),
        Some(json!({"username": "mario"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User added to Delivery Crew group");
}

#[tokio::test]
async fn test_cart_add_and_duplicate() {
    let mut mocks = Mocks::new();
    mocks
        .menu_items
        .expect_find_by_id()
        .returning(|id| Ok(Some(menu_item(id))));
    mocks.carts.expect_add().returning(|_| {
        Err(DomainError::Duplicate(
            "The fields user, menuitem must make a unique set.".to_string(),
        ))
    });

    let (status, body) = send(
        mocks.into_app(),
        Method::POST,
        "/cart/menu-items",
        Some(CUSTOMER),
        Some(json!({"menuitem_id": 1, "quantity": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "The fields user, menuitem must make a unique set.");
}

#[tokio::test]
async fn test_login_issues_usable_token() {
    let mut mocks = Mocks::new();
    mocks.users.expect_find_by_username().returning(|name| {
        let mut stored = user(CUSTOMER);
        stored.username = name.to_string();
        stored.password_hash = PasswordService::hash("lemon-pass-1").unwrap();
        Ok(Some(stored))
    });
    let app = mocks.into_app();

    let (status, body) = send(
        app.clone(),
        Method::POST,
        "/auth/token/login",
        None,
        Some(json!({"username": "tilly", "password": "lemon-pass-1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let auth_token = body["auth_token"].as_str().unwrap().to_string();

    let request = Request::builder()
        .uri("/auth/users/me")
        .header(header::AUTHORIZATION, format!("Token {}", auth_token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let me: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(me["id"], CUSTOMER);
    assert_eq!(me["roles"], json!([]));
}

#[tokio::test]
async fn test_throttled_after_quota() {
    let mut mocks = Mocks::new();
    mocks.per_minute = 2;
    mocks.carts.expect_list_for_user().returning(|_| Ok(vec![]));
    let app = mocks.into_app();

    for _ in 0..2 {
        let (status, _) = send(app.clone(), Method::GET, "/cart/menu-items", Some(CUSTOMER), None).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, body) = send(app, Method::GET, "/cart/menu-items", Some(CUSTOMER), None).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"], "TooManyRequests");
}
