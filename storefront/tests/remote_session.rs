// storefront/tests/remote_session.rs
// 端到端: Session + FoodieApi + 进程内 axum 远程服务

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use storefront::core::{Mode, Session};
use storefront::shared::models::{DeliveryType, OrderStatus};
use storefront::StorefrontConfig;

#[derive(Default)]
struct Remote {
    /// (item id, quantity)
    cart: Vec<(i64, i64)>,
    orders: Vec<Value>,
}

type Shared = Arc<Mutex<Remote>>;
type Params = Query<HashMap<String, String>>;

fn menu_json() -> Value {
    json!([
        {"id": 1, "name": "Margherita Pizza", "description": "Basil", "price": 16.99,
         "category": "pizza", "image": "a.jpg", "available": true},
        {"id": 2, "name": "BBQ Bacon Burger", "description": "Bacon", "price": 16.99,
         "category": "burger", "image": "b.jpg", "available": true}
    ])
}

fn price(id: i64) -> f64 {
    match id {
        1 | 2 => 16.99,
        _ => 0.0,
    }
}

async fn menu() -> Json<Value> {
    Json(menu_json())
}

async fn cart(State(s): State<Shared>) -> Json<Value> {
    let remote = s.lock().unwrap();
    let items: Vec<Value> = remote
        .cart
        .iter()
        .map(|(id, qty)| {
            json!({"id": id, "name": format!("Item {id}"), "description": "", "price": price(*id),
                   "quantity": qty, "instructions": ""})
        })
        .collect();
    Json(json!({"items": items}))
}

async fn cart_add(State(s): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let id = body["itemId"].as_i64().unwrap_or_default();
    let qty = body["quantity"].as_i64().unwrap_or_default();
    let mut remote = s.lock().unwrap();
    match remote.cart.iter().position(|(i, _)| *i == id) {
        Some(pos) => remote.cart[pos].1 += qty,
        None => remote.cart.push((id, qty)),
    }
    Json(json!({"success": true}))
}

async fn cart_update(State(s): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let id = body["itemId"].as_i64().unwrap_or_default();
    let qty = body["quantity"].as_i64().unwrap_or_default();
    let mut remote = s.lock().unwrap();
    match remote.cart.iter_mut().find(|(i, _)| *i == id) {
        Some((_, q)) => {
            *q = qty;
            Json(json!({"success": true}))
        }
        None => Json(json!({"success": false, "message": "Item not found in cart"})),
    }
}

async fn cart_remove(State(s): State<Shared>, Query(q): Params) -> Json<Value> {
    let id: i64 = q.get("itemId").and_then(|v| v.parse().ok()).unwrap_or_default();
    s.lock().unwrap().cart.retain(|(i, _)| *i != id);
    Json(json!({"success": true}))
}

async fn orders(State(s): State<Shared>) -> Json<Value> {
    Json(Value::Array(s.lock().unwrap().orders.clone()))
}

async fn order_create(State(s): State<Shared>, Query(q): Params, Json(body): Json<Value>) -> Json<Value> {
    let mut remote = s.lock().unwrap();
    let subtotal: f64 = remote.cart.iter().map(|(id, qty)| price(*id) * *qty as f64).sum();
    let fee = if body["deliveryType"] == "express" { 6.99 } else { 3.99 };
    let tax = (subtotal * 0.08 * 100.0).round() / 100.0;
    let total = ((subtotal + fee + tax) * 100.0).round() / 100.0;
    let order_id = format!("ORD-{}", remote.orders.len() + 1);
    remote.orders.push(json!({
        "orderId": order_id, "customerId": q.get("customerId"), "status": "PENDING",
        "totalAmount": total, "orderTime": "2024-05-01T12:30:00", "deliveryType": body["deliveryType"]
    }));
    remote.cart.clear();
    Json(json!({"success": true, "orderId": order_id, "total": total}))
}

async fn spawn_remote() -> (String, Shared) {
    let state = Shared::default();
    let app = Router::new()
        .route("/api/menu", get(menu))
        .route("/api/cart", get(cart).post(cart_add).put(cart_update).delete(cart_remove))
        .route("/api/orders", get(orders).post(order_create))
        .with_state(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/api"), state)
}

#[tokio::test]
async fn test_remote_session_round_trip() {
    let (base_url, remote) = spawn_remote().await;
    let dir = tempfile::tempdir().unwrap();
    let config = StorefrontConfig {
        base_url,
        data_dir: dir.path().to_path_buf(),
        shutdown_timeout_ms: 1_000,
        ..Default::default()
    };
    let gateway = config.client_config().build_gateway().unwrap();
    let session = Session::start(config, Arc::new(gateway)).await.unwrap();

    assert_eq!(session.mode(), Mode::Remote);
    assert_eq!(session.catalog().items().await.len(), 2);

    session.cart().add_item(1, 2, None).await.unwrap();
    session.cart().add_item(2, 1, None).await.unwrap();
    session.cart().update_quantity(1, -1).await.unwrap();
    let cart = session.cart().snapshot().await;
    assert_eq!(cart.get(1).unwrap().quantity, 1);
    assert_eq!(cart.get(2).unwrap().quantity, 1);
    assert_eq!(remote.lock().unwrap().cart, vec![(1, 1), (2, 1)]);

    let order = session
        .orders()
        .create_order(DeliveryType::Standard, "1 Main St", "555-0100")
        .await
        .unwrap();
    assert_eq!(order.id, "ORD-1");
    // 33.98 + 3.99 + 2.72
    assert_eq!(order.total, Decimal::new(4069, 2));
    assert!(order.charges.is_some());
    assert!(session.cart().snapshot().await.is_empty());
    assert!(remote.lock().unwrap().cart.is_empty());

    assert!(session.orders().sync_tick().await.unwrap());
    let orders = session.orders().snapshot().await;
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status, OrderStatus::Preparing);
    assert_eq!(orders[0].total, Decimal::new(4069, 2));

    session.shutdown().await;
}

#[tokio::test]
async fn test_unreachable_remote_starts_local() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dir = tempfile::tempdir().unwrap();
    let config = StorefrontConfig {
        base_url: format!("http://{addr}/api"),
        data_dir: dir.path().to_path_buf(),
        request_timeout_secs: 2,
        shutdown_timeout_ms: 1_000,
        ..Default::default()
    };
    let gateway = config.client_config().build_gateway().unwrap();
    let session = Session::start(config, Arc::new(gateway)).await.unwrap();

    assert_eq!(session.mode(), Mode::Local);
    assert_eq!(session.catalog().items().await.len(), 12);
    session.cart().add_item(12, 1, None).await.unwrap();
    assert_eq!(session.cart().item_count().await, 1);
    session.shutdown().await;
}
