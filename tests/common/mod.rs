#![allow(dead_code)]

//! Backend simulado con axum para los tests de integración

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};

use rental_storefront::config::ClientConfig;
use rental_storefront::models::{Session, UserProfile};

pub const USER_TOKEN: &str = "user-token";
pub const ADMIN_TOKEN: &str = "admin-token";
pub const PASSWORD: &str = "secret123";

#[derive(Default)]
pub struct MockData {
    pub vehicles: Vec<Value>,
    pub booked_dates: Vec<Value>,
    /// Respuesta de booked-dates tras un 409
    pub booked_dates_after_conflict: Option<Vec<Value>>,
    pub booked_dates_status: Option<u16>,
    pub bookings: Vec<Value>,
    /// Llamadas a "mis reservas" que devuelven lista vacía antes de `bookings`
    pub bookings_hidden_for: usize,
    pub create_session_status: Option<u16>,
    pub create_session_body: Option<Value>,
    pub pending_reviews: Vec<Value>,
    pub reviews: Vec<Value>,

    pub my_bookings_calls: usize,
    pub booked_dates_calls: usize,
    pub create_session_calls: usize,
    pub admin_calls: usize,
    pub last_query: HashMap<String, String>,
    pub last_authorization: Option<String>,
    pub last_session_request: Option<Value>,
    pub cancelled: Vec<String>,
    pub moderated: Vec<(String, bool)>,
    pub submitted_reviews: Vec<Value>,
}

#[derive(Clone, Default)]
pub struct MockState(Arc<Mutex<MockData>>);

impl MockState {
    pub fn data(&self) -> MutexGuard<'_, MockData> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

pub struct MockBackend {
    pub base_url: String,
    pub state: MockState,
}

impl MockBackend {
    pub async fn start() -> Self {
        Self::start_with(MockData::default()).await
    }

    pub async fn start_with(data: MockData) -> Self {
        let state = MockState(Arc::new(Mutex::new(data)));
        let app = router(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            api_base_url: self.base_url.clone(),
            http_timeout: Duration::from_secs(5),
            reconcile_interval: Duration::from_millis(10),
            reconcile_max_attempts: 3,
            ..ClientConfig::default()
        }
    }

    pub fn data(&self) -> MutexGuard<'_, MockData> {
        self.state.data()
    }
}

pub fn user_session() -> Session {
    Session::new(USER_TOKEN, profile("Asha", false))
}

pub fn admin_session() -> Session {
    Session::new(ADMIN_TOKEN, profile("Admin", true))
}

pub fn profile(name: &str, is_admin: bool) -> UserProfile {
    UserProfile {
        id: Some(format!("u-{}", name.to_lowercase())),
        name: name.to_string(),
        email: Some(format!("{}@example.com", name.to_lowercase())),
        is_admin,
    }
}

pub fn vehicle_json(id: &str, price: &str) -> Value {
    json!({
        "_id": id,
        "make": "Toyota",
        "model": "Corolla",
        "year": 2022,
        "type": "Sedan",
        "location": "Pune",
        "pricePerDay": price,
        "available": true,
        "bookedDates": []
    })
}

pub fn range_json(start: &str, end: &str) -> Value {
    json!({ "startDate": start, "endDate": end })
}

pub fn booking_json(id: &str, session_id: &str, status: &str) -> Value {
    json!({
        "_id": id,
        "vehicle": { "_id": "v1", "make": "Toyota", "model": "Corolla", "year": 2022 },
        "user": "u-asha",
        "startDate": "2030-06-01T00:00:00Z",
        "endDate": "2030-06-03T00:00:00Z",
        "status": status,
        "payment": {
            "_id": format!("pay-{}", id),
            "amount": 20000,
            "status": "paid",
            "sessionId": session_id
        }
    })
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

fn require_user(state: &MockState, headers: &HeaderMap) -> Result<String, Response> {
    let token = bearer(headers);
    state.data().last_authorization = token.clone();
    match token {
        Some(t) if t == USER_TOKEN || t == ADMIN_TOKEN => Ok(t),
        _ => Err(message(StatusCode::UNAUTHORIZED, "Not authorized, token failed")),
    }
}

fn require_admin(state: &MockState, headers: &HeaderMap) -> Result<(), Response> {
    state.data().admin_calls += 1;
    match require_user(state, headers)?.as_str() {
        ADMIN_TOKEN => Ok(()),
        _ => Err(message(StatusCode::FORBIDDEN, "Not authorized as an admin")),
    }
}

fn router(state: MockState) -> Router {
    Router::new()
        .route("/api/users/login", post(login))
        .route("/api/users/register", post(register))
        .route("/api/users/me", get(me))
        .route("/api/vehicles", get(list_vehicles))
        .route("/api/vehicles/:id", get(get_vehicle))
        .route("/api/bookings/vehicle/:id/booked-dates", get(booked_dates))
        .route("/api/bookings/my", get(my_bookings))
        .route("/api/bookings/:id/cancel", put(cancel_booking))
        .route("/api/payments/create-session", post(create_session))
        .route("/api/payments/invoice/:id", get(invoice))
        .route("/api/reviews/vehicle/:id", get(vehicle_reviews))
        .route("/api/reviews/pending", get(pending_reviews))
        .route("/api/reviews/:id", post(submit_review))
        .route("/api/reviews/:id/moderate", put(moderate_review))
        .route("/api/admin/dashboard", get(dashboard))
        .route("/api/admin/vehicles", get(admin_vehicles))
        .route("/api/admin/bookings", get(admin_bookings))
        .route("/api/admin/users", get(admin_users))
        .with_state(state)
}

async fn login(Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    if body["password"] != PASSWORD {
        return message(StatusCode::UNAUTHORIZED, "Invalid email or password");
    }
    let (token, user) = if email.starts_with("admin") {
        (ADMIN_TOKEN, profile("Admin", true))
    } else {
        (USER_TOKEN, profile("Asha", false))
    };
    Json(json!({ "token": token, "user": user })).into_response()
}

async fn register(Json(body): Json<Value>) -> Response {
    if body["email"] == "taken@example.com" {
        return message(StatusCode::BAD_REQUEST, "User already exists");
    }
    (
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully" })),
    )
        .into_response()
}

async fn me(State(state): State<MockState>, headers: HeaderMap) -> Response {
    match require_user(&state, &headers) {
        Ok(token) if token == ADMIN_TOKEN => Json(profile("Admin", true)).into_response(),
        Ok(_) => Json(profile("Asha", false)).into_response(),
        Err(response) => response,
    }
}

async fn list_vehicles(
    State(state): State<MockState>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut data = state.data();
    data.last_query = query;
    Json(data.vehicles.clone()).into_response()
}

async fn get_vehicle(State(state): State<MockState>, Path(id): Path<String>) -> Response {
    let data = state.data();
    match data.vehicles.iter().find(|v| v["_id"] == id.as_str()) {
        Some(vehicle) => Json(vehicle.clone()).into_response(),
        None => message(StatusCode::NOT_FOUND, "Vehicle not found"),
    }
}

async fn booked_dates(State(state): State<MockState>, Path(_id): Path<String>) -> Response {
    let mut data = state.data();
    data.booked_dates_calls += 1;
    if let Some(status) = data.booked_dates_status {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return message(status, "Server error");
    }
    let ranges = match (&data.booked_dates_after_conflict, data.create_session_calls) {
        (Some(after), calls) if calls > 0 => after.clone(),
        _ => data.booked_dates.clone(),
    };
    Json(ranges).into_response()
}

async fn my_bookings(State(state): State<MockState>, headers: HeaderMap) -> Response {
    if let Err(response) = require_user(&state, &headers) {
        return response;
    }
    let mut data = state.data();
    data.my_bookings_calls += 1;
    if data.my_bookings_calls <= data.bookings_hidden_for {
        return Json(Vec::<Value>::new()).into_response();
    }
    Json(data.bookings.clone()).into_response()
}

async fn cancel_booking(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(response) = require_user(&state, &headers) {
        return response;
    }
    state.data().cancelled.push(id);
    message(StatusCode::OK, "Booking cancelled")
}

async fn create_session(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = require_user(&state, &headers) {
        return response;
    }
    let mut data = state.data();
    data.create_session_calls += 1;
    data.last_session_request = Some(body);

    let status = data.create_session_status.unwrap_or(200);
    let body = data.create_session_body.clone().unwrap_or_else(|| {
        json!({
            "url": format!("https://checkout.example/pay/cs_test_{}", data.create_session_calls),
            "sessionId": format!("cs_test_{}", data.create_session_calls)
        })
    });
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(body)).into_response()
}

async fn invoice(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(response) = require_user(&state, &headers) {
        return response;
    }
    if id == "missing" {
        return message(StatusCode::NOT_FOUND, "Payment not found");
    }
    (
        [(header::CONTENT_TYPE, "application/pdf")],
        Bytes::from(format!("%PDF-1.4 invoice {}", id)),
    )
        .into_response()
}

async fn vehicle_reviews(State(state): State<MockState>, Path(_id): Path<String>) -> Response {
    Json(state.data().reviews.clone()).into_response()
}

async fn pending_reviews(State(state): State<MockState>, headers: HeaderMap) -> Response {
    if let Err(response) = require_admin(&state, &headers) {
        return response;
    }
    Json(state.data().pending_reviews.clone()).into_response()
}

async fn submit_review(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = require_user(&state, &headers) {
        return response;
    }
    state
        .data()
        .submitted_reviews
        .push(json!({ "vehicle": id, "body": body }));
    (
        StatusCode::CREATED,
        Json(json!({ "message": "Review submitted" })),
    )
        .into_response()
}

async fn moderate_review(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = require_admin(&state, &headers) {
        return response;
    }
    let approved = body["approved"].as_bool().unwrap_or(false);
    state.data().moderated.push((id, approved));
    message(StatusCode::OK, "Review updated")
}

async fn dashboard(State(state): State<MockState>, headers: HeaderMap) -> Response {
    if let Err(response) = require_admin(&state, &headers) {
        return response;
    }
    Json(json!({ "totalUsers": 12, "totalBookings": 34, "totalRevenue": 5600.5 })).into_response()
}

async fn admin_vehicles(State(state): State<MockState>, headers: HeaderMap) -> Response {
    if let Err(response) = require_admin(&state, &headers) {
        return response;
    }
    Json(state.data().vehicles.clone()).into_response()
}

async fn admin_bookings(State(state): State<MockState>, headers: HeaderMap) -> Response {
    if let Err(response) = require_admin(&state, &headers) {
        return response;
    }
    Json(state.data().bookings.clone()).into_response()
}

async fn admin_users(State(state): State<MockState>, headers: HeaderMap) -> Response {
    if let Err(response) = require_admin(&state, &headers) {
        return response;
    }
    Json(vec![profile("Asha", false), profile("Admin", true)]).into_response()
}
