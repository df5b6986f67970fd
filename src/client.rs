//! Cliente HTTP para el backend de reservas
//!
//! `RentalApi` es la frontera con el backend remoto; `HttpRentalApi` la
//! implementa con reqwest. Las peticiones autenticadas adjuntan
//! `Authorization: Bearer <token>`.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::config::ClientConfig;
use crate::dto::{
    ApiMessage, AuthResponse, CreateSessionRequest, CreateSessionResponse, LoginRequest,
    ModerateReviewRequest, NewReviewRequest, RegisterRequest, VehicleFilters,
};
use crate::models::{BookedRange, Booking, DashboardStats, Review, UserProfile, Vehicle};
use crate::utils::errors::{ClientError, ClientResult};

/// Operaciones del backend consumidas por el cliente
#[async_trait]
pub trait RentalApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> ClientResult<AuthResponse>;
    async fn register(&self, request: &RegisterRequest) -> ClientResult<AuthResponse>;
    async fn current_user(&self, token: &str) -> ClientResult<UserProfile>;

    async fn list_vehicles(&self, filters: &VehicleFilters) -> ClientResult<Vec<Vehicle>>;
    async fn get_vehicle(&self, vehicle_id: &str) -> ClientResult<Vehicle>;

    async fn booked_dates(&self, vehicle_id: &str) -> ClientResult<Vec<BookedRange>>;
    async fn my_bookings(&self, token: &str) -> ClientResult<Vec<Booking>>;
    async fn cancel_booking(&self, token: &str, booking_id: &str) -> ClientResult<()>;

    /// 409 se traduce a `ClientError::Conflict` con el mensaje del backend
    async fn create_payment_session(
        &self,
        token: &str,
        request: &CreateSessionRequest,
    ) -> ClientResult<CreateSessionResponse>;
    async fn download_invoice(&self, token: &str, payment_id: &str) -> ClientResult<Vec<u8>>;

    async fn vehicle_reviews(&self, vehicle_id: &str) -> ClientResult<Vec<Review>>;
    async fn submit_review(
        &self,
        token: &str,
        vehicle_id: &str,
        request: &NewReviewRequest,
    ) -> ClientResult<()>;

    async fn admin_dashboard(&self, token: &str) -> ClientResult<DashboardStats>;
    async fn admin_vehicles(&self, token: &str) -> ClientResult<Vec<Vehicle>>;
    async fn admin_bookings(&self, token: &str) -> ClientResult<Vec<Booking>>;
    async fn admin_users(&self, token: &str) -> ClientResult<Vec<UserProfile>>;
    async fn pending_reviews(&self, token: &str) -> ClientResult<Vec<Review>>;
    async fn moderate_review(&self, token: &str, review_id: &str, approved: bool)
        -> ClientResult<()>;
}

/// Implementación reqwest de `RentalApi`
#[derive(Clone)]
pub struct HttpRentalApi {
    client: Client,
    base_url: String,
}

impl HttpRentalApi {
    /// Crear nuevo cliente HTTP con la URL base configurada
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .user_agent(concat!("RentalStorefront/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::TransientNetwork(format!("HTTP client init: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    fn authorized_get(&self, path: &str, token: &str) -> RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.text().await?;
        debug!("📡 {} -> {}", url, status);

        if !status.is_success() {
            return Err(error_from_body(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            error!("❌ Respuesta inesperada de {}: {}", url, e);
            ClientError::Decode(format!("{}: {}", url, e))
        })
    }

    async fn send_empty(&self, request: RequestBuilder) -> ClientResult<()> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(error_from_body(status, &body))
    }
}

/// Convertir una respuesta no exitosa en el error tipado correspondiente
fn error_from_body(status: StatusCode, body: &str) -> ClientError {
    let message = serde_json::from_str::<ApiMessage>(body)
        .ok()
        .and_then(|m| m.message)
        .or_else(|| {
            let text = body.trim();
            (!text.is_empty() && text.len() <= 200 && !text.starts_with('<'))
                .then(|| text.to_string())
        });
    ClientError::from_status(status, message)
}

fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[async_trait]
impl RentalApi for HttpRentalApi {
    async fn login(&self, request: &LoginRequest) -> ClientResult<AuthResponse> {
        let rb = self.client.post(self.url("/api/users/login")).json(request);
        self.send_json(rb).await
    }

    async fn register(&self, request: &RegisterRequest) -> ClientResult<AuthResponse> {
        let rb = self.client.post(self.url("/api/users/register")).json(request);
        self.send_json(rb).await
    }

    async fn current_user(&self, token: &str) -> ClientResult<UserProfile> {
        self.send_json(self.authorized_get("/api/users/me", token)).await
    }

    async fn list_vehicles(&self, filters: &VehicleFilters) -> ClientResult<Vec<Vehicle>> {
        let rb = self.get("/api/vehicles").query(&filters.to_query());
        self.send_json(rb).await
    }

    async fn get_vehicle(&self, vehicle_id: &str) -> ClientResult<Vehicle> {
        let path = format!("/api/vehicles/{}", segment(vehicle_id));
        self.send_json(self.get(&path)).await
    }

    async fn booked_dates(&self, vehicle_id: &str) -> ClientResult<Vec<BookedRange>> {
        let path = format!("/api/bookings/vehicle/{}/booked-dates", segment(vehicle_id));
        self.send_json(self.get(&path)).await
    }

    async fn my_bookings(&self, token: &str) -> ClientResult<Vec<Booking>> {
        self.send_json(self.authorized_get("/api/bookings/my", token))
            .await
    }

    async fn cancel_booking(&self, token: &str, booking_id: &str) -> ClientResult<()> {
        let path = format!("/api/bookings/{}/cancel", segment(booking_id));
        let rb = self.client.put(self.url(&path)).bearer_auth(token);
        self.send_empty(rb).await
    }

    async fn create_payment_session(
        &self,
        token: &str,
        request: &CreateSessionRequest,
    ) -> ClientResult<CreateSessionResponse> {
        let rb = self
            .client
            .post(self.url("/api/payments/create-session"))
            .bearer_auth(token)
            .json(request);
        self.send_json(rb).await
    }

    async fn download_invoice(&self, token: &str, payment_id: &str) -> ClientResult<Vec<u8>> {
        let path = format!("/api/payments/invoice/{}", segment(payment_id));
        let response = self.authorized_get(&path, token).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_body(status, &body));
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn vehicle_reviews(&self, vehicle_id: &str) -> ClientResult<Vec<Review>> {
        let path = format!("/api/reviews/vehicle/{}", segment(vehicle_id));
        self.send_json(self.get(&path)).await
    }

    async fn submit_review(
        &self,
        token: &str,
        vehicle_id: &str,
        request: &NewReviewRequest,
    ) -> ClientResult<()> {
        let path = format!("/api/reviews/{}", segment(vehicle_id));
        let rb = self.client.post(self.url(&path)).bearer_auth(token).json(request);
        self.send_empty(rb).await
    }

    async fn admin_dashboard(&self, token: &str) -> ClientResult<DashboardStats> {
        self.send_json(self.authorized_get("/api/admin/dashboard", token))
            .await
    }

    async fn admin_vehicles(&self, token: &str) -> ClientResult<Vec<Vehicle>> {
        self.send_json(self.authorized_get("/api/admin/vehicles", token))
            .await
    }

    async fn admin_bookings(&self, token: &str) -> ClientResult<Vec<Booking>> {
        self.send_json(self.authorized_get("/api/admin/bookings", token))
            .await
    }

    async fn admin_users(&self, token: &str) -> ClientResult<Vec<UserProfile>> {
        self.send_json(self.authorized_get("/api/admin/users", token))
            .await
    }

    async fn pending_reviews(&self, token: &str) -> ClientResult<Vec<Review>> {
        self.send_json(self.authorized_get("/api/reviews/pending", token))
            .await
    }

    async fn moderate_review(
        &self,
        token: &str,
        review_id: &str,
        approved: bool,
    ) -> ClientResult<()> {
        let path = format!("/api/reviews/{}/moderate", segment(review_id));
        let rb = self
            .client
            .put(self.url(&path))
            .bearer_auth(token)
            .json(&ModerateReviewRequest { approved });
        self.send_empty(rb).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_message_is_used() {
        let err = error_from_body(
            StatusCode::CONFLICT,
            r#"{"message":"Vehicle already booked for these dates"}"#,
        );
        assert!(matches!(err, ClientError::Conflict(m) if m == "Vehicle already booked for these dates"));
    }

    #[test]
    fn test_html_error_body_is_ignored() {
        let err = error_from_body(StatusCode::BAD_REQUEST, "<html>oops</html>");
        assert!(matches!(err, ClientError::Api { status: 400, message } if message.contains("400")));
    }

    #[test]
    fn test_path_segments_are_encoded() {
        assert_eq!(segment("a/b c"), "a%2Fb%20c");
    }
}
