use actix_web::{get, HttpResponse};
use chrono::Utc;
use crate::models::health::HealthResponse;

#[get("/health")]
pub async fn health_check() -> HttpResponse {
    let response = HealthResponse {
        status: "healthy",
        message: "FG Premium backend is running",
        time: Utc::now(),
    };

    HttpResponse::Ok().json(response)
}

#[get("/")]
pub async fn index() -> HttpResponse {
    greeting()
}

#[get("/home")]
pub async fn home() -> HttpResponse {
    greeting()
}

fn greeting() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "message": "Hello AG!" }))
}
