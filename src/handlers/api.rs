use axum::Json;
use serde_json::{Value, json};

pub const HEALTH_MESSAGE: &str = "Tooth call AI Voice Assistant is running!";

pub async fn health_check() -> Json<Value> {
    Json(json!({ "message": HEALTH_MESSAGE }))
}
