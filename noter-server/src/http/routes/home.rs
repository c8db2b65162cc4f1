//! Welcome endpoint

use axum::{routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
pub struct HomeResponse {
    pub message: &'static str,
}

/// GET /
async fn home() -> Json<HomeResponse> {
    Json(HomeResponse {
        message: "Ok, Let's Start!",
    })
}

pub fn router() -> Router {
    Router::new().route("/", get(home))
}
