use crate::AppState;
use actix_web::{get, post, web, HttpResponse};
use shared_types::ActionResponse;
use tracing::info;

#[get("/metrics")]
pub async fn get_metrics(data: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(data.metrics.snapshot())
}

#[post("/metrics/reset")]
pub async fn reset_metrics(data: web::Data<AppState>) -> HttpResponse {
    data.metrics.reset();
    info!("Metrics reset");
    HttpResponse::Ok().json(ActionResponse::ok("Metrics reset"))
}
