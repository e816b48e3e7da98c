//! Liveness probe and simulation metrics.

use actix_web::{get, web, HttpResponse, Responder};

use crate::{game::room::ROOMS, metrics};

#[get("/healthz")]
pub async fn healthz() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "rooms": ROOMS.len(),
    }))
}

#[get("/metrics/sim")]
pub async fn sim_metrics() -> impl Responder {
    match metrics::render_sim() {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4")
            .body(body),
        Err(e) => {
            log::error!("metrics encoding failed: {e:?}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(healthz).service(sim_metrics);
}
