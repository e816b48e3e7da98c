use actix_web::{middleware::Logger, App, HttpServer};
use memoryleak_server::{config::settings, http, metrics, ws};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    // Configuration
    let s = settings();
    if s.jwt_secret.is_none() {
        log::warn!("JWT_SECRET not set, accepting anonymous players");
    }
    log::info!(
        "listening on {} ({} Hz, map {}x{})",
        s.server_addr,
        s.tick_rate,
        s.map_width,
        s.map_height
    );

    // Start HTTP + WS server
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(metrics::METRICS.clone())
            .configure(http::routes::init_routes)
            .configure(ws::routes::init_routes)
    })
    .bind(&s.server_addr)?
    .run()
    .await
}
