use actix_web::{middleware, web, App, HttpServer};
use log::info;

use farm::{api::AppState, config::Config, storage::json::JsonFileStore};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    let store = JsonFileStore::open(&config.data_dir).map_err(std::io::Error::other)?;
    let state = web::Data::new(AppState::new(store));

    let bind_addr = config.bind_addr.clone();
    info!("🌱 Farm dashboard API started at http://{bind_addr}");
    info!("   Data directory: {}", config.data_dir.display());
    info!("   GET  /api/farms");
    info!("   GET  /api/farms/{{key}}/grid");
    info!("   POST /api/farms/{{key}}/merge");
    info!("   📖 Swagger UI → http://{bind_addr}/swagger-ui/");
    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(farm::api::routes::configure)
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                let message = format!("JSON deserialization error: {err}");
                actix_web::error::InternalError::from_response(
                    err,
                    actix_web::HttpResponse::BadRequest()
                        .json(serde_json::json!({ "error": message })),
                )
                .into()
            }))
    })
    .bind(bind_addr)?
    .run()
    .await
}
