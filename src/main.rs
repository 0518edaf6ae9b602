use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, web};
use caselaw_backend::auth::google::GoogleOAuth;
use caselaw_backend::auth::jwt::TokenIssuer;
use caselaw_backend::config::AppConfig;
use caselaw_backend::storage::{UPLOADS_ROUTE, UploadStore};
use caselaw_backend::{create_pool, db, handlers};
use dotenv::dotenv;
use std::io;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = AppConfig::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    tracing::info!(environment = ?config.environment, "Loaded configuration");

    let db = create_pool(&config.database_url)
        .await
        .map_err(io::Error::other)?;
    db::prepare(&db).await.map_err(io::Error::other)?;
    tracing::info!("Database ready");
    let db_data = web::Data::new(db);

    let uploads = UploadStore::from_config(&config);
    uploads.ensure_dir().await?;
    let upload_dir = uploads.dir().to_path_buf();
    let uploads_data = web::Data::new(uploads);

    let issuer = web::Data::new(TokenIssuer::new(
        &config.jwt_secret,
        config.environment.access_token_ttl(),
        config.environment.refresh_token_ttl(),
    ));

    let google = config.google.clone().map(|google| web::Data::new(GoogleOAuth::new(google)));
    if google.is_none() {
        tracing::warn!("GOOGLE_CLIENT_ID/GOOGLE_CLIENT_SECRET not set; Google sign-in disabled");
    }

    let bind_addr = config.bind_addr();
    let config_data = web::Data::new(config);
    tracing::info!("Server running at http://{bind_addr}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        let mut app = App::new()
            .wrap(cors)
            .app_data(db_data.clone())
            .app_data(issuer.clone())
            .app_data(uploads_data.clone())
            .app_data(config_data.clone());

        if let Some(google) = &google {
            app = app.app_data(google.clone());
        }

        app.service(Files::new(UPLOADS_ROUTE, upload_dir.clone()))
            .service(web::scope("/api").configure(handlers::init_routes))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
