pub mod auth;
pub mod cases;
pub mod client;
pub mod lawyer;
pub mod multipart;
pub mod oauth;

use actix_web::web;

use crate::error::{json_error_handler, path_error_handler};

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler));
    cfg.app_data(web::PathConfig::default().error_handler(path_error_handler));

    // ── Auth routes (register, login and OAuth are public) ──
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(auth::register))
            .route("/login", web::post().to(auth::login))
            .route("/refresh", web::post().to(auth::refresh))
            .route("/me", web::get().to(auth::me))
            .route("/me/profile-image", web::put().to(auth::upload_profile_image))
            .route("/google", web::get().to(oauth::google_login))
            .route("/google", web::post().to(oauth::google_login))
            .route("/google/callback", web::get().to(oauth::google_callback)),
    );

    // ── Client routes (all protected — require valid JWT) ──
    cfg.service(
        web::scope("/client")
            .route("/case-submit/{user_id}", web::post().to(client::submit_case))
            .route("/cases/{user_id}", web::get().to(client::get_client_cases))
            .route("/cases/{case_id}/rate", web::post().to(client::rate_case_lawyer))
            .route("/get-lawyers", web::post().to(client::get_lawyers))
            .route("/profile", web::put().to(client::update_profile)),
    );

    // ── Lawyer routes (all protected — require a lawyer's JWT) ──
    cfg.service(
        web::scope("/lawyer")
            .route("/handle-cases/{case_id}", web::get().to(lawyer::handle_case))
            .route("/available-case", web::get().to(lawyer::available_cases))
            .route("/assigned-cases", web::get().to(lawyer::assigned_cases))
            .route("/cases/{case_id}/status", web::put().to(lawyer::update_case_status))
            .route("/profile", web::put().to(lawyer::update_profile)),
    );

    // ── Case routes (parties to the case, or an admin) ──
    cfg.service(
        web::scope("/cases")
            .route("/{case_id}", web::get().to(cases::get_case))
            .route("/{case_id}/documents", web::post().to(cases::upload_documents))
            .route(
                "/{case_id}/documents/{document_id}",
                web::get().to(cases::download_document),
            ),
    );
}
