pub mod recommendation;

use actix_web::web;

use crate::error::AppError;

pub use recommendation::{RecommendationHandlerState, INTERNAL_API_KEY_HEADER};

/// Register every route; the caller provides `web::Data<RecommendationHandlerState>`
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Malformed bodies get the same JSON error shape as every other failure
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into());

    cfg.app_data(json_config)
        .service(recommendation::recommend)
        .service(recommendation::get_model_info)
        .service(recommendation::reload_bundle)
        .service(recommendation::health)
        .service(recommendation::metrics_endpoint);
}
