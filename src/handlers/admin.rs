use actix_web::web;

use super::{prize, prize_code, settings, stats};

/// 管理后台路由 (由 AdminAuthMiddleware 校验令牌)
pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/prizes", web::get().to(prize::list_all_prizes))
            .route("/prizes", web::post().to(prize::create_prize))
            .route("/prizes/{id}", web::get().to(prize::get_prize))
            .route("/prizes/{id}", web::put().to(prize::update_prize))
            .route("/prizes/{id}", web::delete().to(prize::delete_prize))
            .route("/prizes/{id}/codes", web::post().to(prize_code::generate_codes))
            .route("/codes", web::get().to(prize_code::list_codes))
            .route("/codes/export", web::get().to(prize_code::export_codes))
            .route("/codes/{code}/verify", web::get().to(prize_code::verify_code))
            .route("/stats", web::get().to(stats::get_stats))
            .route("/settings", web::put().to(settings::save_settings)),
    );
}
