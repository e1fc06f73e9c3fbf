use actix_cors::Cors;
use actix_web::http::header;

/// 抽奖页面与管理后台可能部署在不同域名
pub fn create_cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        // 导出 CSV 时前端需要读取文件名
        .expose_headers(vec![header::CONTENT_DISPOSITION])
        .max_age(3600)
}
