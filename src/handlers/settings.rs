use crate::models::*;
use crate::services::SettingsService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/settings",
    tag = "settings",
    responses(
        (status = 200, description = "展示配置", body = SettingsPayload)
    )
)]
pub async fn get_settings(service: web::Data<SettingsService>) -> Result<HttpResponse> {
    match service.get_settings().await {
        Ok(settings) => Ok(HttpResponse::Ok().json(ApiResponse::success(settings))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/settings",
    tag = "admin",
    request_body = SettingsPayload,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "保存成功", body = SettingsPayload),
        (status = 400, description = "参数错误", body = ErrorResponse)
    )
)]
pub async fn save_settings(
    service: web::Data<SettingsService>,
    body: web::Json<SettingsPayload>,
) -> Result<HttpResponse> {
    match service.save_settings(body.into_inner()).await {
        Ok(settings) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            settings,
            "Settings saved".to_string(),
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn settings_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/settings", web::get().to(get_settings));
}
