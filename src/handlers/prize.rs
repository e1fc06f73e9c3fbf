use crate::models::*;
use crate::services::PrizeService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/prizes",
    tag = "prize",
    responses(
        (status = 200, description = "获取启用奖品成功", body = [PrizeResponse])
    )
)]
/// 获取启用的奖品 (按 position 排序)
pub async fn get_prizes(service: web::Data<PrizeService>) -> Result<HttpResponse> {
    match service.list_prizes().await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/prizes",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "全部奖品 (含停用)", body = [PrizeResponse]),
        (status = 401, description = "未授权", body = ErrorResponse)
    )
)]
pub async fn list_all_prizes(service: web::Data<PrizeService>) -> Result<HttpResponse> {
    match service.list_all_prizes().await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/prizes/{id}",
    tag = "admin",
    params(("id" = i64, Path, description = "奖品ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "奖品详情", body = PrizeResponse),
        (status = 404, description = "奖品不存在", body = ErrorResponse)
    )
)]
pub async fn get_prize(
    service: web::Data<PrizeService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.get_prize(path.into_inner()).await {
        Ok(prize) => Ok(HttpResponse::Ok().json(ApiResponse::success(prize))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/prizes",
    tag = "admin",
    request_body = PrizeInput,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "创建成功", body = PrizeResponse),
        (status = 400, description = "参数错误", body = ErrorResponse)
    )
)]
pub async fn create_prize(
    service: web::Data<PrizeService>,
    body: web::Json<PrizeInput>,
) -> Result<HttpResponse> {
    match service.create_prize(body.into_inner()).await {
        Ok(prize) => Ok(HttpResponse::Created().json(ApiResponse::success(prize))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/prizes/{id}",
    tag = "admin",
    params(("id" = i64, Path, description = "奖品ID")),
    request_body = PrizeInput,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "更新成功", body = PrizeResponse),
        (status = 400, description = "参数错误", body = ErrorResponse),
        (status = 404, description = "奖品不存在", body = ErrorResponse)
    )
)]
pub async fn update_prize(
    service: web::Data<PrizeService>,
    path: web::Path<i64>,
    body: web::Json<PrizeInput>,
) -> Result<HttpResponse> {
    match service
        .update_prize(path.into_inner(), body.into_inner())
        .await
    {
        Ok(prize) => Ok(HttpResponse::Ok().json(ApiResponse::success(prize))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/prizes/{id}",
    tag = "admin",
    params(("id" = i64, Path, description = "奖品ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "删除成功 (兑奖码保留)"),
        (status = 404, description = "奖品不存在", body = ErrorResponse)
    )
)]
pub async fn delete_prize(
    service: web::Data<PrizeService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.delete_prize(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::NoContent().finish()),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn prize_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/prizes", web::get().to(get_prizes));
}
