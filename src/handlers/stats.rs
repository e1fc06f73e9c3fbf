use crate::models::*;
use crate::services::StatsService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/admin/stats",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "抽奖统计", body = DrawStatsResponse),
        (status = 401, description = "未授权", body = ErrorResponse)
    )
)]
/// 基于已使用兑奖码的统计 (中奖率、奖品分布、按日统计)
pub async fn get_stats(service: web::Data<StatsService>) -> Result<HttpResponse> {
    match service.compute_stats().await {
        Ok(stats) => Ok(HttpResponse::Ok().json(ApiResponse::success(stats))),
        Err(e) => Ok(e.error_response()),
    }
}
