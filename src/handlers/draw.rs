use crate::models::*;
use crate::services::DrawService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/draw",
    tag = "draw",
    request_body = DrawRequest,
    responses(
        (status = 200, description = "抽奖完成", body = DrawResult),
        (status = 400, description = "兑奖码无效或已使用", body = ErrorResponse),
        (status = 409, description = "没有启用的奖品", body = ErrorResponse),
        (status = 503, description = "存储不可用", body = ErrorResponse)
    )
)]
/// 进行一次抽奖:
/// - 提供 code 时校验并消费兑奖码，返回兑奖码绑定的奖品
/// - 不提供 code 时按奖品权重随机抽取
pub async fn draw(
    service: web::Data<DrawService>,
    body: Option<web::Json<DrawRequest>>,
) -> Result<HttpResponse> {
    let request = body.map(web::Json::into_inner).unwrap_or_default();
    match service.resolve(request.code.as_deref()).await {
        Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success(result))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn draw_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/draw", web::post().to(draw));
}
