use crate::models::*;
use crate::services::{DrawService, PrizeCodeService};
use actix_web::http::header;
use actix_web::{HttpResponse, ResponseError, Result, web};
use chrono::Utc;

#[utoipa::path(
    post,
    path = "/admin/prizes/{id}/codes",
    tag = "admin",
    params(("id" = i64, Path, description = "奖品ID")),
    request_body = GenerateCodesRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "生成成功", body = GenerateCodesResponse),
        (status = 400, description = "数量超出范围", body = ErrorResponse),
        (status = 404, description = "奖品不存在", body = ErrorResponse)
    )
)]
/// 为奖品批量生成兑奖码
pub async fn generate_codes(
    service: web::Data<PrizeCodeService>,
    path: web::Path<i64>,
    body: web::Json<GenerateCodesRequest>,
) -> Result<HttpResponse> {
    let prize_id = path.into_inner();
    match service.generate(prize_id, body.count).await {
        Ok(codes) => Ok(HttpResponse::Created().json(ApiResponse::success(
            GenerateCodesResponse { prize_id, codes },
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/codes",
    tag = "admin",
    params(
        ("page" = Option<u32>, Query, description = "页码 (默认1)"),
        ("per_page" = Option<u32>, Query, description = "每页数量 (默认20, 最大100)"),
        ("prize_id" = Option<i64>, Query, description = "按奖品过滤"),
        ("status" = Option<CodeStatus>, Query, description = "used / unused"),
        ("start_date" = Option<String>, Query, description = "创建日期起 (YYYY-MM-DD)"),
        ("end_date" = Option<String>, Query, description = "创建日期止 (YYYY-MM-DD)")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "兑奖码列表", body = PaginatedResponse<PrizeCodeResponse>)
    )
)]
pub async fn list_codes(
    service: web::Data<PrizeCodeService>,
    query: web::Query<PrizeCodeQuery>,
) -> Result<HttpResponse> {
    match service.list_codes(&query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/codes/export",
    tag = "admin",
    params(
        ("prize_id" = Option<i64>, Query, description = "按奖品过滤"),
        ("status" = Option<CodeStatus>, Query, description = "used / unused"),
        ("start_date" = Option<String>, Query, description = "创建日期起 (YYYY-MM-DD)"),
        ("end_date" = Option<String>, Query, description = "创建日期止 (YYYY-MM-DD)")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "CSV 文件", content_type = "text/csv", body = String)
    )
)]
/// 导出兑奖码 CSV
pub async fn export_codes(
    service: web::Data<PrizeCodeService>,
    query: web::Query<PrizeCodeQuery>,
) -> Result<HttpResponse> {
    let query = query.into_inner();
    let prefix = match query.status {
        Some(CodeStatus::Unused) => "unused-prize-codes",
        Some(CodeStatus::Used) => "used-prize-codes",
        None => "prize-codes",
    };
    match service.export_csv(&query).await {
        Ok(csv) => Ok(HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!(
                    "attachment; filename=\"{prefix}-{}.csv\"",
                    Utc::now().format("%Y-%m-%d")
                ),
            ))
            .body(csv)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/codes/{code}/verify",
    tag = "admin",
    params(("code" = String, Path, description = "兑奖码")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "兑奖码已使用，返回对应奖品", body = DrawResult),
        (status = 404, description = "兑奖码不存在", body = ErrorResponse),
        (status = 409, description = "兑奖码尚未使用", body = ErrorResponse)
    )
)]
/// 核验兑奖码 (只读)
pub async fn verify_code(
    service: web::Data<DrawService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match service.verify(&path.into_inner()).await {
        Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success(result))),
        Err(e) => Ok(e.error_response()),
    }
}
