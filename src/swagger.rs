use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::Theme;
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::draw::draw,
        handlers::prize::get_prizes,
        handlers::prize::list_all_prizes,
        handlers::prize::get_prize,
        handlers::prize::create_prize,
        handlers::prize::update_prize,
        handlers::prize::delete_prize,
        handlers::prize_code::generate_codes,
        handlers::prize_code::list_codes,
        handlers::prize_code::export_codes,
        handlers::prize_code::verify_code,
        handlers::stats::get_stats,
        handlers::settings::get_settings,
        handlers::settings::save_settings,
    ),
    components(
        schemas(
            DrawRequest,
            DrawResult,
            PrizeResponse,
            PrizeInput,
            GenerateCodesRequest,
            GenerateCodesResponse,
            CodeStatus,
            PrizeCodeQuery,
            PrizeCodeResponse,
            DrawStatsResponse,
            PrizeDistributionEntry,
            DailyStat,
            SettingsPayload,
            Theme,
            ErrorResponse,
            ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "draw", description = "Lucky draw API"),
        (name = "prize", description = "Public prize catalog API"),
        (name = "settings", description = "Display settings API"),
        (name = "admin", description = "Prize, code, statistics and settings administration"),
    ),
    info(
        title = "Lucky Draw Backend API",
        version = "0.1.0",
        description = "Lucky draw engine REST API documentation"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
