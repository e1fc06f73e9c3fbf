use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use std::sync::Arc;

use lucky_draw_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    handlers,
    middlewares::{AdminAuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration");

    // 创建数据库连接池
    let pool = Arc::new(
        create_pool(&config.database)
            .await
            .expect("Failed to create database connection pool"),
    );

    // 运行数据库迁移
    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    if config.admin.api_token.is_empty() {
        log::warn!("ADMIN_API_TOKEN is empty, all admin requests will be rejected");
    }

    // 创建服务
    let prize_service = PrizeService::new(pool.clone());
    let draw_service = DrawService::new(pool.clone(), prize_service.clone());
    let prize_code_service = PrizeCodeService::new(pool.clone(), config.draw.max_codes_per_batch);
    let stats_service = StatsService::new(pool.clone(), config.draw.daily_stats_days);
    let settings_service = SettingsService::new(pool.clone());

    // 启动HTTP服务器
    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    let admin_token = config.admin.api_token.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .wrap(AdminAuthMiddleware::new(&admin_token))
            .app_data(web::Data::new(prize_service.clone()))
            .app_data(web::Data::new(draw_service.clone()))
            .app_data(web::Data::new(prize_code_service.clone()))
            .app_data(web::Data::new(stats_service.clone()))
            .app_data(web::Data::new(settings_service.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::prize_config)
                    .configure(handlers::draw_config)
                    .configure(handlers::settings_config)
                    .configure(handlers::admin_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
