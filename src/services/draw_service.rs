use crate::entities::{prize_code_entity as codes, prize_entity as prizes};
use crate::error::{AppError, AppResult};
use crate::models::DrawResult;
use crate::services::PrizeService;
use crate::utils::pick_weighted;
use chrono::Utc;
use rand::Rng;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, UpdateResult};
use std::sync::Arc;

const NO_PRIZE_MESSAGE: &str = "Sorry, better luck next time!";

/// 在启用奖品中按权重选出一个
///
/// 所有权重为 0 时在奖品间均匀选择，列表为空返回 None。
pub fn select_prize<'a, R: Rng + ?Sized>(
    available: &'a [prizes::Model],
    rng: &mut R,
) -> Option<&'a prizes::Model> {
    pick_weighted(available, |p| p.probability, rng)
}

#[derive(Clone)]
pub struct DrawService {
    pool: Arc<DatabaseConnection>,
    prize_service: PrizeService,
}

impl DrawService {
    pub fn new(pool: Arc<DatabaseConnection>, prize_service: PrizeService) -> Self {
        Self {
            pool,
            prize_service,
        }
    }

    /// 抽奖
    ///
    /// - 带兑奖码: 原子消费兑奖码并返回其绑定的奖品
    /// - 不带兑奖码 (或全为空白): 在启用奖品中按权重随机抽取，不消费任何兑奖码
    pub async fn resolve(&self, code: Option<&str>) -> AppResult<DrawResult> {
        match code.map(str::trim).filter(|c| !c.is_empty()) {
            Some(code) => self.resolve_code(code).await,
            None => self.resolve_random().await,
        }
    }

    async fn resolve_random(&self) -> AppResult<DrawResult> {
        let available = self.prize_service.list_active_prizes().await?;

        let selected = {
            let mut rng = rand::thread_rng();
            select_prize(&available, &mut rng).cloned()
        }
        .ok_or(AppError::NoPrizesAvailable)?;

        log::info!(
            "Random draw selected prize id={} among {} active prizes",
            selected.id,
            available.len()
        );
        Ok(DrawResult::winner(selected, None))
    }

    async fn resolve_code(&self, code: &str) -> AppResult<DrawResult> {
        // 条件更新 (where is_used = false) 保证同一兑奖码最多被消费一次，
        // 并发请求中只有 rows_affected == 1 的一方成功
        let update_result: UpdateResult = codes::Entity::update_many()
            .col_expr(codes::Column::IsUsed, Expr::value(true))
            .col_expr(codes::Column::UsedAt, Expr::value(Utc::now()))
            .filter(codes::Column::Code.eq(code))
            .filter(codes::Column::IsUsed.eq(false))
            .exec(self.pool.as_ref())
            .await?;

        if update_result.rows_affected != 1 {
            log::warn!("Draw rejected: code absent or already used");
            return Err(AppError::InvalidOrConsumedCode);
        }

        // 已消费的兑奖码不会再变化，回读是安全的
        let consumed = codes::Entity::find()
            .filter(codes::Column::Code.eq(code))
            .one(self.pool.as_ref())
            .await?
            .ok_or_else(|| {
                AppError::InternalError("Prize code disappeared after consumption".into())
            })?;

        match prizes::Entity::find_by_id(consumed.prize_id)
            .one(self.pool.as_ref())
            .await?
        {
            Some(prize) => {
                log::info!(
                    "Prize code id={} consumed for prize id={}",
                    consumed.id,
                    prize.id
                );
                Ok(DrawResult::winner(prize, Some(code.to_string())))
            }
            None => {
                // 奖品已被删除: 兑奖码仍视为已消费，结果为未中奖
                log::warn!(
                    "Prize code id={} consumed but prize id={} no longer exists",
                    consumed.id,
                    consumed.prize_id
                );
                Ok(DrawResult::no_prize(
                    NO_PRIZE_MESSAGE.to_string(),
                    Some(code.to_string()),
                ))
            }
        }
    }

    /// 核验已使用兑奖码 (只读)
    ///
    /// 与抽奖不同，这里区分“不存在”和“未使用”两种失败。
    pub async fn verify(&self, code: &str) -> AppResult<DrawResult> {
        let code = code.trim();
        if code.is_empty() {
            return Err(AppError::CodeNotFound);
        }

        let record = codes::Entity::find()
            .filter(codes::Column::Code.eq(code))
            .one(self.pool.as_ref())
            .await?
            .ok_or(AppError::CodeNotFound)?;

        if !record.is_used {
            return Err(AppError::CodeNotRedeemed);
        }

        let used_on = record
            .used_at
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "an unknown date".to_string());

        match prizes::Entity::find_by_id(record.prize_id)
            .one(self.pool.as_ref())
            .await?
        {
            Some(prize) => {
                let message = format!("This code was redeemed for {} on {}", prize.name, used_on);
                Ok(DrawResult::for_prize(prize, message, Some(record.code)))
            }
            None => Ok(DrawResult::no_prize(
                format!("This code was redeemed on {used_on} but its prize no longer exists"),
                Some(record.code),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn prize(id: i64, name: &str, probability: f64) -> prizes::Model {
        prizes::Model {
            id,
            name: name.to_string(),
            description: None,
            image: Some(format!("https://cdn.example.com/{id}.png")),
            probability,
            position: id as i32,
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }

    fn code_row(code: &str, prize_id: i64, is_used: bool) -> codes::Model {
        codes::Model {
            id: 11,
            code: code.to_string(),
            prize_id,
            is_used,
            used_at: is_used.then(|| Utc.with_ymd_and_hms(2025, 9, 3, 10, 30, 0).unwrap()),
            created_at: Utc.with_ymd_and_hms(2025, 9, 1, 8, 0, 0).unwrap(),
        }
    }

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    fn connect(db: MockDatabase) -> Arc<DatabaseConnection> {
        Arc::new(db.into_connection())
    }

    fn service_on(conn: &Arc<DatabaseConnection>) -> DrawService {
        DrawService::new(conn.clone(), PrizeService::new(conn.clone()))
    }

    fn service(db: MockDatabase) -> DrawService {
        service_on(&connect(db))
    }

    /// 取出连接上执行过的语句 (调试文本，引号已还原)
    fn statement_log(conn: Arc<DatabaseConnection>) -> Vec<String> {
        let conn = Arc::try_unwrap(conn)
            .ok()
            .expect("connection is still shared by a service");
        conn.into_transaction_log()
            .iter()
            .map(|txn| format!("{txn:?}").replace("\\\"", "\""))
            .collect()
    }

    fn is_code_update(stmt: &str) -> bool {
        stmt.contains(r#"UPDATE "prize_codes""#)
    }

    /// 消费语句必须同时带上 code 与 is_used = false 两个条件
    fn assert_conditional_consume(stmt: &str, code: &str) {
        assert!(is_code_update(stmt), "{stmt}");
        assert!(
            stmt.contains(r#"WHERE "prize_codes"."code" = $3 AND "prize_codes"."is_used" = $4"#),
            "{stmt}"
        );
        assert!(stmt.contains(&format!(r#"String(Some("{code}"))"#)), "{stmt}");
        assert!(stmt.contains("Bool(Some(false))"), "{stmt}");
    }

    #[test]
    fn test_select_prize_matches_weight_ratio() {
        let available = vec![prize(1, "Gold", 10.0), prize(2, "None", 90.0)];
        let mut rng = StdRng::seed_from_u64(2024);
        let n = 10_000;
        let gold = (0..n)
            .filter(|_| select_prize(&available, &mut rng).unwrap().id == 1)
            .count();
        let freq = gold as f64 / n as f64;
        // 标准差约 0.3%，容差取 4 倍以上
        assert!((freq - 0.10).abs() < 0.015, "gold frequency {freq}");
    }

    #[test]
    fn test_select_prize_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(select_prize(&[], &mut rng).is_none());
    }

    #[tokio::test]
    async fn test_random_draw_without_prizes_fails() {
        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<prizes::Model>::new()]),
        );
        let err = svc.resolve(None).await.unwrap_err();
        assert!(matches!(err, AppError::NoPrizesAvailable));
    }

    #[tokio::test]
    async fn test_random_draw_always_awards_a_prize() {
        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![prize(3, "Sticker", 1.0)]]),
        );
        let result = svc.resolve(Some("   ")).await.unwrap();
        assert!(result.is_winner);
        assert_eq!(result.prize_id, Some(3));
        assert_eq!(result.code, None);
        assert_eq!(result.message, "Congratulations! You've won Sticker!");
    }

    #[tokio::test]
    async fn test_code_is_consumed_once() {
        let conn = connect(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(1), exec(0)])
                .append_query_results([vec![code_row("ABC1234567", 5, true)]])
                .append_query_results([vec![prize(5, "Gold", 10.0)]]),
        );
        let svc = service_on(&conn);

        let first = svc.resolve(Some("ABC1234567")).await.unwrap();
        assert!(first.is_winner);
        assert_eq!(first.prize_id, Some(5));
        assert_eq!(first.code.as_deref(), Some("ABC1234567"));

        let second = svc.resolve(Some(" ABC1234567 ")).await.unwrap_err();
        assert!(matches!(second, AppError::InvalidOrConsumedCode));

        drop(svc);
        let log = statement_log(conn);
        // 先写后读: 第一条语句就是条件更新，之前没有对 prize_codes 的查询
        assert_conditional_consume(&log[0], "ABC1234567");
        assert!(log[1].contains(r#"FROM "prize_codes""#), "{}", log[1]);
        assert!(log[2].contains(r#"FROM "prizes""#), "{}", log[2]);
        // 重放同样只发出一条条件更新
        assert_eq!(log.len(), 4);
        assert_conditional_consume(&log[3], "ABC1234567");
    }

    #[tokio::test]
    async fn test_concurrent_resolves_have_single_winner() {
        // 存储层条件更新只会让一方 rows_affected == 1
        let conn = connect(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(1), exec(0)])
                .append_query_results([vec![code_row("RACE123456", 5, true)]])
                .append_query_results([vec![prize(5, "Gold", 10.0)]]),
        );
        let svc = service_on(&conn);

        let (a, b) = tokio::join!(
            svc.resolve(Some("RACE123456")),
            svc.resolve(Some("RACE123456"))
        );
        let results = [a, b];
        let wins = results.iter().filter(|r| r.is_ok()).count();
        let rejected = results
            .iter()
            .filter(|r| matches!(r, Err(AppError::InvalidOrConsumedCode)))
            .count();
        assert_eq!(wins, 1);
        assert_eq!(rejected, 1);

        drop(svc);
        let log = statement_log(conn);
        assert!(is_code_update(&log[0]), "{}", log[0]);
        let updates: Vec<&String> = log.iter().filter(|stmt| is_code_update(stmt)).collect();
        assert_eq!(updates.len(), 2);
        for stmt in updates {
            assert_conditional_consume(stmt, "RACE123456");
        }
    }

    #[tokio::test]
    async fn test_verify_after_resolve_reports_same_prize() {
        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(1)])
                .append_query_results([vec![code_row("ABC1234567", 5, true)]])
                .append_query_results([vec![prize(5, "Gold", 10.0)]])
                .append_query_results([vec![code_row("ABC1234567", 5, true)]])
                .append_query_results([vec![prize(5, "Gold", 10.0)]]),
        );

        let drawn = svc.resolve(Some("ABC1234567")).await.unwrap();
        let verified = svc.verify("ABC1234567").await.unwrap();
        assert!(drawn.is_winner);
        assert!(verified.is_winner);
        assert_eq!(verified.prize_id, drawn.prize_id);
        assert_eq!(verified.code, drawn.code);
    }

    #[test]
    fn test_select_prize_ignores_invalid_probabilities() {
        let available = vec![
            prize(1, "Broken", f64::NAN),
            prize(2, "Negative", -10.0),
            prize(3, "Sticker", 1.0),
        ];
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..500 {
            assert_eq!(select_prize(&available, &mut rng).unwrap().id, 3);
        }
    }

    #[tokio::test]
    async fn test_unknown_code_is_indistinguishable_from_used() {
        let svc = service(MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([exec(0)]));
        let err = svc.resolve(Some("NOPE000000")).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidOrConsumedCode));
    }

    #[tokio::test]
    async fn test_code_for_deleted_prize_is_a_loss() {
        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(1)])
                .append_query_results([vec![code_row("GONE123456", 8, true)]])
                .append_query_results([Vec::<prizes::Model>::new()]),
        );
        let result = svc.resolve(Some("GONE123456")).await.unwrap();
        assert!(!result.is_winner);
        assert_eq!(result.prize_id, None);
        assert_eq!(result.code.as_deref(), Some("GONE123456"));
        assert_eq!(result.message, NO_PRIZE_MESSAGE);
    }

    #[tokio::test]
    async fn test_verify_redeemed_code() {
        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![code_row("ABC1234567", 5, true)]])
                .append_query_results([vec![prize(5, "Gold", 10.0)]]),
        );
        let result = svc.verify("ABC1234567").await.unwrap();
        assert!(result.is_winner);
        assert_eq!(result.prize_id, Some(5));
        assert_eq!(
            result.message,
            "This code was redeemed for Gold on 2025-09-03"
        );
    }

    #[tokio::test]
    async fn test_verify_distinguishes_failures() {
        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<codes::Model>::new()])
                .append_query_results([vec![code_row("FRESH12345", 5, false)]]),
        );
        assert!(matches!(
            svc.verify("MISSING123").await,
            Err(AppError::CodeNotFound)
        ));
        assert!(matches!(
            svc.verify("FRESH12345").await,
            Err(AppError::CodeNotRedeemed)
        ));
    }
}
