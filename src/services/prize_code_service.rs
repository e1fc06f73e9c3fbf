use crate::entities::{prize_code_entity as codes, prize_entity as prizes};
use crate::error::{AppError, AppResult};
use crate::models::{
    CodeStatus, PaginatedResponse, PaginationParams, PrizeCodePageResponse, PrizeCodeQuery,
    PrizeCodeResponse,
};
use crate::utils::generate_prize_code;
use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set, TransactionTrait,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// 与已发放兑奖码冲突时的最大重新生成轮数
const MAX_REGENERATE_ROUNDS: usize = 5;
/// 单条 INSERT 的最大行数
const INSERT_CHUNK_SIZE: usize = 1000;

const CSV_HEADER: &str = "Code,Prize,Status,Created Date,Used Date";

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// CSV 字段转义 (含逗号、引号、换行时加引号)
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// 渲染兑奖码导出 CSV
pub fn render_codes_csv(rows: &[PrizeCodeResponse]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for row in rows {
        let line = [
            csv_field(&row.code),
            csv_field(row.prize_name.as_deref().unwrap_or("")),
            if row.is_used { "Used" } else { "Available" }.to_string(),
            row.created_at.format("%Y-%m-%d").to_string(),
            row.used_at
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        ]
        .join(",");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

#[derive(Clone)]
pub struct PrizeCodeService {
    pool: Arc<DatabaseConnection>,
    max_codes_per_batch: u32,
}

impl PrizeCodeService {
    pub fn new(pool: Arc<DatabaseConnection>, max_codes_per_batch: u32) -> Self {
        Self {
            pool,
            max_codes_per_batch,
        }
    }

    /// 为奖品批量生成兑奖码
    ///
    /// 1. 校验数量 (1..=max_codes_per_batch) 与奖品存在性
    /// 2. 批内去重，并与已发放兑奖码比对，冲突的重新生成
    /// 3. 单事务分块插入；并发批次抢先占用了某个码时整批重来
    pub async fn generate(&self, prize_id: i64, count: u32) -> AppResult<Vec<String>> {
        if count == 0 || count > self.max_codes_per_batch {
            return Err(AppError::ValidationError(format!(
                "Count must be between 1 and {}",
                self.max_codes_per_batch
            )));
        }

        if prizes::Entity::find_by_id(prize_id)
            .one(self.pool.as_ref())
            .await?
            .is_none()
        {
            return Err(AppError::InvalidPrizeReference(prize_id));
        }

        for attempt in 1..=MAX_REGENERATE_ROUNDS {
            let batch = self.unique_candidates(count as usize).await?;
            if self.insert_batch(prize_id, &batch).await? {
                log::info!(
                    "Generated {} prize codes for prize id={prize_id}",
                    batch.len()
                );
                return Ok(batch);
            }
            log::warn!("Prize codes were issued concurrently, regenerating batch (attempt {attempt})");
        }

        Err(AppError::InternalError(
            "Unable to generate unique prize codes".into(),
        ))
    }

    /// 批内去重，并剔除已发放过的兑奖码
    async fn unique_candidates(&self, wanted: usize) -> AppResult<Vec<String>> {
        let mut batch: HashSet<String> = HashSet::with_capacity(wanted);
        let mut rounds = 0;
        loop {
            while batch.len() < wanted {
                batch.insert(generate_prize_code());
            }

            let candidates: Vec<String> = batch.iter().cloned().collect();
            let mut collided = 0usize;
            for chunk in candidates.chunks(INSERT_CHUNK_SIZE) {
                let existing = codes::Entity::find()
                    .filter(codes::Column::Code.is_in(chunk.iter().cloned()))
                    .all(self.pool.as_ref())
                    .await?;
                for row in existing {
                    batch.remove(&row.code);
                    collided += 1;
                }
            }

            if collided == 0 {
                return Ok(batch.into_iter().collect());
            }
            rounds += 1;
            log::warn!("Regenerating {collided} prize codes that collided with issued codes");
            if rounds >= MAX_REGENERATE_ROUNDS {
                return Err(AppError::InternalError(
                    "Unable to generate unique prize codes".into(),
                ));
            }
        }
    }

    /// 单事务分块插入
    ///
    /// 唯一索引上的冲突行被跳过 (ON CONFLICT DO NOTHING)；
    /// 只要有一行未插入就回滚整批并返回 false。
    async fn insert_batch(&self, prize_id: i64, batch: &[String]) -> AppResult<bool> {
        let now = Utc::now();
        let txn = self.pool.begin().await?;
        for chunk in batch.chunks(INSERT_CHUNK_SIZE) {
            let models = chunk.iter().map(|code| codes::ActiveModel {
                code: Set(code.clone()),
                prize_id: Set(prize_id),
                is_used: Set(false),
                created_at: Set(now),
                ..Default::default()
            });
            let inserted = codes::Entity::insert_many(models)
                .on_conflict(
                    OnConflict::column(codes::Column::Code)
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(&txn)
                .await?;
            if inserted != chunk.len() as u64 {
                txn.rollback().await?;
                return Ok(false);
            }
        }
        txn.commit().await?;
        Ok(true)
    }

    /// 兑奖码列表（分页，按创建时间倒序）
    pub async fn list_codes(&self, query: &PrizeCodeQuery) -> AppResult<PrizeCodePageResponse> {
        let params = PaginationParams::new(query.page, query.per_page);
        let base_query = Self::filtered(query)?;

        let total = base_query.clone().count(self.pool.as_ref()).await?;

        let items = base_query
            .order_by_desc(codes::Column::CreatedAt)
            .order_by_desc(codes::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(self.pool.as_ref())
            .await?;

        let items = self.with_prize_names(items).await?;
        Ok(PaginatedResponse::new(items, params, total))
    }

    /// 按相同过滤条件导出全部兑奖码
    pub async fn export_csv(&self, query: &PrizeCodeQuery) -> AppResult<String> {
        let items = Self::filtered(query)?
            .order_by_desc(codes::Column::CreatedAt)
            .order_by_desc(codes::Column::Id)
            .all(self.pool.as_ref())
            .await?;
        let items = self.with_prize_names(items).await?;
        Ok(render_codes_csv(&items))
    }

    fn filtered(query: &PrizeCodeQuery) -> AppResult<Select<codes::Entity>> {
        if let (Some(start), Some(end)) = (query.start_date, query.end_date)
            && start > end
        {
            return Err(AppError::ValidationError(
                "start_date must not be after end_date".into(),
            ));
        }

        let mut select = codes::Entity::find();
        if let Some(prize_id) = query.prize_id {
            select = select.filter(codes::Column::PrizeId.eq(prize_id));
        }
        if let Some(status) = query.status {
            select = select.filter(codes::Column::IsUsed.eq(status == CodeStatus::Used));
        }
        if let Some(start) = query.start_date {
            select = select.filter(codes::Column::CreatedAt.gte(start_of_day(start)));
        }
        if let Some(end) = query.end_date
            && let Some(next_day) = end.checked_add_days(Days::new(1))
        {
            select = select.filter(codes::Column::CreatedAt.lt(start_of_day(next_day)));
        }
        Ok(select)
    }

    async fn with_prize_names(
        &self,
        items: Vec<codes::Model>,
    ) -> AppResult<Vec<PrizeCodeResponse>> {
        let ids: HashSet<i64> = items.iter().map(|c| c.prize_id).collect();
        let names: HashMap<i64, String> = if ids.is_empty() {
            HashMap::new()
        } else {
            prizes::Entity::find()
                .filter(prizes::Column::Id.is_in(ids))
                .all(self.pool.as_ref())
                .await?
                .into_iter()
                .map(|p| (p.id, p.name))
                .collect()
        };

        Ok(items
            .into_iter()
            .map(|c| {
                let name = names.get(&c.prize_id).cloned();
                PrizeCodeResponse::new(c, name)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{PRIZE_CODE_ALPHABET, PRIZE_CODE_LENGTH};
    use chrono::TimeZone;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
    use std::collections::BTreeMap;

    fn prize(id: i64) -> prizes::Model {
        prizes::Model {
            id,
            name: "Gold, Large".to_string(),
            description: None,
            image: None,
            probability: 10.0,
            position: 1,
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }

    fn code_row(id: i64, code: &str, prize_id: i64, used: bool) -> codes::Model {
        codes::Model {
            id,
            code: code.to_string(),
            prize_id,
            is_used: used,
            used_at: used.then(|| Utc.with_ymd_and_hms(2025, 9, 4, 12, 0, 0).unwrap()),
            created_at: Utc.with_ymd_and_hms(2025, 9, 1, 9, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_generate_returns_requested_count_of_valid_codes() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![prize(5)]])
            .append_query_results([Vec::<codes::Model>::new()])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 25,
            }])
            .into_connection();
        let service = PrizeCodeService::new(Arc::new(db), 10_000);

        let generated = service.generate(5, 25).await.unwrap();
        assert_eq!(generated.len(), 25);
        let unique: HashSet<_> = generated.iter().collect();
        assert_eq!(unique.len(), 25);
        for code in &generated {
            assert_eq!(code.len(), PRIZE_CODE_LENGTH);
            assert!(code.bytes().all(|b| PRIZE_CODE_ALPHABET.contains(&b)));
        }
    }

    #[tokio::test]
    async fn test_generate_retries_when_codes_are_taken_concurrently() {
        // 第一次插入只落库 24 行 (有一个码被并发批次占用)，整批回滚后重来
        let conn = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![prize(5)]])
                .append_query_results([Vec::<codes::Model>::new()])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 24,
                }])
                .append_query_results([Vec::<codes::Model>::new()])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 25,
                }])
                .into_connection(),
        );
        let service = PrizeCodeService::new(conn.clone(), 10_000);

        let generated = service.generate(5, 25).await.unwrap();
        assert_eq!(generated.len(), 25);

        drop(service);
        let log: Vec<String> = Arc::try_unwrap(conn)
            .ok()
            .expect("connection is still shared by a service")
            .into_transaction_log()
            .iter()
            .map(|txn| format!("{txn:?}").replace("\\\"", "\""))
            .collect();
        let inserts: Vec<&String> = log
            .iter()
            .filter(|stmt| stmt.contains(r#"INSERT INTO "prize_codes""#))
            .collect();
        assert_eq!(inserts.len(), 2);
        for stmt in &inserts {
            assert!(stmt.contains(r#"ON CONFLICT ("code") DO NOTHING"#), "{stmt}");
        }
        assert!(inserts[0].contains("ROLLBACK"), "{}", inserts[0]);
        assert!(inserts[1].contains("COMMIT"), "{}", inserts[1]);
    }

    #[tokio::test]
    async fn test_generate_gives_up_after_repeated_conflicts() {
        let mut db = MockDatabase::new(DatabaseBackend::Postgres).append_query_results([vec![prize(5)]]);
        for _ in 0..MAX_REGENERATE_ROUNDS {
            db = db
                .append_query_results([Vec::<codes::Model>::new()])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }]);
        }
        let service = PrizeCodeService::new(Arc::new(db.into_connection()), 10_000);

        let err = service.generate(5, 1).await.unwrap_err();
        assert!(matches!(err, AppError::InternalError(_)));
    }

    #[tokio::test]
    async fn test_generate_unknown_prize() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<prizes::Model>::new()])
            .into_connection();
        let service = PrizeCodeService::new(Arc::new(db), 10_000);

        let err = service.generate(42, 3).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidPrizeReference(42)));
    }

    #[tokio::test]
    async fn test_generate_count_bounds() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = PrizeCodeService::new(Arc::new(db), 100);

        assert!(matches!(
            service.generate(1, 0).await,
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            service.generate(1, 101).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_list_codes_attaches_prize_names() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![BTreeMap::from([(
                "num_items",
                Into::<Value>::into(2i64),
            )])]])
            .append_query_results([vec![
                code_row(2, "BBBBBBBBBB", 5, true),
                code_row(1, "AAAAAAAAAA", 9, false),
            ]])
            .append_query_results([vec![prize(5)]])
            .into_connection();
        let service = PrizeCodeService::new(Arc::new(db), 10_000);

        let page = service.list_codes(&PrizeCodeQuery::default()).await.unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[0].prize_name.as_deref(), Some("Gold, Large"));
        // 奖品 9 已删除
        assert_eq!(page.data[1].prize_name, None);
    }

    #[tokio::test]
    async fn test_list_codes_rejects_inverted_date_range() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = PrizeCodeService::new(Arc::new(db), 10_000);
        let query = PrizeCodeQuery {
            start_date: NaiveDate::from_ymd_opt(2025, 9, 7),
            end_date: NaiveDate::from_ymd_opt(2025, 9, 1),
            ..Default::default()
        };
        assert!(matches!(
            service.list_codes(&query).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_render_codes_csv() {
        let rows = vec![
            PrizeCodeResponse::new(code_row(1, "AAAAAAAAAA", 5, true), Some("Gold, Large".into())),
            PrizeCodeResponse::new(code_row(2, "BBBBBBBBBB", 9, false), None),
        ];
        let csv = render_codes_csv(&rows);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Code,Prize,Status,Created Date,Used Date");
        assert_eq!(lines[1], "AAAAAAAAAA,\"Gold, Large\",Used,2025-09-01,2025-09-04");
        assert_eq!(lines[2], "BBBBBBBBBB,,Available,2025-09-01,");
    }

    #[test]
    fn test_csv_field_escapes_quotes() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
