use crate::entities::{prize_code_entity as codes, prize_entity as prizes};
use crate::error::AppResult;
use crate::models::{DailyStat, DrawStatsResponse, PrizeDistributionEntry};
use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter,
    QuerySelect,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

/// 已使用兑奖码按奖品分组计数
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct PrizeUsage {
    pub prize_id: i64,
    pub draws: i64,
}

fn percentage(part: i64, whole: i64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// 汇总统计
///
/// - total_draws: 已使用兑奖码数
/// - total_wins: 其中奖品仍存在的数量
/// - prize_distribution: 仅包含仍存在的奖品，按数量降序
pub fn summarize(
    total_codes: i64,
    usage: &[PrizeUsage],
    prize_names: &HashMap<i64, String>,
) -> DrawStatsResponse {
    let total_draws: i64 = usage.iter().map(|u| u.draws).sum();

    let mut prize_distribution: Vec<PrizeDistributionEntry> = usage
        .iter()
        .filter_map(|u| {
            prize_names.get(&u.prize_id).map(|name| PrizeDistributionEntry {
                prize_id: u.prize_id,
                prize_name: name.clone(),
                count: u.draws,
                percentage: percentage(u.draws, total_draws),
            })
        })
        .collect();
    prize_distribution.sort_by(|a, b| b.count.cmp(&a.count).then(a.prize_id.cmp(&b.prize_id)));

    let total_wins: i64 = prize_distribution.iter().map(|d| d.count).sum();

    DrawStatsResponse {
        total_codes,
        total_draws,
        total_wins,
        win_rate: percentage(total_wins, total_draws),
        prize_distribution,
        daily_stats: Vec::new(),
    }
}

/// 最近 `days` 天 (含今天, UTC) 的按日统计，旧日期在前，无数据的日期补 0
pub fn daily_buckets(
    today: NaiveDate,
    days: u32,
    used: &[(DateTime<Utc>, bool)],
) -> Vec<DailyStat> {
    let mut buckets: BTreeMap<NaiveDate, DailyStat> = BTreeMap::new();
    for offset in 0..days {
        if let Some(date) = today.checked_sub_days(Days::new(offset as u64)) {
            buckets.insert(
                date,
                DailyStat {
                    date,
                    draws: 0,
                    wins: 0,
                },
            );
        }
    }

    for (used_at, win) in used {
        if let Some(bucket) = buckets.get_mut(&used_at.date_naive()) {
            bucket.draws += 1;
            if *win {
                bucket.wins += 1;
            }
        }
    }

    buckets.into_values().collect()
}

#[derive(Clone)]
pub struct StatsService {
    pool: Arc<DatabaseConnection>,
    daily_stats_days: u32,
}

impl StatsService {
    pub fn new(pool: Arc<DatabaseConnection>, daily_stats_days: u32) -> Self {
        Self {
            pool,
            daily_stats_days,
        }
    }

    pub async fn compute_stats(&self) -> AppResult<DrawStatsResponse> {
        let total_codes = codes::Entity::find().count(self.pool.as_ref()).await? as i64;

        let usage: Vec<PrizeUsage> = codes::Entity::find()
            .select_only()
            .column(codes::Column::PrizeId)
            .column_as(Expr::col(codes::Column::Id).count(), "draws")
            .filter(codes::Column::IsUsed.eq(true))
            .group_by(codes::Column::PrizeId)
            .into_model::<PrizeUsage>()
            .all(self.pool.as_ref())
            .await?;

        let prize_names = self
            .existing_prize_names(usage.iter().map(|u| u.prize_id).collect())
            .await?;

        let mut stats = summarize(total_codes, &usage, &prize_names);
        stats.daily_stats = self.daily_stats(&prize_names).await?;
        Ok(stats)
    }

    async fn daily_stats(&self, prize_names: &HashMap<i64, String>) -> AppResult<Vec<DailyStat>> {
        if self.daily_stats_days == 0 {
            return Ok(Vec::new());
        }
        let today = Utc::now().date_naive();
        let first_day = today
            .checked_sub_days(Days::new(u64::from(self.daily_stats_days - 1)))
            .unwrap_or(NaiveDate::MIN);
        let since = first_day.and_time(NaiveTime::MIN).and_utc();

        let used = codes::Entity::find()
            .filter(codes::Column::IsUsed.eq(true))
            .filter(codes::Column::UsedAt.gte(since))
            .all(self.pool.as_ref())
            .await?;

        let used: Vec<(DateTime<Utc>, bool)> = used
            .into_iter()
            .filter_map(|c| {
                c.used_at
                    .map(|at| (at, prize_names.contains_key(&c.prize_id)))
            })
            .collect();

        Ok(daily_buckets(today, self.daily_stats_days, &used))
    }

    async fn existing_prize_names(&self, ids: HashSet<i64>) -> AppResult<HashMap<i64, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        Ok(prizes::Entity::find()
            .filter(prizes::Column::Id.is_in(ids))
            .all(self.pool.as_ref())
            .await?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect())
    }
}
