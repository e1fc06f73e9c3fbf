use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

/// 单个奖品的中奖分布
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PrizeDistributionEntry {
    pub prize_id: i64,
    pub prize_name: String,
    pub count: i64,
    /// count / total_draws * 100
    pub percentage: f64,
}

/// 按日统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DailyStat {
    pub date: NaiveDate,
    pub draws: i64,
    pub wins: i64,
}

/// 抽奖统计
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DrawStatsResponse {
    /// 已发放兑奖码总数 (含未使用)
    pub total_codes: i64,
    /// 已使用兑奖码数
    pub total_draws: i64,
    /// 已使用且奖品仍存在的兑奖码数
    pub total_wins: i64,
    /// total_wins / total_draws * 100，无抽奖时为 0
    pub win_rate: f64,
    pub prize_distribution: Vec<PrizeDistributionEntry>,
    pub daily_stats: Vec<DailyStat>,
}
