use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::prize_code_entity;

use super::PaginatedResponse;

/// 批量生成兑奖码请求
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct GenerateCodesRequest {
    /// 生成数量 (1 - 10000)
    pub count: u32,
}

/// 批量生成兑奖码响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GenerateCodesResponse {
    pub prize_id: i64,
    pub codes: Vec<String>,
}

/// 兑奖码使用状态过滤
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CodeStatus {
    Used,
    Unused,
}

/// 兑奖码查询参数
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct PrizeCodeQuery {
    /// 页码 (默认 1)
    pub page: Option<u32>,
    /// 每页数量 (默认 20)
    pub per_page: Option<u32>,
    pub prize_id: Option<i64>,
    pub status: Option<CodeStatus>,
    /// 创建日期起 (含, YYYY-MM-DD)
    pub start_date: Option<NaiveDate>,
    /// 创建日期止 (含, YYYY-MM-DD)
    pub end_date: Option<NaiveDate>,
}

/// 兑奖码列表项
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PrizeCodeResponse {
    pub id: i64,
    pub code: String,
    pub prize_id: i64,
    /// 奖品已删除时为空
    pub prize_name: Option<String>,
    pub is_used: bool,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl PrizeCodeResponse {
    pub fn new(m: prize_code_entity::Model, prize_name: Option<String>) -> Self {
        PrizeCodeResponse {
            id: m.id,
            code: m.code,
            prize_id: m.prize_id,
            prize_name,
            is_used: m.is_used,
            used_at: m.used_at,
            created_at: m.created_at,
        }
    }
}

/// 兑奖码分页响应
pub type PrizeCodePageResponse = PaginatedResponse<PrizeCodeResponse>;
