use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::prize_entity;
use crate::error::{AppError, AppResult};

/// 奖品位置范围 (前端 12 宫格)
pub const MIN_POSITION: i32 = 1;
pub const MAX_POSITION: i32 = 12;
/// 管理后台允许填写的最大权重
pub const MAX_PROBABILITY: f64 = 100.0;

/// 奖品信息响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PrizeResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    /// 相对权重
    pub probability: f64,
    /// 前端布局位置 (1-12)
    pub position: i32,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<prize_entity::Model> for PrizeResponse {
    fn from(m: prize_entity::Model) -> Self {
        PrizeResponse {
            id: m.id,
            name: m.name,
            description: m.description,
            image: m.image,
            probability: m.probability,
            position: m.position,
            is_active: m.is_active,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// 创建 / 更新奖品请求
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct PrizeInput {
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub probability: f64,
    pub position: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl PrizeInput {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::ValidationError("Prize name is required".into()));
        }
        if !self.probability.is_finite()
            || self.probability < 0.0
            || self.probability > MAX_PROBABILITY
        {
            return Err(AppError::ValidationError(
                "Probability must be between 0 and 100".into(),
            ));
        }
        if !(MIN_POSITION..=MAX_POSITION).contains(&self.position) {
            return Err(AppError::ValidationError(
                "Position must be between 1 and 12".into(),
            ));
        }
        Ok(())
    }
}
