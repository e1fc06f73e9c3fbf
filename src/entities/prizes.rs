use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 奖品配置实体
/// 概念说明:
/// - probability: 相对权重 (不是百分比)，抽奖时按启用奖品的权重之和归一化
/// - position: 1-12，仅用于前端布局
/// - is_active: 只有启用的奖品参与随机抽奖
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "prizes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// 奖品图片 URL (资源由外部存储托管)
    pub image: Option<String>,
    pub probability: f64,
    pub position: i32,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
