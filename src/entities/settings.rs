use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[sea_orm(string_value = "default")]
    Default,
    #[sea_orm(string_value = "festive")]
    Festive,
    #[sea_orm(string_value = "elegant")]
    Elegant,
    #[sea_orm(string_value = "playful")]
    Playful,
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Default => write!(f, "default"),
            Theme::Festive => write!(f, "festive"),
            Theme::Elegant => write!(f, "elegant"),
            Theme::Playful => write!(f, "playful"),
        }
    }
}

/// 展示配置 (单行, id 固定为 1)
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub button_text: String,
    pub background_image: Option<String>,
    pub background_music: Option<String>,
    pub search_button: Option<String>,
    pub inner_background: Option<String>,
    pub spin_button: Option<String>,
    pub theme: Theme,
    pub updated_at: Option<DateTime<Utc>>,
}

/// 单行配置的固定主键
pub const SETTINGS_ID: i64 = 1;

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
