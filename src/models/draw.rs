use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::prize_entity;

/// 抽奖请求，code 为空时走随机抽奖
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct DrawRequest {
    pub code: Option<String>,
}

/// 抽奖 / 核验结果 (不落库)
///
/// `is_winner == true` 时 `prize_id` 指向解析时仍存在的奖品。
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DrawResult {
    pub is_winner: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prize_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prize_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prize_image: Option<String>,
    pub message: String,
    /// 回显请求中的兑奖码
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl DrawResult {
    pub fn winner(prize: prize_entity::Model, code: Option<String>) -> Self {
        let message = format!("Congratulations! You've won {}!", prize.name);
        Self::for_prize(prize, message, code)
    }

    pub fn for_prize(prize: prize_entity::Model, message: String, code: Option<String>) -> Self {
        DrawResult {
            is_winner: true,
            prize_id: Some(prize.id),
            prize_name: Some(prize.name),
            prize_image: prize.image,
            message,
            code,
        }
    }

    pub fn no_prize(message: String, code: Option<String>) -> Self {
        DrawResult {
            is_winner: false,
            prize_id: None,
            prize_name: None,
            prize_image: None,
            message,
            code,
        }
    }
}
