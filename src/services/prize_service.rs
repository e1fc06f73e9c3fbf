use crate::entities::prize_entity as prizes;
use crate::error::{AppError, AppResult};
use crate::models::{PrizeInput, PrizeResponse};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;

/// 读取启用奖品，按 position 升序 (id 作为次序兜底)
pub async fn fetch_active_prizes<C: ConnectionTrait>(db: &C) -> Result<Vec<prizes::Model>, DbErr> {
    prizes::Entity::find()
        .filter(prizes::Column::IsActive.eq(true))
        .order_by_asc(prizes::Column::Position)
        .order_by_asc(prizes::Column::Id)
        .all(db)
        .await
}

#[derive(Clone)]
pub struct PrizeService {
    pool: Arc<DatabaseConnection>,
}

impl PrizeService {
    pub fn new(pool: Arc<DatabaseConnection>) -> Self {
        Self { pool }
    }

    /// 启用奖品 (抽奖和前端展示共用)
    pub async fn list_active_prizes(&self) -> AppResult<Vec<prizes::Model>> {
        Ok(fetch_active_prizes(self.pool.as_ref()).await?)
    }

    /// 获取奖品列表（仅活动的）
    pub async fn list_prizes(&self) -> AppResult<Vec<PrizeResponse>> {
        let list = self.list_active_prizes().await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    /// 管理后台: 全部奖品，含停用
    pub async fn list_all_prizes(&self) -> AppResult<Vec<PrizeResponse>> {
        let list = prizes::Entity::find()
            .order_by_asc(prizes::Column::Position)
            .order_by_asc(prizes::Column::Id)
            .all(self.pool.as_ref())
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    pub async fn get_prize(&self, id: i64) -> AppResult<PrizeResponse> {
        let prize = self.find_prize(id).await?;
        Ok(prize.into())
    }

    pub async fn create_prize(&self, input: PrizeInput) -> AppResult<PrizeResponse> {
        input.validate()?;
        let now = Utc::now();
        let created = prizes::ActiveModel {
            name: Set(input.name.trim().to_string()),
            description: Set(input.description),
            image: Set(input.image),
            probability: Set(input.probability),
            position: Set(input.position),
            is_active: Set(input.is_active),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(self.pool.as_ref())
        .await?;

        log::info!("Prize created: id={} name={}", created.id, created.name);
        Ok(created.into())
    }

    /// 修改后的字段在下一次抽奖时生效
    pub async fn update_prize(&self, id: i64, input: PrizeInput) -> AppResult<PrizeResponse> {
        input.validate()?;
        let prize = self.find_prize(id).await?;

        let mut am = prize.into_active_model();
        am.name = Set(input.name.trim().to_string());
        am.description = Set(input.description);
        am.image = Set(input.image);
        am.probability = Set(input.probability);
        am.position = Set(input.position);
        am.is_active = Set(input.is_active);
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(self.pool.as_ref()).await?;

        log::info!("Prize updated: id={}", updated.id);
        Ok(updated.into())
    }

    /// 直接删除，不级联兑奖码
    pub async fn delete_prize(&self, id: i64) -> AppResult<()> {
        let res = prizes::Entity::delete_by_id(id).exec(self.pool.as_ref()).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Prize {id} not found")));
        }
        log::info!("Prize deleted: id={id}");
        Ok(())
    }

    async fn find_prize(&self, id: i64) -> AppResult<prizes::Model> {
        prizes::Entity::find_by_id(id)
            .one(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Prize {id} not found")))
    }
}
