use crate::entities::{SETTINGS_ID, settings_entity as settings};
use crate::error::AppResult;
use crate::models::SettingsPayload;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, Set};
use std::sync::Arc;

#[derive(Clone)]
pub struct SettingsService {
    pool: Arc<DatabaseConnection>,
}

impl SettingsService {
    pub fn new(pool: Arc<DatabaseConnection>) -> Self {
        Self { pool }
    }

    /// 读取展示配置，尚未保存过时返回默认值
    pub async fn get_settings(&self) -> AppResult<SettingsPayload> {
        let row = settings::Entity::find_by_id(SETTINGS_ID)
            .one(self.pool.as_ref())
            .await?;
        Ok(row.map(Into::into).unwrap_or_default())
    }

    /// 保存展示配置 (单行 upsert)
    pub async fn save_settings(&self, payload: SettingsPayload) -> AppResult<SettingsPayload> {
        payload.validate()?;

        let am = settings::ActiveModel {
            id: Set(SETTINGS_ID),
            title: Set(payload.title.clone()),
            description: Set(payload.description.clone()),
            button_text: Set(payload.button_text.clone()),
            background_image: Set(payload.background_image.clone()),
            background_music: Set(payload.background_music.clone()),
            search_button: Set(payload.search_button.clone()),
            inner_background: Set(payload.inner_background.clone()),
            spin_button: Set(payload.spin_button.clone()),
            theme: Set(payload.theme),
            updated_at: Set(Some(Utc::now())),
        };

        settings::Entity::insert(am)
            .on_conflict(
                OnConflict::column(settings::Column::Id)
                    .update_columns([
                        settings::Column::Title,
                        settings::Column::Description,
                        settings::Column::ButtonText,
                        settings::Column::BackgroundImage,
                        settings::Column::BackgroundMusic,
                        settings::Column::SearchButton,
                        settings::Column::InnerBackground,
                        settings::Column::SpinButton,
                        settings::Column::Theme,
                        settings::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.pool.as_ref())
            .await?;

        log::info!("Settings saved (theme={})", payload.theme);
        Ok(payload)
    }
}
