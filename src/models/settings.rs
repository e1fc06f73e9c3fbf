use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{Theme, settings_entity};
use crate::error::{AppError, AppResult};

/// 前端展示配置 (读写共用)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct SettingsPayload {
    pub title: String,
    pub description: Option<String>,
    pub button_text: String,
    pub background_image: Option<String>,
    pub background_music: Option<String>,
    pub search_button: Option<String>,
    pub inner_background: Option<String>,
    pub spin_button: Option<String>,
    #[serde(default = "default_theme")]
    pub theme: Theme,
}

fn default_theme() -> Theme {
    Theme::Default
}

impl Default for SettingsPayload {
    fn default() -> Self {
        SettingsPayload {
            title: "Lucky Prize Draw".to_string(),
            description: None,
            button_text: "SPIN".to_string(),
            background_image: None,
            background_music: None,
            search_button: None,
            inner_background: None,
            spin_button: None,
            theme: Theme::Default,
        }
    }
}

impl SettingsPayload {
    pub fn validate(&self) -> AppResult<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::ValidationError("Title is required".into()));
        }
        if self.button_text.trim().is_empty() {
            return Err(AppError::ValidationError("Button text is required".into()));
        }
        Ok(())
    }
}

impl From<settings_entity::Model> for SettingsPayload {
    fn from(m: settings_entity::Model) -> Self {
        SettingsPayload {
            title: m.title,
            description: m.description,
            button_text: m.button_text,
            background_image: m.background_image,
            background_music: m.background_music,
            search_button: m.search_button,
            inner_background: m.inner_background,
            spin_button: m.spin_button,
            theme: m.theme,
        }
    }
}
