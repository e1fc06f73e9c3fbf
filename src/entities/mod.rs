pub mod prize_codes;
pub mod prizes;
pub mod settings;

pub use prize_codes as prize_code_entity;
pub use prizes as prize_entity;
pub use settings as settings_entity;
pub use settings::{SETTINGS_ID, Theme};
