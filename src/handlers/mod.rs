pub mod admin;
pub mod draw;
pub mod prize;
pub mod prize_code;
pub mod settings;
pub mod stats;

pub use admin::admin_config;
pub use draw::draw_config;
pub use prize::prize_config;
pub use settings::settings_config;
