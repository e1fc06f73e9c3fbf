pub mod draw_service;
pub mod prize_code_service;
pub mod prize_service;
pub mod settings_service;
pub mod stats_service;

pub use draw_service::*;
pub use prize_code_service::*;
pub use prize_service::*;
pub use settings_service::*;
pub use stats_service::*;
