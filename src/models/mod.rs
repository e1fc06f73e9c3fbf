pub mod common;
pub mod draw;
pub mod pagination;
pub mod prize;
pub mod prize_code;
pub mod settings;
pub mod stats;

pub use common::*;
pub use draw::*;
pub use pagination::*;
pub use prize::*;
pub use prize_code::*;
pub use settings::*;
pub use stats::*;
