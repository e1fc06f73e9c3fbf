pub mod code_generator;
pub mod weighted;

pub use code_generator::{
    PRIZE_CODE_ALPHABET, PRIZE_CODE_LENGTH, generate_prize_code, generate_prize_code_with,
};
pub use weighted::pick_weighted;
