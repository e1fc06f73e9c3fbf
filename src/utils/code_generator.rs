use rand::Rng;

/// 兑奖码字符表: A-Z, a-z, 1-9 (不含数字 0)，共 61 个字符
/// 与已发放兑奖码的格式保持一致，不可修改
pub const PRIZE_CODE_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz123456789";

/// 兑奖码长度
pub const PRIZE_CODE_LENGTH: usize = 10;

/// 生成一个 10 位兑奖码
pub fn generate_prize_code() -> String {
    generate_prize_code_with(&mut rand::thread_rng())
}

/// 使用指定随机源生成兑奖码，每位独立均匀取自字符表
pub fn generate_prize_code_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..PRIZE_CODE_LENGTH)
        .map(|_| PRIZE_CODE_ALPHABET[rng.gen_range(0..PRIZE_CODE_ALPHABET.len())] as char)
        .collect()
}
