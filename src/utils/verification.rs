use rand::Rng;

pub const CODE_MIN: u32 = 100_000;
pub const CODE_MAX: u32 = 999_999;

/// A uniformly random six-digit code.
pub fn generate_code() -> u32 {
    rand::thread_rng().gen_range(CODE_MIN..=CODE_MAX)
}

/// Codes are always mailed as six digits.
pub fn format_code(code: u32) -> String {
    format!("{:06}", code)
}
