//! Short code generation and validation.
//!
//! Generators are pure: they know nothing about which codes are already
//! taken. Collisions are resolved by the caller retrying against storage.

use rand::RngExt;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Length of every auto-generated code.
pub const GENERATED_CODE_LENGTH: usize = 6;

pub const MIN_CODE_LENGTH: usize = 6;
pub const MAX_CODE_LENGTH: usize = 8;

/// Path segments served by fixed routes; a link stored under one of these
/// would be shadowed and never redirect.
pub const RESERVED_CODES: &[&str] = &["healthz"];

/// Source of candidate short codes.
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Uniform random codes over `[A-Za-z0-9]`, always [`GENERATED_CODE_LENGTH`] long.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        generate_short_code()
    }
}

pub fn generate_short_code() -> String {
    let mut rng = rand::rng();
    (0..GENERATED_CODE_LENGTH)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Whether `code` matches `^[A-Za-z0-9]{6,8}$`.
pub fn is_valid_short_code(code: &str) -> bool {
    (MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&code.len())
        && code.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Whether `code` collides with a fixed route. Matching is case-sensitive,
/// like routing.
pub fn is_reserved_code(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}
