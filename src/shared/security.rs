//! Usage: Security-sensitive helpers (bearer-token masking and constant-time equality).

use subtle::ConstantTimeEq;

const MASK_PREFIX_CHARS: usize = 6;
const MASK_SUFFIX_CHARS: usize = 4;

/// Shorten a bearer token for log output, keeping only the edges.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.trim().chars().collect();
    if chars.len() <= MASK_PREFIX_CHARS + MASK_SUFFIX_CHARS {
        return "*".repeat(chars.len().min(8));
    }

    let prefix: String = chars[..MASK_PREFIX_CHARS].iter().collect();
    let suffix: String = chars[chars.len() - MASK_SUFFIX_CHARS..].iter().collect();
    format!("{prefix}...{suffix}")
}

/// Exact-match byte comparison that does not leak the position of the first
/// mismatch. Used for OAuth state validation.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
