//! Token comparison helpers shared by the relay crates.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Constant-time comparison that leaks neither content nor length.
///
/// Both inputs are hashed to fixed-length SHA-256 digests first, then compared
/// with `subtle::ConstantTimeEq`. Used for bearer tokens such as the metrics
/// token, where the caller-supplied length is arbitrary.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let ha = Sha256::digest(a);
    let hb = Sha256::digest(b);
    ha.ct_eq(&hb).into()
}

/// Extract a `Bearer` token from an `Authorization` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    header.strip_prefix("Bearer ").map(str::trim)
}
