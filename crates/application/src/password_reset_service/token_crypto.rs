use std::fmt::Write;

use sha2::{Digest, Sha256};

use super::*;

/// Generates a random token and its SHA-256 hash, both hex encoded.
pub(super) fn generate_token() -> AppResult<(String, String)> {
    let mut bytes = [0u8; 32];
    getrandom::fill(&mut bytes)
        .map_err(|error| AppError::Internal(format!("failed to generate reset token: {error}")))?;

    let raw_token = to_hex(&bytes);
    let hash = hash_token(&raw_token);
    Ok((raw_token, hash))
}

/// Computes the stored form of a raw token.
pub(super) fn hash_token(raw_token: &str) -> String {
    to_hex(&Sha256::digest(raw_token.as_bytes()))
}

fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .fold(String::with_capacity(bytes.len() * 2), |mut output, byte| {
            let _ = write!(output, "{byte:02x}");
            output
        })
}
