use std::fmt::Write;

use sha2::{Digest, Sha256};
use taskhub_core::{AppError, AppResult};

/// Random bytes in one bearer token.
const TOKEN_BYTES: usize = 32;

/// Issues a random bearer token. Returns `(raw_token_hex, sha256_hex)`.
pub(super) fn generate_token() -> AppResult<(String, String)> {
    let mut bytes = [0u8; TOKEN_BYTES];
    getrandom::fill(&mut bytes)
        .map_err(|error| AppError::Internal(format!("failed to generate access token: {error}")))?;

    let raw_token = to_hex(&bytes);
    let digest = hash_token(&raw_token);
    Ok((raw_token, digest))
}

/// Storage digest of a raw token.
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

#[cfg(test)]
mod tests {
    use super::{generate_token, hash_token};

    #[test]
    fn generated_tokens_are_hex_and_hash_consistently() {
        let (raw, digest) = generate_token().unwrap_or_else(|error| panic!("{error}"));

        assert_eq!(raw.len(), 64);
        assert!(raw.chars().all(|character| character.is_ascii_hexdigit()));
        assert_eq!(digest, hash_token(&raw));
        assert_ne!(digest, raw);
    }

    #[test]
    fn hash_matches_known_sha256_vector() {
        assert_eq!(
            hash_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
