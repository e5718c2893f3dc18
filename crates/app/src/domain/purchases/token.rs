//! Purchase token generation.

use rand::{RngCore, rngs::OsRng};

/// Purchase token prefix.
pub const PURCHASE_TOKEN_PREFIX: &str = "pt";

/// Number of random bytes encoded in a token.
pub const PURCHASE_TOKEN_BYTES: usize = 16;

const PURCHASE_TOKEN_HEX_CHARS: usize = PURCHASE_TOKEN_BYTES * 2;

/// Generate a fresh opaque purchase token, `pt_` followed by 32 lowercase hex characters.
#[must_use]
pub fn generate_purchase_token() -> String {
    let mut bytes = [0_u8; PURCHASE_TOKEN_BYTES];

    OsRng.fill_bytes(&mut bytes);

    format!("{PURCHASE_TOKEN_PREFIX}_{}", encode_hex(&bytes))
}

/// Whether `token` has the shape produced by [`generate_purchase_token`].
pub fn is_purchase_token(token: &str) -> bool {
    token
        .strip_prefix(PURCHASE_TOKEN_PREFIX)
        .and_then(|rest| rest.strip_prefix('_'))
        .is_some_and(|hex| {
            hex.len() == PURCHASE_TOKEN_HEX_CHARS
                && hex.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
        })
}

fn encode_hex(bytes: &[u8; PURCHASE_TOKEN_BYTES]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";

    let mut encoded = String::with_capacity(PURCHASE_TOKEN_HEX_CHARS);

    for byte in bytes {
        encoded.push(HEX[(byte >> 4) as usize] as char);
        encoded.push(HEX[(byte & 0x0f) as usize] as char);
    }

    encoded
}
