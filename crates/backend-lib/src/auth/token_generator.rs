// ============================
// crates/backend-lib/src/auth/token_generator.rs
// ============================
//! Session token generation.
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{rngs::OsRng, RngCore};

/// Entropy per session token (32 bytes = 256 bits)
pub const TOKEN_BYTES: usize = 32;

/// Length of an encoded token: base64url without padding of `TOKEN_BYTES`
pub const TOKEN_LEN: usize = 43;

/** Generate an opaque session token.
Bytes come straight from the operating system CSPRNG, so tokens cannot be
predicted from earlier ones or reproduced by another process.
# Returns
A base64 URL-safe encoded string without padding */
pub fn generate_session_token() -> String {
    let mut buffer = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut buffer);
    URL_SAFE_NO_PAD.encode(buffer)
}
