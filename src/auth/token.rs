use rand::rngs::OsRng;
use rand::RngCore;

/// Raw entropy per session token: 32 bytes = 256 bits.
pub const TOKEN_BYTES: usize = 32;

/// Generate an opaque session token from the OS CSPRNG, rendered as hex.
///
/// 256 bits of entropy makes guessing or enumerating a valid token
/// computationally infeasible.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
