//! Secure random number generation.
//!
//! Uses the operating system's cryptographic random source via `rand`.
//! A failing entropy source is a broken execution environment, not a
//! recoverable data error, so these functions panic instead of
//! returning a `Result`.

use rand::RngCore;

/// Fill a buffer with cryptographically secure random bytes.
pub fn fill_random(buf: &mut [u8]) {
    rand::thread_rng().fill_bytes(buf);
}

/// Generate `len` cryptographically secure random bytes.
///
/// Used to pad entropy into a snapshot whose other fields might
/// otherwise collide with another identity's snapshot at the
/// content-hash level.
pub fn make_nonce(len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    fill_random(&mut buf);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_nonce_length() {
        assert_eq!(make_nonce(0).len(), 0);
        assert_eq!(make_nonce(20).len(), 20);
        assert_eq!(make_nonce(64).len(), 64);
    }

    #[test]
    fn test_make_nonce_not_zero() {
        let nonce = make_nonce(32);
        // Probability of all zeros is 2^-256; if this fails, something is very wrong
        assert!(nonce.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_make_nonce_unique() {
        assert_ne!(make_nonce(32), make_nonce(32));
    }
}
