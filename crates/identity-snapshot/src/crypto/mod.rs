//! Cryptographic helpers.
//!
//! - [`random`] — OS-sourced random bytes for snapshot nonces.

pub mod random;

pub use random::make_nonce;
