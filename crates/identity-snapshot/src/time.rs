//! Time primitives for the identity history.
//!
//! Snapshots carry two clocks: a Lamport time assigned by the chain
//! assembler to order versions causally, and a wall-clock Unix
//! timestamp in seconds. A zero wall-clock time means "unset".

/// Logical (Lamport) clock value used to order snapshots in a history.
///
/// Allocation and monotonicity are the chain assembler's concern; this
/// crate only carries the value.
pub type LamportTime = u64;

/// Return the current wall-clock time as Unix seconds.
pub fn now_unix_seconds() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock before Unix epoch")
        .as_secs() as i64
}
