//! Identifier generation for newly created records.
use rand::RngExt;

use crate::clock::Clock;

/// Builds `<prefix>-<unix millis><4 hex digits>`; the suffix keeps two records
/// created within the same millisecond apart.
pub fn new_id(prefix: &str, clock: &dyn Clock) -> String {
    let mut rng = rand::rng();
    let suffix: u16 = rng.random_range(0..=u16::MAX);
    format!("{prefix}-{}{suffix:04x}", clock.now().timestamp_millis())
}
