//! Converts pass counts into points.

/// Points awarded per passing test case.
pub const POINTS_PER_PASS: f64 = 2.5;

/// Nominal maximum shown in the per-candidate summary line. Nothing clamps
/// to it: a reference suite with more than four cases scores past 10.
pub const NOMINAL_MAX: f64 = 10.0;

/// Score for a single assignment given its pass count.
pub fn score(passed: u64) -> f64 {
    passed as f64 * POINTS_PER_PASS
}
