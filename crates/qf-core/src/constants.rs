//! Engine constants. All amounts are in one consistent, caller-defined unit.

/// Denominator threshold below which a tier is considered empty.
///
/// A gap sum at or below this value falls through to the score-proportional
/// tier; a score sum at or below it falls through to the even split. Values
/// this small are floating-point noise, not demonstrated support.
///
/// # Examples
///
/// ```
/// use qf_core::constants::SCORE_EPSILON;
/// assert!(SCORE_EPSILON > 0.0);
/// assert!(SCORE_EPSILON < 1e-6);
/// ```
pub const SCORE_EPSILON: f64 = 1e-9;

/// Relative tolerance for pool conservation checks.
///
/// `Σ matchAmount` must equal the pool to within this fraction of the pool
/// (or absolutely, for pools below 1.0).
pub const CONSERVATION_TOLERANCE: f64 = 1e-6;

/// Compare two amounts with [`CONSERVATION_TOLERANCE`] relative tolerance.
///
/// The tolerance scales with the larger magnitude and never drops below the
/// absolute tolerance, so comparisons near zero stay meaningful.
///
/// # Examples
///
/// ```
/// use qf_core::constants::approx_eq;
/// assert!(approx_eq(100.0, 100.000_000_1));
/// assert!(!approx_eq(100.0, 100.1));
/// assert!(approx_eq(0.0, 0.0));
/// ```
pub fn approx_eq(a: f64, b: f64) -> bool {
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= CONSERVATION_TOLERANCE * scale
}
