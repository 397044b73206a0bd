use approx::abs_diff_eq;
use tpi_types::TrainTeeth;

/// One 1/1024 inch expressed in millimetres. An effective tooth count that
/// is a whole multiple of this cuts exact inch-fractional threads on a
/// metric leadscrew.
pub const INCH_FRACTION: f64 = 25.4 / 1024.0;

const FRACTION_TOLERANCE: f64 = 1e-8;

/// Equivalent spindle gear size presented to the lathe: `S/P * I/M * N`.
///
/// The idler and output gears only close the loop and do not change the
/// ratio.
pub fn effective_teeth(teeth: &TrainTeeth) -> f64 {
    teeth.spindle as f64 / teeth.input as f64 * teeth.inch as f64 / teeth.third as f64
        * teeth.fourth as f64
}

/// Whether `z` is a whole multiple of [`INCH_FRACTION`].
pub fn is_inch_fractional(z: f64) -> bool {
    let steps = z / INCH_FRACTION;
    abs_diff_eq!(
        (steps - steps.round()) * INCH_FRACTION,
        0.0,
        epsilon = FRACTION_TOLERANCE
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_effective_teeth() {
        let teeth = TrainTeeth::derive(56, 140, 127, 40, 35).unwrap();
        let z = effective_teeth(&teeth);
        assert!((z - 44.45).abs() < 1e-12, "z = {z}");
        assert!(is_inch_fractional(z));
    }

    #[test]
    fn test_idler_does_not_change_ratio() {
        let a = TrainTeeth::derive(56, 140, 127, 40, 35).unwrap();
        let mut b = a;
        b.idler += 10;
        b.output -= 10;
        assert_eq!(effective_teeth(&a), effective_teeth(&b));
    }

    #[test]
    fn test_not_inch_fractional() {
        // 56/141 * 127/40 * 35
        let teeth = TrainTeeth::derive(56, 141, 127, 40, 35).unwrap();
        assert!(!is_inch_fractional(effective_teeth(&teeth)));
        assert!(is_inch_fractional(INCH_FRACTION * 1792.0));
        assert!(is_inch_fractional(0.0));
    }
}
