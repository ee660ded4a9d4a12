use fixed::types::I32F32;

/// Q32.32 fixed-point: 32 integer bits, 32 fractional bits.
///
/// Every material quantity, rate and capacity in the simulation uses this
/// type so that two runs with the same inputs agree bit for bit.
pub type Fixed64 = I32F32;

/// Simulated minutes. One tick advances the clock by exactly one minute.
pub type Minutes = u64;

/// Convert an f64 to Fixed64. Use only for initialization, never in sim loop.
///
/// Panics on NaN or infinity, and on values outside the Q32.32 range when
/// debug assertions are on. Untrusted input goes through
/// [`checked_f64_to_fixed64`].
#[inline]
pub fn f64_to_fixed64(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

/// Convert an f64 to Fixed64, or `None` for NaN, infinities and values
/// outside roughly ±2.147e9.
#[inline]
pub fn checked_f64_to_fixed64(v: f64) -> Option<Fixed64> {
    if v.is_finite() {
        Fixed64::checked_from_num(v)
    } else {
        None
    }
}

/// Convert Fixed64 to f64. Use only for display.
#[inline]
pub fn fixed64_to_f64(v: Fixed64) -> f64 {
    v.to_num::<f64>()
}

/// Convert a minute count to Fixed64, saturating at `Fixed64::MAX`.
#[inline]
pub fn minutes_to_fixed64(minutes: Minutes) -> Fixed64 {
    Fixed64::saturating_from_num(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed64_basic_arithmetic() {
        let a = f64_to_fixed64(1.5);
        let b = f64_to_fixed64(2.0);
        assert_eq!(fixed64_to_f64(a + b), 3.5);
    }

    #[test]
    fn fixed64_determinism() {
        let a = f64_to_fixed64(14.017);
        let b = f64_to_fixed64(14.017);
        assert_eq!(a, b);
        assert_eq!(a * f64_to_fixed64(1.6), b * f64_to_fixed64(1.6));
    }

    #[test]
    fn minutes_conversion_saturates() {
        assert_eq!(minutes_to_fixed64(10), Fixed64::from_num(10));
        assert_eq!(minutes_to_fixed64(u64::MAX), Fixed64::MAX);
    }

    #[test]
    fn checked_conversion_rejects_unrepresentable() {
        assert_eq!(checked_f64_to_fixed64(f64::NAN), None);
        assert_eq!(checked_f64_to_fixed64(f64::INFINITY), None);
        assert_eq!(checked_f64_to_fixed64(f64::NEG_INFINITY), None);
        assert_eq!(checked_f64_to_fixed64(5e9), None);
        assert_eq!(checked_f64_to_fixed64(-5e9), None);
        assert_eq!(
            checked_f64_to_fixed64(206000.0),
            Some(Fixed64::from_num(206000))
        );
        assert_eq!(checked_f64_to_fixed64(2.0e9), Some(Fixed64::from_num(2_000_000_000)));
    }

    #[test]
    fn display_conversion_is_close() {
        let v = f64_to_fixed64(42.733);
        assert!((fixed64_to_f64(v) - 42.733).abs() < 1e-6);
    }
}
