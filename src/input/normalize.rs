//! Raw axis normalization.
//!
//! The signed 16-bit range is asymmetric (-32768..=32767), so the negative
//! and non-negative halves use different divisors. A single divisor would
//! either overshoot -1.0 or never reach 1.0.

/// Map a raw signed 16-bit axis sample to [-1.0, 1.0].
pub fn normalize_axis(raw: i16) -> f32 {
    if raw < 0 {
        (f32::from(raw) / 32768.0).max(-1.0)
    } else {
        (f32::from(raw) / 32767.0).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremes_hit_unit_bounds() {
        assert_eq!(normalize_axis(i16::MIN), -1.0);
        assert_eq!(normalize_axis(i16::MAX), 1.0);
        assert_eq!(normalize_axis(0), 0.0);
    }

    #[test]
    fn whole_range_stays_in_unit_interval() {
        for raw in (i16::MIN..=i16::MAX).step_by(97) {
            let v = normalize_axis(raw);
            assert!((-1.0..=1.0).contains(&v), "raw {} gave {}", raw, v);
        }
    }

    #[test]
    fn monotonic_non_decreasing() {
        let mut prev = normalize_axis(i16::MIN);
        for raw in (i16::MIN + 1..=i16::MAX).step_by(61) {
            let v = normalize_axis(raw);
            assert!(v >= prev, "normalize({}) = {} < {}", raw, v, prev);
            prev = v;
        }
    }
}
