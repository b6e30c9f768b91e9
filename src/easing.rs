use std::f64::consts::PI;

/// Sinusoidal ease-in-out from `min` to `max` over `[0, total]`.
///
/// `total` must be positive. Returns `min` at `elapsed == 0` and `max` at
/// `elapsed == total`.
pub fn ease_in_out(elapsed: f64, total: f64, min: i64, max: i64) -> i64 {
    let delta = (max - min) as f64;
    let eased = -(delta / 2.0) * ((elapsed * PI / total).cos() - 1.0) + min as f64;
    eased.round() as i64
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use proptest::prelude::*;

    #[test]
    fn ease_in_out__midpoint_is_halfway() {
        assert_eq!(50, ease_in_out(500.0, 1000.0, 0, 100));
        assert_eq!(-50, ease_in_out(1.0, 2.0, 0, -100));
    }

    #[test]
    fn ease_in_out__starts_slow() {
        let early = ease_in_out(100.0, 1000.0, 0, 1000);
        let middle = ease_in_out(500.0, 1000.0, 0, 1000) - ease_in_out(400.0, 1000.0, 0, 1000);
        assert!(early < middle);
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 200, .. ProptestConfig::default() })]

        #[test]
        fn ease_in_out__hits_both_ends(
            total in 1u32..100_000,
            min in -1_000_000i64..1_000_000,
            max in -1_000_000i64..1_000_000,
        ) {
            let total = total as f64;
            prop_assert_eq!(min, ease_in_out(0.0, total, min, max));
            prop_assert_eq!(max, ease_in_out(total, total, min, max));
        }
    }
}
