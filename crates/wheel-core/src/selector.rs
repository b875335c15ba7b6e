// Outcome selection: where the wheel should stop, and which name sits under
// the pointer at a given rotation.

use rand::Rng;

/// Degrees in one revolution.
pub const FULL_TURN: f64 = 360.0;

/// Smallest random travel for one spin, in whole degrees.
pub const MIN_SPIN_DEGREES: u32 = 360;

/// Exclusive upper bound of the random travel (1.75 turns).
pub const MAX_SPIN_DEGREES: u32 = 630;

/// Fixed amount the accumulator advances per spin, independent of the draw.
pub const ACCUMULATOR_STEP: f64 = FULL_TURN * 1.75;

/// Where to send the wheel and what the accumulator becomes afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinTarget {
    pub target_angle: f64,
    pub next_accumulator: f64,
}

/// Pick the absolute rotation for the next spin.
///
/// Returns `None` for pools of fewer than two names: a single name is chosen
/// directly and an empty pool cannot spin.
pub fn compute_spin_target<R: Rng + ?Sized>(
    pool_size: usize,
    accumulator: f64,
    rng: &mut R,
) -> Option<SpinTarget> {
    if pool_size < 2 {
        return None;
    }
    let delta = rng.gen_range(MIN_SPIN_DEGREES..MAX_SPIN_DEGREES);
    Some(SpinTarget {
        target_angle: accumulator + f64::from(delta),
        next_accumulator: accumulator + ACCUMULATOR_STEP,
    })
}

/// Fold any angle into `[0, 360)`.
pub fn normalize(angle: f64) -> f64 {
    ((angle % FULL_TURN) + FULL_TURN) % FULL_TURN
}

/// Index of the slice under the pointer when the wheel rests at `angle`.
///
/// The wheel turns clockwise while slices are laid out counter-clockwise from
/// zero, so the rotation is mirrored before sampling the middle of a slice.
pub fn resolve_index(angle: f64, len: usize) -> Option<usize> {
    if len == 0 || !angle.is_finite() {
        return None;
    }
    let slice = FULL_TURN / len as f64;
    let adjusted = (FULL_TURN - normalize(angle) + slice / 2.0) % FULL_TURN;
    let index = (adjusted / slice).floor() as usize;
    Some(index.min(len - 1))
}

/// The name under the pointer at `angle`, or `None` for an empty wheel.
pub fn resolve_item(angle: f64, items: &[String]) -> Option<&str> {
    resolve_index(angle, items.len()).map(|i| items[i].as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("R{i}")).collect()
    }

    // ------------------------------------------------------------------
    // compute_spin_target
    // ------------------------------------------------------------------

    #[test]
    fn small_pools_do_not_spin() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(compute_spin_target(0, 0.0, &mut rng).is_none());
        assert!(compute_spin_target(1, 0.0, &mut rng).is_none());
    }

    #[test]
    fn target_travels_at_least_one_turn_and_under_one_and_three_quarters() {
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let acc = 1260.0;
            let t = compute_spin_target(5, acc, &mut rng).unwrap();
            let delta = t.target_angle - acc;
            assert!((360.0..630.0).contains(&delta), "seed {seed}: delta {delta}");
            assert_eq!(delta.fract(), 0.0);
            assert_eq!(t.next_accumulator, acc + 630.0);
        }
    }

    #[test]
    fn chained_targets_never_move_backward() {
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let first = compute_spin_target(3, 0.0, &mut rng).unwrap();
            let second = compute_spin_target(3, first.next_accumulator, &mut rng).unwrap();
            assert!(
                second.target_angle >= first.next_accumulator + MIN_SPIN_DEGREES as f64,
                "seed {seed}"
            );
            assert!(second.target_angle > first.target_angle);
        }
    }

    // ------------------------------------------------------------------
    // resolve_item
    // ------------------------------------------------------------------

    #[test]
    fn empty_wheel_resolves_to_nothing() {
        assert!(resolve_item(90.0, &[]).is_none());
    }

    #[test]
    fn non_finite_angle_resolves_to_nothing() {
        assert!(resolve_index(f64::NAN, 4).is_none());
        assert!(resolve_index(f64::INFINITY, 4).is_none());
    }

    #[test]
    fn always_returns_an_element() {
        let items = names(7);
        let mut angle = -2000.0;
        while angle < 2000.0 {
            let item = resolve_item(angle, &items).unwrap();
            assert!(items.iter().any(|n| n == item), "angle {angle}");
            angle += 13.37;
        }
    }

    #[test]
    fn periodic_in_full_turns() {
        let items = names(5);
        for step in 0..720 {
            let angle = step as f64 * 0.5 - 180.0;
            assert_eq!(
                resolve_item(angle, &items),
                resolve_item(angle + 360.0, &items),
                "angle {angle}"
            );
        }
    }

    #[test]
    fn two_items_switch_at_quarter_turns() {
        let items = names(2);
        assert_eq!(resolve_item(0.0, &items), Some("R0"));
        assert_eq!(resolve_item(90.0, &items), Some("R0"));
        assert_eq!(resolve_item(90.5, &items), Some("R1"));
        assert_eq!(resolve_item(180.0, &items), Some("R1"));
        assert_eq!(resolve_item(270.0, &items), Some("R1"));
        assert_eq!(resolve_item(270.5, &items), Some("R0"));
    }

    #[test]
    fn four_items_follow_clockwise_mirroring() {
        let items = names(4);
        assert_eq!(resolve_index(0.0, 4), Some(0));
        assert_eq!(resolve_index(90.0, 4), Some(3));
        assert_eq!(resolve_index(180.0, 4), Some(2));
        assert_eq!(resolve_index(270.0, 4), Some(1));
        assert_eq!(resolve_item(-90.0, &items), Some("R1"));
    }

    #[test]
    fn normalize_folds_negative_angles() {
        assert_eq!(normalize(-90.0), 270.0);
        assert_eq!(normalize(720.0), 0.0);
        assert_eq!(normalize(-720.0), 0.0);
    }
}
