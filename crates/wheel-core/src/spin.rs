// Spin cycle state machine: Idle -> Spinning -> Resting.
//
// Each wheel rebuild or spin bumps a generation counter. The rendering side
// echoes the generation back on its rest event, which lets the session drop
// rest events that belong to a wheel that no longer exists.

use rand::Rng;
use tracing::{debug, info};

use crate::selector::{self, SpinTarget};

/// Where the wheel is in its spin cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpinPhase {
    #[default]
    Idle,
    Spinning,
    Resting,
}

/// Completion signal from the wheel once an animation stops.
///
/// Any combination of fields may be present; see [`SpinSession::complete`]
/// for the order in which they are consulted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestEvent {
    pub generation: u64,
    pub item: Option<String>,
    pub index: Option<usize>,
    pub rotation: Option<f64>,
}

impl RestEvent {
    /// Rest event carrying only a final rotation.
    pub fn at_rotation(generation: u64, rotation: f64) -> Self {
        RestEvent {
            generation,
            rotation: Some(rotation),
            ..Default::default()
        }
    }
}

/// What the caller should do after a spin request.
#[derive(Debug, Clone, PartialEq)]
pub enum SpinRequest {
    /// Nothing to spin, or a spin is already in flight.
    Ignored,
    /// Single-name pool: that name is chosen without animating.
    Immediate(String),
    /// Animate the wheel to `target_angle` and report back with `generation`.
    Animate { generation: u64, target_angle: f64 },
}

/// How a rest event was taken by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestOutcome {
    /// No spin in flight, or the event belongs to an older wheel. Nothing
    /// changed.
    Stale,
    /// The wheel landed on this name; the phase is now `Resting`.
    Landed(String),
    /// The payload named no slice; the phase is back to `Idle`.
    Unresolved,
}

impl RestOutcome {
    pub fn winner(&self) -> Option<&str> {
        match self {
            RestOutcome::Landed(name) => Some(name),
            _ => None,
        }
    }
}

/// One wheel's spin state. Owns the labels the wheel was last built with.
#[derive(Debug, Clone, Default)]
pub struct SpinSession {
    phase: SpinPhase,
    accumulator: f64,
    items: Vec<String>,
    generation: u64,
    last_target: Option<f64>,
}

impl SpinSession {
    pub fn new(items: Vec<String>) -> Self {
        SpinSession {
            items,
            ..Default::default()
        }
    }

    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_spinning(&self) -> bool {
        self.phase == SpinPhase::Spinning
    }

    /// Replace the wheel's labels after a pool change. Slice boundaries move,
    /// so the accumulator starts over and any in-flight spin is abandoned.
    pub fn rebuild(&mut self, items: Vec<String>) {
        if self.is_spinning() {
            info!("Wheel rebuilt mid-spin; dropping spin {}", self.generation);
        }
        self.items = items;
        self.accumulator = 0.0;
        self.phase = SpinPhase::Idle;
        self.generation += 1;
        self.last_target = None;
        debug!(
            "Wheel rebuilt with {} slices (generation {})",
            self.items.len(),
            self.generation
        );
    }

    /// Start a spin if one is allowed.
    pub fn request_spin<R: Rng + ?Sized>(&mut self, rng: &mut R) -> SpinRequest {
        if self.is_spinning() {
            debug!("Spin requested while spinning; ignored");
            return SpinRequest::Ignored;
        }
        match self.items.len() {
            0 => SpinRequest::Ignored,
            1 => {
                self.phase = SpinPhase::Resting;
                SpinRequest::Immediate(self.items[0].clone())
            }
            n => {
                let Some(SpinTarget {
                    target_angle,
                    next_accumulator,
                }) = selector::compute_spin_target(n, self.accumulator, rng)
                else {
                    return SpinRequest::Ignored;
                };
                self.accumulator = next_accumulator;
                self.generation += 1;
                self.last_target = Some(target_angle);
                self.phase = SpinPhase::Spinning;
                info!(
                    "Spin {} toward {:.0} degrees across {} slices",
                    self.generation, target_angle, n
                );
                SpinRequest::Animate {
                    generation: self.generation,
                    target_angle,
                }
            }
        }
    }

    /// Finish the in-flight spin.
    ///
    /// Payload priority: direct label, then index into the current labels,
    /// then the reported rotation, then the target the spin was sent to.
    pub fn complete(&mut self, event: &RestEvent) -> RestOutcome {
        if !self.is_spinning() || event.generation != self.generation {
            debug!(
                "Dropping stale rest event (event generation {}, current {})",
                event.generation, self.generation
            );
            return RestOutcome::Stale;
        }

        match self.resolve(event) {
            Some(name) => {
                self.phase = SpinPhase::Resting;
                RestOutcome::Landed(name)
            }
            None => {
                self.phase = SpinPhase::Idle;
                RestOutcome::Unresolved
            }
        }
    }

    /// Leave `Resting` once the selection is consumed or discarded.
    pub fn settle_idle(&mut self) {
        if self.phase == SpinPhase::Resting {
            self.phase = SpinPhase::Idle;
        }
    }

    fn resolve(&self, event: &RestEvent) -> Option<String> {
        if let Some(label) = event.item.as_deref().filter(|l| !l.trim().is_empty()) {
            return Some(label.to_string());
        }
        if let Some(name) = event.index.and_then(|i| self.items.get(i)) {
            return Some(name.clone());
        }
        event
            .rotation
            .filter(|r| r.is_finite())
            .or(self.last_target)
            .and_then(|angle| selector::resolve_item(angle, &self.items))
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session(list: &[&str]) -> SpinSession {
        SpinSession::new(list.iter().map(|s| s.to_string()).collect())
    }

    fn start(s: &mut SpinSession) -> (u64, f64) {
        let mut rng = StdRng::seed_from_u64(42);
        match s.request_spin(&mut rng) {
            SpinRequest::Animate {
                generation,
                target_angle,
            } => (generation, target_angle),
            other => panic!("expected animation, got {other:?}"),
        }
    }

    // ------------------------------------------------------------------
    // request_spin
    // ------------------------------------------------------------------

    #[test]
    fn empty_wheel_ignores_spin() {
        let mut s = session(&[]);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(s.request_spin(&mut rng), SpinRequest::Ignored);
        assert_eq!(s.phase(), SpinPhase::Idle);
    }

    #[test]
    fn single_item_resolves_without_animation() {
        let mut s = session(&["Only"]);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            s.request_spin(&mut rng),
            SpinRequest::Immediate("Only".into())
        );
        assert_eq!(s.phase(), SpinPhase::Resting);
        assert_eq!(s.accumulator(), 0.0);
    }

    #[test]
    fn spin_while_spinning_is_ignored() {
        let mut s = session(&["A", "B", "C"]);
        let (generation, _) = start(&mut s);
        let acc = s.accumulator();

        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(s.request_spin(&mut rng), SpinRequest::Ignored);
        assert_eq!(s.generation(), generation);
        assert_eq!(s.accumulator(), acc);
    }

    #[test]
    fn spin_advances_accumulator_by_fixed_step() {
        let mut s = session(&["A", "B"]);
        let (g, target) = start(&mut s);
        assert_eq!(s.accumulator(), selector::ACCUMULATOR_STEP);
        s.complete(&RestEvent::at_rotation(g, target));

        let (_, second) = start(&mut s);
        assert!(second >= selector::ACCUMULATOR_STEP + 360.0);
        assert_eq!(s.accumulator(), 2.0 * selector::ACCUMULATOR_STEP);
    }

    #[test]
    fn spin_is_allowed_from_resting() {
        let mut s = session(&["A", "B"]);
        let (g, target) = start(&mut s);
        assert!(s.complete(&RestEvent::at_rotation(g, target)).winner().is_some());
        assert_eq!(s.phase(), SpinPhase::Resting);
        start(&mut s);
        assert!(s.is_spinning());
    }

    #[test]
    fn rebuild_resets_accumulator_and_phase() {
        let mut s = session(&["A", "B"]);
        start(&mut s);
        s.rebuild(vec!["X".into(), "Y".into(), "Z".into()]);
        assert_eq!(s.phase(), SpinPhase::Idle);
        assert_eq!(s.accumulator(), 0.0);
        assert_eq!(s.items().len(), 3);
    }

    // ------------------------------------------------------------------
    // complete
    // ------------------------------------------------------------------

    #[test]
    fn rotation_resolves_through_selector() {
        let mut s = session(&["A", "B", "C", "D"]);
        let (g, _) = start(&mut s);
        let winner = s.complete(&RestEvent::at_rotation(g, 90.0 + 720.0));
        assert_eq!(winner, RestOutcome::Landed("D".into()));
        assert_eq!(s.phase(), SpinPhase::Resting);
    }

    #[test]
    fn label_beats_conflicting_rotation() {
        let mut s = session(&["A", "B", "C", "D"]);
        let (g, _) = start(&mut s);
        let event = RestEvent {
            generation: g,
            item: Some("B".into()),
            index: Some(2),
            rotation: Some(0.0),
        };
        assert_eq!(s.complete(&event).winner(), Some("B"));
    }

    #[test]
    fn index_beats_rotation() {
        let mut s = session(&["A", "B", "C"]);
        let (g, _) = start(&mut s);
        let event = RestEvent {
            generation: g,
            index: Some(2),
            rotation: Some(0.0),
            ..Default::default()
        };
        assert_eq!(s.complete(&event).winner(), Some("C"));
    }

    #[test]
    fn out_of_range_index_falls_through_to_rotation() {
        let mut s = session(&["A", "B", "C", "D"]);
        let (g, _) = start(&mut s);
        let event = RestEvent {
            generation: g,
            index: Some(99),
            rotation: Some(0.0),
            ..Default::default()
        };
        assert_eq!(s.complete(&event).winner(), Some("A"));
    }

    #[test]
    fn empty_payload_falls_back_to_requested_target() {
        let mut s = session(&["A", "B", "C"]);
        let (g, target) = start(&mut s);
        let expected = selector::resolve_item(target, s.items()).map(str::to_string);
        let event = RestEvent {
            generation: g,
            item: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(s.complete(&event).winner(), expected.as_deref());
    }

    #[test]
    fn stale_generation_is_dropped() {
        let mut s = session(&["A", "B"]);
        let (g, target) = start(&mut s);
        s.rebuild(vec!["A".into(), "B".into(), "C".into()]);
        assert_eq!(
            s.complete(&RestEvent::at_rotation(g, target)),
            RestOutcome::Stale
        );
        assert_eq!(s.phase(), SpinPhase::Idle);
    }

    #[test]
    fn rest_event_without_spin_is_dropped() {
        let mut s = session(&["A", "B"]);
        let g = s.generation();
        assert_eq!(s.complete(&RestEvent::at_rotation(g, 0.0)), RestOutcome::Stale);
        assert_eq!(s.phase(), SpinPhase::Idle);
    }

    #[test]
    fn settle_idle_only_leaves_resting() {
        let mut s = session(&["A", "B"]);
        start(&mut s);
        s.settle_idle();
        assert!(s.is_spinning());

        let mut single = session(&["Only"]);
        let mut rng = StdRng::seed_from_u64(0);
        let _ = single.request_spin(&mut rng);
        single.settle_idle();
        assert_eq!(single.phase(), SpinPhase::Idle);
    }
}
