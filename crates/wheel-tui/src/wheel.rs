// Terminal wheel: holds the slice labels, interpolates the rotation toward a
// requested target and reports where it came to rest.

use std::time::{Duration, Instant};

use wheel_core::selector;
use wheel_core::spin::RestEvent;

#[derive(Debug, Clone)]
struct Animation {
    generation: u64,
    from: f64,
    to: f64,
    started: Instant,
    duration: Duration,
}

/// The wheel as drawn on screen.
#[derive(Debug, Clone, Default)]
pub struct WheelAnimator {
    labels: Vec<String>,
    rotation: f64,
    animation: Option<Animation>,
}

impl WheelAnimator {
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Current rotation in degrees (not normalized).
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Start over with new slices at rotation zero. An animation in flight is
    /// dropped without a rest event.
    pub fn rebuild(&mut self, labels: Vec<String>) {
        self.labels = labels;
        self.rotation = 0.0;
        self.animation = None;
    }

    /// Begin turning toward `target` over `duration`.
    pub fn spin_to(&mut self, generation: u64, target: f64, duration: Duration, now: Instant) {
        self.animation = Some(Animation {
            generation,
            from: self.rotation,
            to: target,
            started: now,
            duration,
        });
    }

    /// Advance the animation to `now`. Returns the rest event on the tick the
    /// wheel reaches its target.
    pub fn tick(&mut self, now: Instant) -> Option<RestEvent> {
        let anim = self.animation.as_ref()?;
        let elapsed = now.saturating_duration_since(anim.started);
        if elapsed < anim.duration {
            let progress = elapsed.as_secs_f64() / anim.duration.as_secs_f64();
            self.rotation = anim.from + (anim.to - anim.from) * progress;
            return None;
        }

        let anim = self.animation.take()?;
        self.rotation = anim.to;
        let index = selector::resolve_index(anim.to, self.labels.len());
        Some(RestEvent {
            generation: anim.generation,
            item: index.map(|i| self.labels[i].clone()),
            index,
            rotation: Some(anim.to),
        })
    }

    /// Index of the slice under the pointer right now.
    pub fn pointer_index(&self) -> Option<usize> {
        selector::resolve_index(self.rotation, self.labels.len())
    }
}
