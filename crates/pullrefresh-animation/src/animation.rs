//! Frame-driven tweens.
//!
//! A [`Tween`] holds at most one running animation. Every call that starts,
//! snaps or cancels bumps its [`AnimationGeneration`], so a caller holding the
//! generation of an earlier animation can tell its completion apart from the
//! completion of whatever replaced it.

use crate::Easing;

/// Trait for types that can be linearly interpolated.
pub trait Lerp {
    fn lerp(&self, target: &Self, fraction: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        self + (target - self) * fraction
    }
}

/// Animation specification combining duration and easing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpec {
    /// Duration in milliseconds.
    pub duration_millis: u64,
    /// Easing function to apply.
    pub easing: Easing,
}

impl AnimationSpec {
    /// Create a tween animation with duration and easing.
    pub fn tween(duration_millis: u64, easing: Easing) -> Self {
        Self {
            duration_millis,
            easing,
        }
    }

    /// Create a linear tween animation.
    pub fn linear(duration_millis: u64) -> Self {
        Self::tween(duration_millis, Easing::Linear)
    }
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self::tween(300, Easing::AccelerateDecelerate)
    }
}

/// Identifies one run of a [`Tween`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationGeneration(u64);

impl AnimationGeneration {
    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// One sampled frame of a running tween.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenFrame<T> {
    pub value: T,
    /// Eased progress in `[0, 1]`.
    pub fraction: f32,
    /// True on the frame that reached the target. The tween is idle afterwards.
    pub finished: bool,
    pub generation: AnimationGeneration,
}

/// Value animated from a start to a target over an [`AnimationSpec`].
#[derive(Debug, Clone)]
pub struct Tween<T: Lerp + Clone> {
    start: T,
    target: T,
    current: T,
    spec: AnimationSpec,
    start_time_nanos: Option<u64>,
    generation: AnimationGeneration,
    running: bool,
}

impl<T: Lerp + Clone> Tween<T> {
    pub fn new(initial: T) -> Self {
        Self {
            start: initial.clone(),
            target: initial.clone(),
            current: initial,
            spec: AnimationSpec::default(),
            start_time_nanos: None,
            generation: AnimationGeneration::default(),
            running: false,
        }
    }

    pub fn value(&self) -> T {
        self.current.clone()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Animate from `from` to `target`, replacing any running animation.
    ///
    /// The first frame delivered after this call becomes the start time, so
    /// it samples the `from` value.
    pub fn animate(&mut self, from: T, target: T, spec: AnimationSpec) -> AnimationGeneration {
        self.generation = self.generation.next();
        self.start = from.clone();
        self.current = from;
        self.target = target;
        self.spec = spec;
        self.start_time_nanos = None;
        self.running = true;
        self.generation
    }

    /// Jump to `value` without animating; any running animation is dropped.
    pub fn snap_to(&mut self, value: T) {
        self.generation = self.generation.next();
        self.start = value.clone();
        self.target = value.clone();
        self.current = value;
        self.start_time_nanos = None;
        self.running = false;
    }

    /// Stop where we are. The dropped animation never reports completion.
    pub fn cancel(&mut self) {
        if self.running {
            self.generation = self.generation.next();
            self.running = false;
            self.start_time_nanos = None;
        }
    }

    /// Advance to `frame_time_nanos`. Returns `None` while idle.
    pub fn on_frame(&mut self, frame_time_nanos: u64) -> Option<TweenFrame<T>> {
        if !self.running {
            return None;
        }
        let start_time = *self.start_time_nanos.get_or_insert(frame_time_nanos);
        let elapsed_nanos = frame_time_nanos.saturating_sub(start_time);
        let duration_nanos = (self.spec.duration_millis * 1_000_000).max(1);
        let linear_progress = (elapsed_nanos as f32 / duration_nanos as f32).clamp(0.0, 1.0);
        let finished = linear_progress >= 1.0;
        let fraction = if finished {
            1.0
        } else {
            self.spec.easing.transform(linear_progress)
        };

        self.current = if finished {
            self.target.clone()
        } else {
            self.start.lerp(&self.target, fraction)
        };

        if finished {
            self.start = self.target.clone();
            self.start_time_nanos = None;
            self.running = false;
        }

        Some(TweenFrame {
            value: self.current.clone(),
            fraction,
            finished,
            generation: self.generation,
        })
    }
}

#[cfg(test)]
#[path = "tests/animation_tests.rs"]
mod tests;
