#![forbid(unsafe_code)]

//! Sheet open/close animation.
//!
//! A [`SheetAnimation`] drives one presentation value, `progress`, where
//! `1.0` is fully open at the active snap point and `0.0` is fully closed.
//!
//! # Example
//!
//! ```ignore
//! let config = SheetAnimationConfig::default();
//! let mut anim = SheetAnimation::new();
//!
//! anim.start_opening(&config);
//! while anim.is_animating() {
//!     if let Some((prev, curr)) = anim.tick(frame_time) {
//!         // emit a transition event
//!     }
//! }
//! ```
//!
//! # Invariants
//!
//! - Progress is always in [0.0, 1.0].
//! - Retargeting (close while opening, open while closing) starts from the
//!   progress value read at that moment, so the curve never jumps.
//! - Segment duration is scaled by the distance left to travel, so speed is
//!   the same whether a transition starts from 0, 1, or somewhere between.
//!
//! # Failure Modes
//!
//! - Zero-duration animations complete on the next tick.
//! - NaN progress from a drag is treated as 0.

use std::time::Duration;

// ============================================================================
// Animation Phase
// ============================================================================

/// Lifecycle phase of a sheet.
///
/// State machine: Mounted → Opening → Open → Closing → Closed
///
/// Rapid toggling can skip phases (Opening → Closing directly). A user drag
/// holds the sheet in `Dragging` until release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SheetPhase {
    /// Mounted but never presented. Progress is 0.
    #[default]
    Mounted,
    /// Animating toward the open position.
    Opening,
    /// Fully presented at the active snap point.
    Open,
    /// Held by a user gesture; progress follows the finger.
    Dragging,
    /// Animating toward closed.
    Closing,
    /// Fully closed; eligible for unmount.
    Closed,
}

impl SheetPhase {
    /// Check if the sheet should be drawn.
    #[inline]
    pub fn is_visible(self) -> bool {
        !matches!(self, Self::Mounted | Self::Closed)
    }

    /// Check if an animation is in flight.
    #[inline]
    pub fn is_animating(self) -> bool {
        matches!(self, Self::Opening | Self::Closing)
    }
}

// ============================================================================
// Easing Functions
// ============================================================================

/// Easing curve applied to a transition segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SheetEasing {
    /// Linear interpolation.
    Linear,
    /// Decelerating - good for entrances.
    #[default]
    EaseOut,
    /// Accelerating - good for exits.
    EaseIn,
    /// Smooth S-curve.
    EaseInOut,
}

impl SheetEasing {
    /// Apply the easing function to a time fraction (0.0 to 1.0).
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Self::EaseIn => t * t * t,
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    1.0 - inv * inv * inv / 2.0
                }
            }
        }
    }
}

// ============================================================================
// Animation Configuration
// ============================================================================

/// Timing for sheet transitions.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetAnimationConfig {
    /// Duration of a full 0 → 1 (or 1 → 0) transition.
    pub duration: Duration,
    /// Easing while opening.
    pub opening_easing: SheetEasing,
    /// Easing while closing.
    pub closing_easing: SheetEasing,
}

impl Default for SheetAnimationConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(250),
            opening_easing: SheetEasing::EaseOut,
            closing_easing: SheetEasing::EaseOut,
        }
    }
}

impl SheetAnimationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transitions that complete on the next tick.
    pub fn none() -> Self {
        Self {
            duration: Duration::ZERO,
            ..Default::default()
        }
    }

    /// Short linear transitions for reduced-motion preference.
    pub fn reduced_motion() -> Self {
        Self {
            duration: Duration::from_millis(100),
            opening_easing: SheetEasing::Linear,
            closing_easing: SheetEasing::Linear,
        }
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn opening_easing(mut self, easing: SheetEasing) -> Self {
        self.opening_easing = easing;
        self
    }

    pub fn closing_easing(mut self, easing: SheetEasing) -> Self {
        self.closing_easing = easing;
        self
    }

    /// Check if transitions are effectively instant.
    pub fn is_disabled(&self) -> bool {
        self.duration.is_zero()
    }

    /// The config to use for a route, honoring its `animation_enabled` flag.
    pub fn effective(&self, animation_enabled: bool) -> Self {
        if animation_enabled {
            self.clone()
        } else {
            Self::none()
        }
    }
}

// ============================================================================
// Animation State
// ============================================================================

/// Progress tracker for one sheet.
#[derive(Debug, Clone)]
pub struct SheetAnimation {
    phase: SheetPhase,
    /// Presented value, 0 closed .. 1 open.
    progress: f64,
    /// Segment start value.
    from: f64,
    /// Segment end value.
    to: f64,
    elapsed: Duration,
    duration: Duration,
    easing: SheetEasing,
}

impl Default for SheetAnimation {
    fn default() -> Self {
        Self::new()
    }
}

impl SheetAnimation {
    /// Create a mounted, never-presented state.
    pub fn new() -> Self {
        Self {
            phase: SheetPhase::Mounted,
            progress: 0.0,
            from: 0.0,
            to: 0.0,
            elapsed: Duration::ZERO,
            duration: Duration::ZERO,
            easing: SheetEasing::Linear,
        }
    }

    /// Create a state that starts fully open (for testing or instant open).
    pub fn open() -> Self {
        Self {
            phase: SheetPhase::Open,
            progress: 1.0,
            from: 1.0,
            to: 1.0,
            ..Self::new()
        }
    }

    pub fn phase(&self) -> SheetPhase {
        self.phase
    }

    /// Current presented value (0.0 to 1.0).
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Value the current segment is heading to.
    pub fn target(&self) -> f64 {
        self.to
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.phase.is_animating()
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        matches!(self.phase, SheetPhase::Open)
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        matches!(self.phase, SheetPhase::Closed)
    }

    /// Whether the sheet is closing or already closed.
    #[inline]
    pub fn is_leaving(&self) -> bool {
        matches!(self.phase, SheetPhase::Closing | SheetPhase::Closed)
    }

    /// Start animating toward open.
    ///
    /// No-op if already opening or open. From `Closing`, `Dragging`, or
    /// `Closed` the new segment starts at the current progress.
    pub fn start_opening(&mut self, config: &SheetAnimationConfig) {
        match self.phase {
            SheetPhase::Opening | SheetPhase::Open => {}
            SheetPhase::Mounted | SheetPhase::Dragging | SheetPhase::Closing | SheetPhase::Closed => {
                self.retarget(1.0, SheetPhase::Opening, config.duration, config.opening_easing);
            }
        }
    }

    /// Start animating toward closed.
    ///
    /// No-op if already closing or closed. From `Opening` the in-flight
    /// segment is cancelled and the close starts at the current progress. A
    /// state that never left progress 0 goes straight to `Closed`.
    pub fn start_closing(&mut self, config: &SheetAnimationConfig) {
        match self.phase {
            SheetPhase::Closing | SheetPhase::Closed => {}
            SheetPhase::Mounted | SheetPhase::Opening | SheetPhase::Open | SheetPhase::Dragging => {
                self.retarget(0.0, SheetPhase::Closing, config.duration, config.closing_easing);
            }
        }
    }

    /// Hold the sheet at `progress` (user drag). Returns the `(previous,
    /// current)` pair if the value changed.
    pub fn drag_to(&mut self, progress: f64) -> Option<(f64, f64)> {
        let progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        let previous = self.progress;
        self.progress = progress;
        self.from = progress;
        self.to = progress;
        self.elapsed = Duration::ZERO;
        self.duration = Duration::ZERO;
        self.phase = if progress == 0.0 {
            SheetPhase::Closed
        } else {
            SheetPhase::Dragging
        };
        (previous != progress).then_some((previous, progress))
    }

    /// Advance by `delta`. Returns the `(previous, current)` pair if progress
    /// moved.
    pub fn tick(&mut self, delta: Duration) -> Option<(f64, f64)> {
        if !self.is_animating() {
            return None;
        }
        self.elapsed = self.elapsed.saturating_add(delta);
        let t = if self.duration.is_zero() {
            1.0
        } else {
            (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
        };

        let previous = self.progress;
        if t >= 1.0 {
            self.progress = self.to;
            self.phase = if self.to > 0.0 {
                SheetPhase::Open
            } else {
                SheetPhase::Closed
            };
        } else {
            let eased = self.easing.apply(t);
            self.progress = (self.from + (self.to - self.from) * eased).clamp(0.0, 1.0);
        }

        (previous != self.progress).then_some((previous, self.progress))
    }

    fn retarget(
        &mut self,
        to: f64,
        phase: SheetPhase,
        full_duration: Duration,
        easing: SheetEasing,
    ) {
        let distance = (to - self.progress).abs();
        self.from = self.progress;
        self.to = to;
        self.elapsed = Duration::ZERO;
        self.easing = easing;

        if distance == 0.0 {
            self.duration = Duration::ZERO;
            self.phase = if to > 0.0 {
                SheetPhase::Open
            } else {
                SheetPhase::Closed
            };
            return;
        }

        self.duration = full_duration.mul_f64(distance);
        self.phase = phase;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn run_until_idle(anim: &mut SheetAnimation) -> Vec<(f64, f64)> {
        let mut moves = Vec::new();
        for _ in 0..1000 {
            if !anim.is_animating() {
                break;
            }
            if let Some(m) = anim.tick(FRAME) {
                moves.push(m);
            }
        }
        moves
    }

    #[test]
    fn default_is_mounted_and_invisible() {
        let anim = SheetAnimation::new();
        assert_eq!(anim.phase(), SheetPhase::Mounted);
        assert!(!anim.phase().is_visible());
        assert_eq!(anim.progress(), 0.0);
    }

    #[test]
    fn open_then_close_runs_full_cycle() {
        let config = SheetAnimationConfig::default();
        let mut anim = SheetAnimation::new();

        anim.start_opening(&config);
        assert_eq!(anim.phase(), SheetPhase::Opening);
        run_until_idle(&mut anim);
        assert_eq!(anim.phase(), SheetPhase::Open);
        assert_eq!(anim.progress(), 1.0);

        anim.start_closing(&config);
        assert_eq!(anim.phase(), SheetPhase::Closing);
        let moves = run_until_idle(&mut anim);
        assert_eq!(anim.phase(), SheetPhase::Closed);
        assert_eq!(moves.last().map(|m| m.1), Some(0.0));
    }

    #[test]
    fn progress_is_monotonic_within_a_segment() {
        let config = SheetAnimationConfig::default();
        let mut anim = SheetAnimation::new();
        anim.start_opening(&config);
        for (prev, curr) in run_until_idle(&mut anim) {
            assert!(curr >= prev);
        }
    }

    #[test]
    fn close_while_opening_starts_from_current_progress() {
        let config = SheetAnimationConfig::default();
        let mut anim = SheetAnimation::new();
        anim.start_opening(&config);
        anim.tick(Duration::from_millis(60));
        let mid = anim.progress();
        assert!(mid > 0.0 && mid < 1.0);

        anim.start_closing(&config);
        assert_eq!(anim.phase(), SheetPhase::Closing);
        assert_eq!(anim.progress(), mid);

        // The first closing step must not jump above the cancellation point.
        let (prev, curr) = anim.tick(Duration::from_millis(1)).unwrap();
        assert_eq!(prev, mid);
        assert!(curr <= mid);
    }

    #[test]
    fn shorter_distance_means_shorter_duration() {
        let config = SheetAnimationConfig::default();
        let mut anim = SheetAnimation::new();
        anim.start_opening(&config);
        anim.tick(Duration::from_millis(200));
        anim.start_closing(&config);
        // Closing from < 1.0 must finish before a full-length close would.
        anim.tick(config.duration.mul_f64(anim.progress()));
        assert!(anim.is_closed());
    }

    #[test]
    fn close_is_idempotent() {
        let config = SheetAnimationConfig::default();
        let mut anim = SheetAnimation::open();
        anim.start_closing(&config);
        anim.tick(FRAME);
        let p = anim.progress();
        anim.start_closing(&config);
        assert_eq!(anim.progress(), p);
        assert_eq!(anim.phase(), SheetPhase::Closing);
    }

    #[test]
    fn closing_a_never_presented_sheet_is_immediate() {
        let mut anim = SheetAnimation::new();
        anim.start_closing(&SheetAnimationConfig::default());
        assert!(anim.is_closed());
        assert!(anim.tick(FRAME).is_none());
    }

    #[test]
    fn zero_duration_completes_on_next_tick() {
        let config = SheetAnimationConfig::none();
        let mut anim = SheetAnimation::new();
        anim.start_opening(&config);
        assert_eq!(anim.tick(Duration::ZERO), Some((0.0, 1.0)));
        assert!(anim.is_open());
    }

    #[test]
    fn drag_to_zero_closes() {
        let mut anim = SheetAnimation::open();
        assert_eq!(anim.drag_to(0.4), Some((1.0, 0.4)));
        assert_eq!(anim.phase(), SheetPhase::Dragging);
        assert_eq!(anim.drag_to(0.0), Some((0.4, 0.0)));
        assert!(anim.is_closed());
    }

    #[test]
    fn reopen_from_dragging() {
        let config = SheetAnimationConfig::default();
        let mut anim = SheetAnimation::open();
        anim.drag_to(0.7);
        anim.start_opening(&config);
        assert_eq!(anim.phase(), SheetPhase::Opening);
        run_until_idle(&mut anim);
        assert!(anim.is_open());
    }

    #[test]
    fn easing_endpoints() {
        for easing in [
            SheetEasing::Linear,
            SheetEasing::EaseOut,
            SheetEasing::EaseIn,
            SheetEasing::EaseInOut,
        ] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn effective_config_respects_route_flag() {
        let config = SheetAnimationConfig::default();
        assert!(config.effective(false).is_disabled());
        assert_eq!(config.effective(true), config);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Step {
            Open,
            Close,
            Drag(f64),
            Tick(u16),
        }

        fn step() -> impl Strategy<Value = Step> {
            prop_oneof![
                Just(Step::Open),
                Just(Step::Close),
                (-0.5f64..1.5).prop_map(Step::Drag),
                (0u16..400).prop_map(Step::Tick),
            ]
        }

        proptest! {
            #[test]
            fn progress_stays_in_unit_range(steps in prop::collection::vec(step(), 1..40)) {
                let config = SheetAnimationConfig::default();
                let mut anim = SheetAnimation::new();
                for s in steps {
                    match s {
                        Step::Open => anim.start_opening(&config),
                        Step::Close => anim.start_closing(&config),
                        Step::Drag(p) => { anim.drag_to(p); }
                        Step::Tick(ms) => { anim.tick(Duration::from_millis(u64::from(ms))); }
                    }
                    prop_assert!((0.0..=1.0).contains(&anim.progress()));
                }
            }

            #[test]
            fn close_always_settles_closed(open_ms in 0u64..400) {
                let config = SheetAnimationConfig::default();
                let mut anim = SheetAnimation::new();
                anim.start_opening(&config);
                anim.tick(Duration::from_millis(open_ms));
                anim.start_closing(&config);
                anim.tick(config.duration);
                prop_assert!(anim.is_closed());
                prop_assert_eq!(anim.progress(), 0.0);
            }
        }
    }
}
