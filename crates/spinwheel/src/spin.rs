use crate::config::SpinSettings;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use serde_with::DeserializeFromStr;
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumIter, EnumString};
use thiserror::Error;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    /// `1 - (1 - p)^3` over the whole spin.
    #[default]
    CubicOut,
    /// Fast to half the distance, coast to 80%, then settle with a cubic.
    ThreePhase,
}

fn cubic_out(p: f64) -> f64 {
    1.0 - (1.0 - p).powi(3)
}

impl Easing {
    pub fn ease(&self, progress: f64) -> f64 {
        let p = progress.clamp(0.0, 1.0);
        match self {
            Self::CubicOut => cubic_out(p),
            Self::ThreePhase => {
                if p < 0.3 {
                    (p / 0.3) * 0.5
                } else if p < 0.7 {
                    0.5 + ((p - 0.3) / 0.4) * 0.3
                } else {
                    0.8 + cubic_out((p - 0.7) / 0.3) * 0.2
                }
            }
        }
    }
}

/// Uniform draws in `[0, 1)`.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

#[derive(Debug, Clone)]
pub struct RngSource<R>(R);

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self(rng)
    }
}

impl RngSource<StdRng> {
    pub fn from_os() -> Self {
        Self(StdRng::from_os_rng())
    }

    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.0.random::<f64>()
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SpinError {
    #[error("A spin is already in progress")]
    AlreadySpinning,
    #[error("The wheel has no slices to land on")]
    NoSlices,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveSpin {
    pub started_at: Duration,
    pub start_rotation: f64,
    pub target_rotation: f64,
    pub duration: Duration,
}

impl ActiveSpin {
    pub fn progress(&self, now: Duration) -> f64 {
        let elapsed = now.saturating_sub(self.started_at);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpinState {
    Idle,
    Spinning(ActiveSpin),
}

/// What a single animation frame produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameUpdate {
    Idle { rotation: f64 },
    Spinning { rotation: f64, progress: f64 },
    /// Reported once per spin, on the frame progress reaches 1.
    Settled { rotation: f64 },
}

impl FrameUpdate {
    pub fn rotation(&self) -> f64 {
        match *self {
            Self::Idle { rotation }
            | Self::Spinning { rotation, .. }
            | Self::Settled { rotation } => rotation,
        }
    }
}

/// Drives one spin at a time from a start timestamp to a settled rotation.
/// Timestamps are host frame-clock readings; only differences matter.
#[derive(Debug, Clone)]
pub struct SpinEngine {
    state: SpinState,
    last_rotation: f64,
    base_full_turns: u32,
    duration: Duration,
    easing: Easing,
}

impl SpinEngine {
    pub fn new(settings: &SpinSettings) -> Self {
        Self {
            state: SpinState::Idle,
            last_rotation: 0.0,
            base_full_turns: settings.base_full_turns,
            duration: Duration::from_millis(settings.duration_ms.max(1)),
            easing: settings.easing,
        }
    }

    /// Picks up new timing settings; an in-flight spin keeps its own.
    pub fn reconfigure(&mut self, settings: &SpinSettings) {
        self.base_full_turns = settings.base_full_turns;
        self.duration = Duration::from_millis(settings.duration_ms.max(1));
        self.easing = settings.easing;
    }

    pub fn state(&self) -> SpinState {
        self.state
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.state, SpinState::Spinning(_))
    }

    /// Cumulative, never reduced modulo 360.
    pub fn last_rotation(&self) -> f64 {
        self.last_rotation
    }

    pub fn spin(
        &mut self,
        now: Duration,
        rng: &mut dyn RandomSource,
    ) -> Result<ActiveSpin, SpinError> {
        if self.is_spinning() {
            return Err(SpinError::AlreadySpinning);
        }

        let delta = f64::from(self.base_full_turns) * 360.0 + rng.next_unit() * 360.0;
        let spin = ActiveSpin {
            started_at: now,
            start_rotation: self.last_rotation,
            target_rotation: self.last_rotation + delta,
            duration: self.duration,
        };
        log::debug!(
            "Spin started: {:.1}° -> {:.1}° over {:?}",
            spin.start_rotation,
            spin.target_rotation,
            spin.duration
        );
        self.state = SpinState::Spinning(spin);
        Ok(spin)
    }

    pub fn tick(&mut self, now: Duration) -> FrameUpdate {
        let SpinState::Spinning(spin) = self.state else {
            return FrameUpdate::Idle {
                rotation: self.last_rotation,
            };
        };

        let progress = spin.progress(now);
        if progress >= 1.0 {
            self.state = SpinState::Idle;
            self.last_rotation = spin.target_rotation;
            return FrameUpdate::Settled {
                rotation: spin.target_rotation,
            };
        }

        let distance = spin.target_rotation - spin.start_rotation;
        FrameUpdate::Spinning {
            rotation: spin.start_rotation + distance * self.easing.ease(progress),
            progress,
        }
    }
}

/// Index of the slice under a fixed pointer once the wheel has turned
/// `rotation` degrees clockwise. `slot_count` must be positive.
pub fn resolve_index(rotation: f64, slot_count: usize, pointer_angle: f64) -> usize {
    debug_assert!(slot_count > 0);
    let normalized = rotation.rem_euclid(360.0);
    let span = 360.0 / slot_count as f64;
    let adjusted = (360.0 - normalized + pointer_angle).rem_euclid(360.0);
    ((adjusted / span).floor() as usize) % slot_count
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Replays scripted draws, repeating the last one.
    pub(crate) struct ScriptedSource(pub Vec<f64>);

    impl RandomSource for ScriptedSource {
        fn next_unit(&mut self) -> f64 {
            if self.0.len() > 1 {
                self.0.remove(0)
            } else {
                self.0.first().copied().unwrap_or(0.0)
            }
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn engine(easing: Easing) -> SpinEngine {
        SpinEngine::new(&SpinSettings {
            easing,
            ..SpinSettings::default()
        })
    }

    #[test]
    fn test_easing_endpoints_and_monotonic() {
        for easing in [Easing::CubicOut, Easing::ThreePhase] {
            assert_eq!(easing.ease(0.0), 0.0);
            assert!((easing.ease(1.0) - 1.0).abs() < 1e-12);

            let mut previous = 0.0;
            for step in 0..=1000 {
                let value = easing.ease(step as f64 / 1000.0);
                assert!(value >= previous, "{} not monotonic at {}", easing, step);
                assert!((0.0..=1.0 + 1e-12).contains(&value));
                previous = value;
            }
        }
    }

    #[test]
    fn test_easing_clamps_out_of_range_progress() {
        assert_eq!(Easing::CubicOut.ease(-0.5), 0.0);
        assert!((Easing::ThreePhase.ease(1.5) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_three_phase_is_continuous_at_boundaries() {
        let e = Easing::ThreePhase;
        for (boundary, value) in [(0.3, 0.5), (0.7, 0.8)] {
            assert!((e.ease(boundary) - value).abs() < 1e-9);
            assert!((e.ease(boundary - 1e-9) - value).abs() < 1e-6);
            assert!((e.ease(boundary + 1e-9) - value).abs() < 1e-6);
        }
    }

    #[test]
    fn test_spin_target_within_range() {
        let mut engine = engine(Easing::CubicOut);
        let spin = engine.spin(ms(0), &mut ScriptedSource(vec![0.25])).unwrap();
        assert_eq!(spin.start_rotation, 0.0);
        assert_eq!(spin.target_rotation, 8.0 * 360.0 + 90.0);
    }

    #[test]
    fn test_second_spin_is_rejected_without_state_change() {
        let mut engine = engine(Easing::CubicOut);
        let first = engine.spin(ms(0), &mut ScriptedSource(vec![0.5])).unwrap();

        let again = engine.spin(ms(100), &mut ScriptedSource(vec![0.9]));
        assert_eq!(again, Err(SpinError::AlreadySpinning));
        assert_eq!(engine.state(), SpinState::Spinning(first));
    }

    #[test]
    fn test_tick_follows_easing_and_settles_once() {
        let mut engine = engine(Easing::CubicOut);
        let spin = engine.spin(ms(1000), &mut ScriptedSource(vec![0.0])).unwrap();

        match engine.tick(ms(3000)) {
            FrameUpdate::Spinning { rotation, progress } => {
                assert!((progress - 0.5).abs() < 1e-9);
                assert!((rotation - spin.target_rotation * 0.875).abs() < 1e-9);
            }
            other => panic!("expected spinning frame, got {:?}", other),
        }

        assert_eq!(
            engine.tick(ms(5000)),
            FrameUpdate::Settled {
                rotation: spin.target_rotation
            }
        );
        assert_eq!(
            engine.tick(ms(5016)),
            FrameUpdate::Idle {
                rotation: spin.target_rotation
            }
        );
        assert_eq!(engine.last_rotation(), spin.target_rotation);
    }

    #[test]
    fn test_clock_before_start_reads_as_no_progress() {
        let mut engine = engine(Easing::ThreePhase);
        engine.spin(ms(500), &mut ScriptedSource(vec![0.0])).unwrap();
        assert_eq!(
            engine.tick(ms(100)),
            FrameUpdate::Spinning {
                rotation: 0.0,
                progress: 0.0
            }
        );
    }

    #[test]
    fn test_rotation_accumulates_across_spins() {
        let mut engine = engine(Easing::CubicOut);
        let mut rng = ScriptedSource(vec![0.5, 0.25]);

        engine.spin(ms(0), &mut rng).unwrap();
        engine.tick(ms(4000));
        let first = engine.last_rotation();

        let second = engine.spin(ms(5000), &mut rng).unwrap();
        assert_eq!(second.start_rotation, first);
        assert_eq!(engine.tick(ms(5000)).rotation(), first);
        engine.tick(ms(9000));
        assert_eq!(engine.last_rotation(), first + 8.0 * 360.0 + 90.0);
    }

    #[test]
    fn test_seeded_spins_are_reproducible() {
        let run = |seed| {
            let mut engine = engine(Easing::CubicOut);
            let mut rng = RngSource::seeded(seed);
            engine.spin(ms(0), &mut rng).unwrap().target_rotation
        };
        assert_eq!(run(7), run(7));
        let target = run(7);
        assert!((2880.0..3240.0).contains(&target));
    }

    #[test]
    fn test_resolve_zero_rotation_is_first_slice() {
        assert_eq!(resolve_index(0.0, 8, 0.0), 0);
    }

    #[test]
    fn test_resolve_steps_across_boundary() {
        // turning clockwise brings the previous slot under the pointer
        assert_eq!(resolve_index(44.9, 8, 0.0), 7);
        assert_eq!(resolve_index(45.1, 8, 0.0), 6);
        assert_eq!(resolve_index(0.1, 8, 0.0), 7);
    }

    #[test]
    fn test_resolve_is_periodic() {
        for step in 0..720 {
            let rotation = step as f64 * 0.5 + 0.25;
            let base = resolve_index(rotation, 8, 0.0);
            for k in [-3i32, -1, 1, 2, 10] {
                assert_eq!(resolve_index(rotation + 360.0 * f64::from(k), 8, 0.0), base);
            }
        }
    }

    #[test]
    fn test_resolve_never_skips_a_slice() {
        for slot_count in 1..=8 {
            let mut previous = resolve_index(0.0, slot_count, 0.0);
            for step in 1..=3600 {
                let current = resolve_index(step as f64 * 0.1 + 0.05, slot_count, 0.0);
                let diff = (previous + slot_count - current) % slot_count;
                assert!(diff <= 1, "skipped from {} to {}", previous, current);
                previous = current;
            }
        }
    }

    #[test]
    fn test_resolve_honours_pointer_angle() {
        // pointer at south (90° clockwise from east) on an unturned wheel
        assert_eq!(resolve_index(0.0, 4, 90.0), 1);
        assert_eq!(resolve_index(90.0, 4, 90.0), 0);
    }
}
