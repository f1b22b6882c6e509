use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::exercise::{ExerciseKind, Phase};

/// Mutable per-session counting state.
///
/// Owned by the caller and threaded through [`RepTracker::observe`], so two
/// sessions never share anything.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerState {
    pub last_phase: Phase,
    /// Timestamp of the last accepted phase change. `None` until the first
    /// change after a reset, which is therefore never debounced.
    pub last_transition: Option<Duration>,
    pub rep_count: u32,
    /// Score of the most recent in-position frame
    pub form_score: u8,
}

impl TrackerState {
    /// Fresh state parked in the exercise's rest phase
    pub fn new(kind: ExerciseKind) -> Self {
        Self {
            last_phase: kind.rest_phase(),
            last_transition: None,
            rep_count: 0,
            form_score: 0,
        }
    }
}

/// Outcome of feeding one phase into the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Same phase as before
    Unchanged,
    /// Phase changed too soon after the previous change and was ignored
    Debounced,
    /// Phase change accepted, no rep completed
    Accepted,
    /// Phase change accepted and it completed a rep
    Counted,
}

impl Transition {
    pub fn is_counted(self) -> bool {
        self == Transition::Counted
    }
}

/// Debounced phase state machine for one exercise.
///
/// Only looks at the phase and score an analyzer produced, never at
/// keypoints.
#[derive(Debug, Clone)]
pub struct RepTracker {
    kind: ExerciseKind,
    debounce: Duration,
}

impl RepTracker {
    pub fn new(kind: ExerciseKind, debounce: Duration) -> Self {
        Self { kind, debounce }
    }

    pub fn kind(&self) -> ExerciseKind {
        self.kind
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Reinitialize `state` for this tracker's exercise
    pub fn reset(&self, state: &mut TrackerState) {
        *state = TrackerState::new(self.kind);
        info!(exercise = %self.kind, "tracker reset");
    }

    /// Feed one in-position frame.
    ///
    /// A change is accepted only when strictly more than the debounce window
    /// has passed since the last accepted change. Rejected changes leave the
    /// state untouched apart from the form score.
    pub fn observe(
        &self,
        state: &mut TrackerState,
        phase: Phase,
        score: u8,
        timestamp: Duration,
    ) -> Transition {
        state.form_score = score;

        if phase == state.last_phase {
            return Transition::Unchanged;
        }

        if let Some(last) = state.last_transition {
            let elapsed = timestamp.saturating_sub(last);
            if elapsed <= self.debounce {
                debug!(
                    from = %state.last_phase,
                    to = %phase,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "phase change debounced"
                );
                return Transition::Debounced;
            }
        }

        let from = state.last_phase;
        state.last_phase = phase;
        state.last_transition = Some(timestamp);
        debug!(from = %from, to = %phase, "phase change");

        if self.kind.counting_transition() == Some((from, phase)) {
            state.rep_count += 1;
            info!(exercise = %self.kind, reps = state.rep_count, "rep completed");
            Transition::Counted
        } else {
            Transition::Accepted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn tracker(kind: ExerciseKind) -> (RepTracker, TrackerState) {
        (RepTracker::new(kind, ms(500)), TrackerState::new(kind))
    }

    fn feed(tracker: &RepTracker, state: &mut TrackerState, frames: &[(Phase, u64)]) {
        for &(phase, t) in frames {
            tracker.observe(state, phase, 100, ms(t));
        }
    }

    #[test]
    fn test_new_state_rests() {
        let state = TrackerState::new(ExerciseKind::BicepCurl);
        assert_eq!(state.last_phase, Phase::Down);
        assert_eq!(state.rep_count, 0);
        assert_eq!(state.form_score, 0);
        assert!(state.last_transition.is_none());
    }

    #[test]
    fn test_pushup_rep_after_debounce() {
        let (t, mut s) = tracker(ExerciseKind::Pushup);
        assert_eq!(t.observe(&mut s, Phase::Down, 100, ms(0)), Transition::Accepted);
        assert_eq!(t.observe(&mut s, Phase::Up, 100, ms(600)), Transition::Counted);
        assert_eq!(s.rep_count, 1);
    }

    #[test]
    fn test_pushup_rep_inside_debounce() {
        let (t, mut s) = tracker(ExerciseKind::Pushup);
        feed(&t, &mut s, &[(Phase::Down, 0), (Phase::Up, 200)]);
        assert_eq!(s.rep_count, 0);
        assert_eq!(s.last_phase, Phase::Down);
    }

    #[test]
    fn test_rapid_flicker_never_counts() {
        let (t, mut s) = tracker(ExerciseKind::Squat);
        feed(&t, &mut s, &[(Phase::Up, 0), (Phase::Down, 150), (Phase::Up, 400)]);
        assert_eq!(s.rep_count, 0);
    }

    #[test]
    fn test_debounce_boundary_is_exclusive() {
        let (t, mut s) = tracker(ExerciseKind::Squat);
        t.observe(&mut s, Phase::Down, 100, ms(1000));
        assert_eq!(t.observe(&mut s, Phase::Up, 100, ms(1500)), Transition::Debounced);
        assert_eq!(t.observe(&mut s, Phase::Up, 100, ms(1501)), Transition::Counted);
    }

    #[test]
    fn test_curl_counts_on_lowering() {
        let (t, mut s) = tracker(ExerciseKind::BicepCurl);
        assert_eq!(t.observe(&mut s, Phase::Up, 100, ms(0)), Transition::Accepted);
        assert_eq!(t.observe(&mut s, Phase::Down, 100, ms(700)), Transition::Counted);
        assert_eq!(t.observe(&mut s, Phase::Up, 100, ms(1400)), Transition::Accepted);
        assert_eq!(s.rep_count, 1);
    }

    #[test]
    fn test_press_counts_on_lowering() {
        let (t, mut s) = tracker(ExerciseKind::ShoulderPress);
        feed(&t, &mut s, &[(Phase::Up, 0), (Phase::Down, 600), (Phase::Up, 1200), (Phase::Down, 1800)]);
        assert_eq!(s.rep_count, 2);
    }

    #[test]
    fn test_plank_never_counts() {
        let (t, mut s) = tracker(ExerciseKind::Plank);
        for i in 0..20 {
            assert_eq!(
                t.observe(&mut s, Phase::Holding, 80, ms(i * 1000)),
                Transition::Unchanged
            );
        }
        assert_eq!(s.rep_count, 0);
        assert_eq!(s.form_score, 80);
    }

    #[test]
    fn test_same_phase_does_not_advance_timestamp() {
        let (t, mut s) = tracker(ExerciseKind::Squat);
        t.observe(&mut s, Phase::Down, 100, ms(0));
        t.observe(&mut s, Phase::Down, 100, ms(450));
        assert_eq!(s.last_transition, Some(ms(0)));
        assert!(t.observe(&mut s, Phase::Up, 100, ms(501)).is_counted());
    }

    #[test]
    fn test_reset_clears_count() {
        let (t, mut s) = tracker(ExerciseKind::Squat);
        feed(&t, &mut s, &[(Phase::Down, 0), (Phase::Up, 600)]);
        assert_eq!(s.rep_count, 1);
        t.reset(&mut s);
        assert_eq!(s, TrackerState::new(ExerciseKind::Squat));
    }

    #[test]
    fn test_form_score_tracks_latest_frame() {
        let (t, mut s) = tracker(ExerciseKind::Squat);
        t.observe(&mut s, Phase::Up, 55, ms(0));
        assert_eq!(s.form_score, 55);
        t.observe(&mut s, Phase::Down, 90, ms(10));
        assert_eq!(s.form_score, 90);
    }

    fn phase_strategy() -> impl Strategy<Value = Phase> {
        prop_oneof![Just(Phase::Up), Just(Phase::Down)]
    }

    proptest! {
        #[test]
        fn prop_rep_count_monotonic(
            frames in proptest::collection::vec((phase_strategy(), 0u64..2000), 1..60)
        ) {
            let (t, mut s) = tracker(ExerciseKind::Squat);
            let mut now = 0u64;
            let mut prev = 0u32;
            for (phase, gap) in frames {
                now += gap;
                let outcome = t.observe(&mut s, phase, 100, ms(now));
                let expected = prev + u32::from(outcome.is_counted());
                prop_assert_eq!(s.rep_count, expected);
                prev = s.rep_count;
            }
        }

        #[test]
        fn prop_changes_within_window_count_at_most_once(
            gaps in proptest::collection::vec(0u64..=250, 2..3)
        ) {
            // Two changes inside 500 ms total: the second is always debounced
            let (t, mut s) = tracker(ExerciseKind::Squat);
            let first = gaps[0];
            let second = first + gaps[1];
            t.observe(&mut s, Phase::Down, 100, ms(first));
            let outcome = t.observe(&mut s, Phase::Up, 100, ms(second));
            prop_assert_eq!(outcome, Transition::Debounced);
            prop_assert_eq!(s.rep_count, 0);
        }
    }
}
