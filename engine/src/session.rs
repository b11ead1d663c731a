//! One tutorial or timed review session.
//!
//! A [`Session`] owns the gesture stack and the scorer for its lifetime.
//! Decisions are scored inside the same [`Session::advance`] call that
//! completes the commit animation, so a countdown tick that follows always
//! observes them. The session ends exactly once: whichever of
//! [`Session::stop`] or [`Session::countdown_tick`] gets there first yields
//! the [`SessionOutcome`], later calls return `None`.

use std::time::Duration;

use hivecheck_types::{Decision, Item, Label, ReviewerName, SessionResult};

use crate::gesture::{CardView, GestureConfig, GestureStack, ReleaseOutcome};
use crate::scorer::SessionScorer;

pub const DEFAULT_SESSION_SECS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Per-decision feedback, never recorded.
    Tutorial,
    /// Counts down from `duration_secs`; the result is recorded on finish.
    Timed { duration_secs: u32 },
}

#[derive(Debug, Clone)]
enum Kind {
    Tutorial,
    Timed {
        reviewer: ReviewerName,
        duration_secs: u32,
        remaining_secs: u32,
    },
}

/// Display snapshot of the running counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub correct: u32,
    pub reviewed: u32,
}

impl From<SessionScorer> for Score {
    fn from(scorer: SessionScorer) -> Self {
        Self {
            correct: scorer.correct(),
            reviewed: scorer.reviewed(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Incorrect { expected: Label },
}

impl Feedback {
    #[must_use]
    pub fn is_correct(self) -> bool {
        matches!(self, Feedback::Correct)
    }

    #[must_use]
    pub fn message(self) -> String {
        match self {
            Feedback::Correct => "Correct!".to_string(),
            Feedback::Incorrect { expected } => {
                format!("Incorrect (correct: {})", expected.as_str())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Decided { decision: Decision, correct: bool },
    Feedback(Feedback),
}

/// Produced once, when the session ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Timed test result, ready for the leaderboard.
    Scored(SessionResult),
    /// Tutorial counts; not recorded.
    Practice(Score),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Running(SessionScorer),
    Finished(Score),
}

#[derive(Debug, Clone)]
pub struct Session {
    kind: Kind,
    stack: GestureStack,
    state: SessionState,
    last_feedback: Option<Feedback>,
}

impl Session {
    #[must_use]
    pub fn tutorial(config: GestureConfig, items: impl IntoIterator<Item = Item>) -> Self {
        Self::start(Kind::Tutorial, config, items)
    }

    /// A timed test. A zero duration is raised to one second.
    #[must_use]
    pub fn timed(
        reviewer: ReviewerName,
        duration_secs: u32,
        config: GestureConfig,
        items: impl IntoIterator<Item = Item>,
    ) -> Self {
        let duration_secs = duration_secs.max(1);
        Self::start(
            Kind::Timed {
                reviewer,
                duration_secs,
                remaining_secs: duration_secs,
            },
            config,
            items,
        )
    }

    fn start(kind: Kind, config: GestureConfig, items: impl IntoIterator<Item = Item>) -> Self {
        let mut stack = GestureStack::new(config);
        stack.load(items);
        tracing::info!(cards = stack.len(), "Session started");
        Self {
            kind,
            stack,
            state: SessionState::Running(SessionScorer::new()),
            last_feedback: None,
        }
    }

    #[must_use]
    pub fn mode(&self) -> SessionMode {
        match &self.kind {
            Kind::Tutorial => SessionMode::Tutorial,
            Kind::Timed { duration_secs, .. } => SessionMode::Timed {
                duration_secs: *duration_secs,
            },
        }
    }

    #[must_use]
    pub fn reviewer(&self) -> Option<&ReviewerName> {
        match &self.kind {
            Kind::Tutorial => None,
            Kind::Timed { reviewer, .. } => Some(reviewer),
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.state, SessionState::Running(_))
    }

    pub fn pointer_move(&mut self, dx: f32, dy: f32) -> bool {
        self.is_running() && self.stack.on_pointer_move(dx, dy)
    }

    pub fn pointer_release(&mut self, dx: f32, dy: f32) -> ReleaseOutcome {
        if !self.is_running() {
            return ReleaseOutcome::Ignored;
        }
        self.stack.on_pointer_release(dx, dy)
    }

    /// Frame tick. Scores any decision the stack produced.
    pub fn advance(&mut self, delta: Duration) -> Vec<SessionEvent> {
        if !self.is_running() {
            return Vec::new();
        }
        let decision = self.stack.advance(delta);
        self.absorb(decision)
    }

    /// Complete the in-flight animation immediately.
    pub fn finish_animation(&mut self) -> Vec<SessionEvent> {
        if !self.is_running() {
            return Vec::new();
        }
        let decision = self.stack.finish_animation();
        self.absorb(decision)
    }

    /// One-second countdown tick. Reaching zero ends a timed session.
    ///
    /// Tutorials have no clock; the tick is a no-op for them.
    pub fn countdown_tick(&mut self) -> Option<SessionOutcome> {
        if !self.is_running() {
            return None;
        }
        let Kind::Timed { remaining_secs, .. } = &mut self.kind else {
            return None;
        };
        *remaining_secs = remaining_secs.saturating_sub(1);
        if *remaining_secs == 0 {
            tracing::debug!("Countdown elapsed");
            self.finish()
        } else {
            None
        }
    }

    /// End the session early.
    pub fn stop(&mut self) -> Option<SessionOutcome> {
        self.finish()
    }

    #[must_use]
    pub fn remaining_secs(&self) -> Option<u32> {
        match &self.kind {
            Kind::Tutorial => None,
            Kind::Timed { remaining_secs, .. } => Some(*remaining_secs),
        }
    }

    /// Remaining time as a fraction in `[0, 1]`. Always 1 for tutorials.
    #[must_use]
    pub fn time_fraction(&self) -> f64 {
        match &self.kind {
            Kind::Tutorial => 1.0,
            Kind::Timed {
                duration_secs,
                remaining_secs,
                ..
            } => f64::from(*remaining_secs) / f64::from(*duration_secs),
        }
    }

    #[must_use]
    pub fn score(&self) -> Score {
        match self.state {
            SessionState::Running(scorer) => Score::from(scorer),
            SessionState::Finished(score) => score,
        }
    }

    #[must_use]
    pub fn last_feedback(&self) -> Option<Feedback> {
        self.last_feedback
    }

    pub fn clear_feedback(&mut self) {
        self.last_feedback = None;
    }

    #[must_use]
    pub fn stack(&self) -> &GestureStack {
        &self.stack
    }

    #[must_use]
    pub fn visible_cards(&self) -> Vec<CardView<'_>> {
        self.stack.visible_cards()
    }

    fn absorb(&mut self, decision: Option<Decision>) -> Vec<SessionEvent> {
        let (Some(decision), SessionState::Running(scorer)) = (decision, &mut self.state) else {
            return Vec::new();
        };
        let correct = decision.is_correct();
        scorer.record(correct);
        tracing::debug!(
            id = %decision.item.id,
            picked = decision.picked().as_str(),
            correct,
            "Decision scored"
        );

        let mut events = Vec::with_capacity(2);
        if matches!(self.kind, Kind::Tutorial) {
            let feedback = if correct {
                Feedback::Correct
            } else {
                Feedback::Incorrect {
                    expected: decision.item.label,
                }
            };
            self.last_feedback = Some(feedback);
            events.push(SessionEvent::Decided { decision, correct });
            events.push(SessionEvent::Feedback(feedback));
        } else {
            events.push(SessionEvent::Decided { decision, correct });
        }
        events
    }

    fn finish(&mut self) -> Option<SessionOutcome> {
        let SessionState::Running(scorer) = self.state else {
            return None;
        };
        let score = Score::from(scorer);
        self.state = SessionState::Finished(score);

        let outcome = match &self.kind {
            Kind::Tutorial => SessionOutcome::Practice(score),
            Kind::Timed { reviewer, .. } => SessionOutcome::Scored(scorer.finalize(reviewer.clone())),
        };
        tracing::info!(
            correct = score.correct,
            reviewed = score.reviewed,
            mode = ?self.mode(),
            "Session finished"
        );
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: f32 = 400.0;

    fn deck() -> Vec<Item> {
        vec![
            Item::new("h1", "hive://1", Label::Healthy),
            Item::new("u1", "hive://2", Label::Unhealthy),
            Item::new("h2", "hive://3", Label::Healthy),
        ]
    }

    fn ann() -> ReviewerName {
        ReviewerName::new("Ann").unwrap()
    }

    fn timed(secs: u32) -> Session {
        Session::timed(ann(), secs, GestureConfig::for_viewport(W), deck())
    }

    fn swipe(session: &mut Session, dx: f32) -> Vec<SessionEvent> {
        assert!(session.pointer_move(dx, 0.0));
        session.pointer_release(dx, 0.0);
        session.finish_animation()
    }

    #[test]
    fn decisions_are_scored_against_labels() {
        let mut session = timed(30);
        let events = swipe(&mut session, W);
        assert!(matches!(
            events.as_slice(),
            [SessionEvent::Decided { correct: true, .. }]
        ));
        swipe(&mut session, W);
        assert_eq!(
            session.score(),
            Score {
                correct: 1,
                reviewed: 2
            }
        );
    }

    #[test]
    fn decision_is_scored_by_frame_advance() {
        let mut session = timed(30);
        session.pointer_move(-W, 0.0);
        session.pointer_release(-W, 0.0);
        assert!(session.advance(Duration::from_millis(100)).is_empty());
        let events = session.advance(Duration::from_millis(200));
        assert_eq!(events.len(), 1);
        assert_eq!(session.score().reviewed, 1);
        assert_eq!(session.score().correct, 0);
    }

    #[test]
    fn countdown_finishes_with_result() {
        let mut session = timed(3);
        swipe(&mut session, W);
        assert!(session.countdown_tick().is_none());
        assert!(session.countdown_tick().is_none());
        assert!((session.time_fraction() - 1.0 / 3.0).abs() < 1e-9);

        let Some(SessionOutcome::Scored(result)) = session.countdown_tick() else {
            panic!("expected scored outcome");
        };
        assert_eq!(result.reviewer().as_str(), "Ann");
        assert_eq!((result.correct_count(), result.reviewed_count()), (1, 1));
        assert!(!session.is_running());
        assert!(session.time_fraction().abs() < 1e-9);
    }

    #[test]
    fn stop_then_countdown_finishes_once() {
        let mut session = timed(1);
        assert!(session.stop().is_some());
        assert!(session.countdown_tick().is_none());
        assert!(session.stop().is_none());
    }

    #[test]
    fn countdown_then_stop_finishes_once() {
        let mut session = timed(1);
        assert!(session.countdown_tick().is_some());
        assert!(session.stop().is_none());
    }

    #[test]
    fn finished_session_ignores_input() {
        let mut session = timed(30);
        session.stop();
        assert!(!session.pointer_move(W, 0.0));
        assert_eq!(session.pointer_release(W, 0.0), ReleaseOutcome::Ignored);
        assert!(session.finish_animation().is_empty());
        assert_eq!(session.score(), Score::default());
    }

    #[test]
    fn tutorial_reports_feedback_and_is_not_scored() {
        let mut session = Session::tutorial(GestureConfig::for_viewport(W), deck());
        assert_eq!(session.mode(), SessionMode::Tutorial);

        let events = swipe(&mut session, -W);
        assert_eq!(
            events.last(),
            Some(&SessionEvent::Feedback(Feedback::Incorrect {
                expected: Label::Healthy
            }))
        );
        assert_eq!(
            session.last_feedback().map(Feedback::message).as_deref(),
            Some("Incorrect (correct: healthy)")
        );

        swipe(&mut session, -W);
        assert_eq!(session.last_feedback(), Some(Feedback::Correct));

        assert!(session.countdown_tick().is_none());
        assert_eq!(
            session.stop(),
            Some(SessionOutcome::Practice(Score {
                correct: 1,
                reviewed: 2
            }))
        );
    }

    #[test]
    fn zero_duration_is_raised_to_one_second() {
        let session = timed(0);
        assert_eq!(session.mode(), SessionMode::Timed { duration_secs: 1 });
        assert_eq!(session.remaining_secs(), Some(1));
    }

    #[test]
    fn exhausted_deck_keeps_session_running() {
        let mut session = timed(30);
        for _ in 0..3 {
            swipe(&mut session, W);
        }
        assert!(session.stack().is_empty());
        assert!(session.is_running());
        assert!(!session.pointer_move(W, 0.0));
    }
}
