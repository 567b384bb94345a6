use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::state::SessionState;

/// Snapshot of a finished session, as persisted to the history store.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionResult {
    pub wpm: f64,
    pub accuracy: f64,
    pub total_typed: usize,
    pub total_correct: usize,
    pub mode: String,
    pub duration_secs: f64,
    pub timestamp: DateTime<Utc>,
}

impl SessionResult {
    pub fn from_session(session: &SessionState) -> Self {
        Self {
            wpm: session.wpm(),
            accuracy: session.accuracy(),
            total_typed: session.total_typed,
            total_correct: session.total_correct,
            mode: session.mode.as_str().to_string(),
            duration_secs: session.duration.as_secs_f64(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crate::prompt::Mode;

    use super::*;

    #[test]
    fn result_captures_session_metrics() {
        let mut state = SessionState::new(Mode::Quote, Duration::from_secs(60));
        state.install_prompt("some quote");
        let start = Instant::now();
        state.started_at = Some(start);
        state.finished_at = Some(start + Duration::from_secs(60));
        state.total_typed = 200;
        state.total_correct = 150;

        let result = SessionResult::from_session(&state);
        assert_eq!(result.mode, "quote");
        assert_eq!(result.total_typed, 200);
        assert_eq!(result.total_correct, 150);
        assert!((result.wpm - 30.0).abs() < f64::EPSILON);
        assert!((result.accuracy - 75.0).abs() < f64::EPSILON);
        assert!((result.duration_secs - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn result_round_trips_through_json() {
        let mut state = SessionState::new(Mode::Normal, Duration::from_secs(30));
        state.install_prompt("words");
        let result = SessionResult::from_session(&state);

        let json = serde_json::to_string(&result).unwrap();
        let back: SessionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.mode, result.mode);
        assert_eq!(back.total_typed, result.total_typed);
    }
}
