use std::time::{Duration, Instant};

use crate::prompt::Mode;

/// One timed typing session: the active prompt, the visible input buffer,
/// and the session-long counters. Prompts are replaced (never mutated) on
/// regeneration; counters survive across prompt boundaries.
pub struct SessionState {
    pub mode: Mode,
    pub prompt: Vec<char>,
    pub input: Vec<char>,
    pub total_typed: usize,
    pub total_correct: usize,
    pub started_at: Option<Instant>,
    pub finished_at: Option<Instant>,
    pub duration: Duration,
}

impl SessionState {
    pub fn new(mode: Mode, duration: Duration) -> Self {
        Self {
            mode,
            prompt: Vec::new(),
            input: Vec::new(),
            total_typed: 0,
            total_correct: 0,
            started_at: None,
            finished_at: None,
            duration,
        }
    }

    /// Swap in freshly generated text and clear the buffer. Counters and the
    /// clock are untouched.
    pub fn install_prompt(&mut self, text: &str) {
        self.prompt = text.chars().collect();
        self.input.clear();
    }

    pub fn prompt_string(&self) -> String {
        self.prompt.iter().collect()
    }

    pub fn buffer_full(&self) -> bool {
        self.input.len() >= self.prompt.len()
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    /// Stamp `finished_at` once elapsed time reaches the configured
    /// duration. Returns true only on the transition so callers can record
    /// the result exactly once.
    pub fn finish_if_due(&mut self, now: Instant) -> bool {
        if self.finished_at.is_some() {
            return false;
        }
        match self.started_at {
            Some(started) if now.duration_since(started) >= self.duration => {
                self.finished_at = Some(now);
                true
            }
            _ => false,
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => end.duration_since(start).as_secs_f64(),
            (Some(start), None) => start.elapsed().as_secs_f64(),
            _ => 0.0,
        }
    }

    pub fn wpm(&self) -> f64 {
        let elapsed = self.elapsed_secs();
        if elapsed < 0.1 {
            return 0.0;
        }
        (self.total_correct as f64 / 5.0) / (elapsed / 60.0)
    }

    pub fn accuracy(&self) -> f64 {
        if self.total_typed == 0 {
            return 100.0;
        }
        self.total_correct as f64 / self.total_typed as f64 * 100.0
    }

    pub fn remaining_secs(&self) -> f64 {
        if self.is_finished() {
            return 0.0;
        }
        if !self.is_started() {
            return self.duration.as_secs_f64();
        }
        (self.duration.as_secs_f64() - self.elapsed_secs()).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(prompt: &str) -> SessionState {
        let mut state = SessionState::new(Mode::Normal, Duration::from_secs(30));
        state.install_prompt(prompt);
        state
    }

    #[test]
    fn fresh_session_reports_idle_defaults() {
        let state = session("hello");
        assert!(!state.is_started());
        assert!(!state.is_finished());
        assert_eq!(state.accuracy(), 100.0);
        assert_eq!(state.wpm(), 0.0);
        assert_eq!(state.remaining_secs(), 30.0);
    }

    #[test]
    fn install_prompt_clears_buffer_but_keeps_counters() {
        let mut state = session("ab");
        state.input.push('a');
        state.total_typed = 2;
        state.total_correct = 1;

        state.install_prompt("next prompt");
        assert!(state.input.is_empty());
        assert_eq!(state.prompt_string(), "next prompt");
        assert_eq!(state.total_typed, 2);
        assert_eq!(state.total_correct, 1);
    }

    #[test]
    fn finish_if_due_fires_once() {
        let mut state = session("ab");
        let start = Instant::now();
        state.started_at = Some(start);

        let before = start + Duration::from_secs(29);
        assert!(!state.finish_if_due(before));

        let due = start + Duration::from_secs(30);
        assert!(state.finish_if_due(due));
        assert!(state.is_finished());
        assert!(!state.finish_if_due(due + Duration::from_secs(1)));
    }

    #[test]
    fn finish_requires_a_started_clock() {
        let mut state = session("ab");
        assert!(!state.finish_if_due(Instant::now() + Duration::from_secs(60)));
        assert!(!state.is_finished());
    }

    #[test]
    fn remaining_is_zero_once_finished() {
        let mut state = session("ab");
        let start = Instant::now();
        state.started_at = Some(start);
        state.finish_if_due(start + Duration::from_secs(30));
        assert_eq!(state.remaining_secs(), 0.0);
    }

    #[test]
    fn wpm_uses_correct_count_over_elapsed_minutes() {
        let mut state = session("ab");
        let start = Instant::now();
        state.started_at = Some(start);
        state.finished_at = Some(start + Duration::from_secs(60));
        state.total_correct = 100;
        state.total_typed = 100;
        assert!((state.wpm() - 20.0).abs() < f64::EPSILON);
    }
}
