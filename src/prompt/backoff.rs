use std::time::{Duration, Instant};

/// Per-source circuit breaker. A source trips the gate after exhausting its
/// retry budget; while the cooldown runs, prompt selection skips the network
/// entirely and serves from the fallback pool.
///
/// Successes never touch the gate: a fetch that recovers simply stops
/// consulting it until the next failure sequence trips it again.
#[derive(Clone, Copy, Debug, Default)]
pub struct BackoffGate {
    cooldown_until: Option<Instant>,
}

impl BackoffGate {
    pub const COOLDOWN: Duration = Duration::from_secs(15);

    pub fn should_skip(&self, now: Instant) -> bool {
        matches!(self.cooldown_until, Some(until) if now < until)
    }

    pub fn trip(&mut self, now: Instant) {
        self.cooldown_until = Some(now + Self::COOLDOWN);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_gate_never_blocks() {
        let gate = BackoffGate::default();
        assert!(!gate.should_skip(Instant::now()));
    }

    #[test]
    fn tripped_gate_blocks_until_cooldown_elapses() {
        let mut gate = BackoffGate::default();
        let now = Instant::now();
        gate.trip(now);

        assert!(gate.should_skip(now + Duration::from_millis(1)));
        assert!(gate.should_skip(now + BackoffGate::COOLDOWN - Duration::from_millis(1)));
        assert!(!gate.should_skip(now + BackoffGate::COOLDOWN));
    }

    #[test]
    fn retrip_extends_cooldown_from_new_failure() {
        let mut gate = BackoffGate::default();
        let now = Instant::now();
        gate.trip(now);
        let later = now + Duration::from_secs(10);
        gate.trip(later);

        assert!(gate.should_skip(now + BackoffGate::COOLDOWN + Duration::from_secs(1)));
        assert!(!gate.should_skip(later + BackoffGate::COOLDOWN));
    }
}
