use std::time::Instant;

use crate::session::state::SessionState;

/// Process one typed code point. Callers split multi-code-point input events
/// and feed them through here one at a time; prompt regeneration on a full
/// buffer is the caller's job and must happen before this is called.
pub fn process_char(session: &mut SessionState, ch: char) {
    if session.started_at.is_none() {
        session.started_at = Some(Instant::now());
    }

    let idx = session.input.len();
    session.total_typed += 1;

    if idx < session.prompt.len() && session.prompt[idx] == ch {
        session.input.push(ch);
        session.total_correct += 1;
        return;
    }

    if idx > 0 {
        let prev = idx - 1;
        if prev < session.prompt.len()
            && session.input[prev] != session.prompt[prev]
            && ch == session.prompt[prev]
        {
            // The user immediately retyped the character the previous slot
            // should have been: repair that slot in place instead of
            // shifting everything right. Lookback is one slot only.
            session.input[prev] = ch;
            session.total_correct += 1;
            return;
        }
    }

    session.input.push(ch);
}

/// Remove the last typed code point, keeping the counters consistent with
/// what is currently visible rather than with all-time history.
pub fn process_backspace(session: &mut SessionState) {
    let Some(removed) = session.input.pop() else {
        return;
    };
    let idx = session.input.len();
    if idx < session.prompt.len() && session.prompt[idx] == removed && session.total_correct > 0 {
        session.total_correct -= 1;
    }
    if session.total_typed > 0 {
        session.total_typed -= 1;
    }
}
