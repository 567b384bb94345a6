//! Behavioral coverage of the typing state machine and prompt rotation
//! through the public app surface: correction repair, backspace counter
//! consistency, no-repeat word generation, and lazy vs eager prompt
//! advancement.

use std::sync::mpsc;
use std::time::{Duration, Instant};

use keyflow::app::App;
use keyflow::config::AppConfig;
use keyflow::prompt::{Mode, NextPrompt, PromptService};
use keyflow::session::input::{process_backspace, process_char};
use keyflow::session::state::SessionState;

fn config(words: &[&str], word_count: usize) -> AppConfig {
    AppConfig {
        normal_words: words.iter().map(|w| w.to_string()).collect(),
        special_char_words: vec!["!@#".into(), "$%^".into()],
        prompt_word_count: word_count,
        quote_endpoint: "https://example.test/quote".into(),
        code_endpoint: String::new(),
        code_examples: vec!["fmt.Println(\"a\")".into(), "fmt.Println(\"b\")".into()],
        ..AppConfig::default()
    }
}

fn session(prompt: &str) -> SessionState {
    let mut state = SessionState::new(Mode::Normal, Duration::from_secs(30));
    state.install_prompt(prompt);
    state
}

#[test]
fn correction_repair_rewrites_previous_slot() {
    let mut state = session("ab");

    process_char(&mut state, 'x');
    assert_eq!(state.input, vec!['x']);
    assert_eq!(state.total_typed, 1);
    assert_eq!(state.total_correct, 0);

    process_char(&mut state, 'a');
    assert_eq!(state.input, vec!['a']);
    assert_eq!(state.total_typed, 2);
    assert_eq!(state.total_correct, 1);
}

#[test]
fn backspace_keeps_counters_consistent_with_visible_buffer() {
    let mut state = session("typing drills");
    let script: &[(char, bool)] = &[
        ('t', false),
        ('y', false),
        ('x', false),
        (' ', true),
        (' ', true),
        ('y', false),
        ('p', false),
        ('q', false),
        (' ', true),
        ('i', false),
    ];

    for &(ch, is_backspace) in script {
        let correct_before = state.total_correct;
        let removed_was_correct = is_backspace
            && state
                .input
                .last()
                .is_some_and(|&last| {
                    state.prompt.get(state.input.len() - 1) == Some(&last)
                });

        if is_backspace {
            process_backspace(&mut state);
        } else {
            process_char(&mut state, ch);
        }

        assert!(state.total_correct <= state.total_typed);
        if state.total_correct < correct_before {
            assert!(removed_was_correct);
        }
    }
}

#[test]
fn word_generator_avoids_previous_prompt() {
    let cfg = config(&["alpha", "beta"], 3).resolve().unwrap();
    let mut service = PromptService::new(&cfg);

    let mut previous = String::new();
    for _ in 0..20 {
        match service.next(Mode::Normal, &previous, Instant::now()) {
            NextPrompt::Ready(prompt) => {
                assert_ne!(prompt, previous);
                assert!(prompt.ends_with('.'));
                previous = prompt;
            }
            NextPrompt::Fetch(_) => panic!("word modes never fetch"),
        }
    }
}

#[test]
fn degenerate_single_word_list_terminates_with_fallback() {
    let cfg = config(&["alpha"], 2).resolve().unwrap();
    let mut service = PromptService::new(&cfg);

    match service.next(Mode::Normal, "alpha alpha.", Instant::now()) {
        NextPrompt::Ready(prompt) => {
            assert_eq!(prompt, "the quick brown fox jumps over the lazy dog.");
        }
        NextPrompt::Fetch(_) => panic!("word modes never fetch"),
    }
}

#[test]
fn word_mode_waits_for_overflow_keystroke_before_regenerating() {
    let (tx, _rx) = mpsc::channel();
    let mut app = App::new(config(&["alpha", "beta", "gamma"], 3).resolve().unwrap(), tx);
    app.mode_selected = 0;
    app.start_session();

    let first = app.session.as_ref().unwrap().prompt_string();
    for ch in first.chars() {
        app.type_char(ch);
    }

    let state = app.session.as_ref().unwrap();
    assert!(state.buffer_full());
    assert_eq!(state.prompt_string(), first);

    app.type_char('z');
    let state = app.session.as_ref().unwrap();
    assert_ne!(state.prompt_string(), first);
}

#[test]
fn quote_mode_advances_as_soon_as_prompt_is_consumed() {
    let (tx, _rx) = mpsc::channel();
    let mut app = App::new(config(&["alpha", "beta"], 3).resolve().unwrap(), tx);
    // Cooling gate keeps the whole test on the synchronous fallback path.
    app.prompts.quote_gate.trip(Instant::now());
    app.mode_selected = 2;
    app.start_session();

    let first = app.session.as_ref().unwrap().prompt_string();
    assert!(!first.is_empty());
    for ch in first.chars() {
        app.type_char(ch);
    }

    let state = app.session.as_ref().unwrap();
    assert_ne!(state.prompt_string(), first);
    assert!(state.input.is_empty());
}

#[test]
fn session_finishes_exactly_once_when_duration_elapses() {
    let mut state = session("ab");
    let start = Instant::now();
    state.started_at = Some(start);

    assert!(!state.finish_if_due(start + Duration::from_secs(29)));
    assert!(state.finish_if_due(start + Duration::from_secs(30)));
    assert!(!state.finish_if_due(start + Duration::from_secs(31)));
    assert!(state.is_finished());
    assert_eq!(state.remaining_secs(), 0.0);
}
