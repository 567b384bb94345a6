use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crate::config::RuntimeConfig;
use crate::event::AppEvent;
use crate::prompt::source::FetchFailure;
use crate::prompt::{Mode, NextPrompt, PromptService};
use crate::session::input;
use crate::session::result::SessionResult;
use crate::session::state::SessionState;
use crate::store::{HistoryStore, SessionHistory};
use crate::ui::components::menu::MenuItem;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Splash,
    ModeSelect,
    DurationSelect,
    Typing,
    Done,
}

pub struct App {
    pub screen: AppScreen,
    pub cfg: RuntimeConfig,
    pub theme: &'static Theme,
    pub prompts: PromptService,
    pub session: Option<SessionState>,
    pub mode_items: Vec<MenuItem>,
    pub duration_items: Vec<MenuItem>,
    pub mode_selected: usize,
    pub duration_selected: usize,
    pub history: SessionHistory,
    pub last_result: Option<SessionResult>,
    pub should_quit: bool,
    store: Option<HistoryStore>,
    fetch_seq: u64,
    pending_fetch: Option<u64>,
    tx: mpsc::Sender<AppEvent>,
}

fn mode_description(mode: Mode) -> &'static str {
    match mode {
        Mode::Normal => "Random words from your word list",
        Mode::SpecialChars => "Symbol clusters for the hard-to-reach keys",
        Mode::Quote => "Quotes fetched from the web",
        Mode::Code => "Flattened code snippets",
    }
}

impl App {
    pub fn new(cfg: RuntimeConfig, tx: mpsc::Sender<AppEvent>) -> Self {
        let theme = Theme::load(&cfg.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(theme));

        let store = HistoryStore::new().ok();
        let history = store
            .as_ref()
            .map(|s| s.load_history())
            .unwrap_or_default();

        let mode_items = Mode::ALL
            .iter()
            .enumerate()
            .map(|(i, mode)| {
                MenuItem::new(&(i + 1).to_string(), mode.label(), mode_description(*mode))
            })
            .collect();
        let duration_items = cfg
            .duration_labels
            .iter()
            .enumerate()
            .map(|(i, label)| MenuItem::new(&(i + 1).to_string(), label, ""))
            .collect();
        let duration_selected = cfg
            .duration_options
            .iter()
            .position(|d| *d == Duration::from_secs(30))
            .unwrap_or(0);

        let prompts = PromptService::new(&cfg);

        Self {
            screen: AppScreen::Splash,
            cfg,
            theme,
            prompts,
            session: None,
            mode_items,
            duration_items,
            mode_selected: 0,
            duration_selected,
            history,
            last_result: None,
            should_quit: false,
            store,
            fetch_seq: 0,
            pending_fetch: None,
            tx,
        }
    }

    pub fn selected_mode(&self) -> Mode {
        Mode::ALL[self.mode_selected.min(Mode::ALL.len() - 1)]
    }

    pub fn selected_duration(&self) -> Duration {
        self.cfg.duration_options[self.duration_selected.min(self.cfg.duration_options.len() - 1)]
    }

    pub fn mode_prev(&mut self) {
        self.mode_selected = if self.mode_selected == 0 {
            self.mode_items.len() - 1
        } else {
            self.mode_selected - 1
        };
    }

    pub fn mode_next(&mut self) {
        self.mode_selected = (self.mode_selected + 1) % self.mode_items.len();
    }

    pub fn duration_prev(&mut self) {
        self.duration_selected = if self.duration_selected == 0 {
            self.duration_items.len() - 1
        } else {
            self.duration_selected - 1
        };
    }

    pub fn duration_next(&mut self) {
        self.duration_selected = (self.duration_selected + 1) % self.duration_items.len();
    }

    pub fn is_fetching(&self) -> bool {
        self.pending_fetch.is_some()
    }

    pub fn start_session(&mut self) {
        let mode = self.selected_mode();
        let duration = self.selected_duration();
        self.session = Some(SessionState::new(mode, duration));
        self.last_result = None;
        self.pending_fetch = None;
        self.screen = AppScreen::Typing;
        self.advance_prompt();
    }

    pub fn abort_session(&mut self) {
        self.session = None;
        self.pending_fetch = None;
        self.screen = AppScreen::ModeSelect;
    }

    /// One typed code point from the input thread. Finish checks run first,
    /// regeneration happens lazily on overflow, and remote modes advance
    /// eagerly once the prompt is consumed.
    pub fn type_char(&mut self, ch: char) {
        self.maybe_finish(Instant::now());
        if self.screen != AppScreen::Typing || self.pending_fetch.is_some() {
            return;
        }
        if self
            .session
            .as_ref()
            .is_some_and(SessionState::buffer_full)
        {
            self.advance_prompt();
            if self.pending_fetch.is_some() {
                return;
            }
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        input::process_char(session, ch);
        let advance_now = session.mode.is_remote() && session.buffer_full();
        if advance_now {
            self.advance_prompt();
        }
    }

    pub fn backspace(&mut self) {
        self.maybe_finish(Instant::now());
        if self.screen != AppScreen::Typing || self.pending_fetch.is_some() {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            input::process_backspace(session);
        }
    }

    pub fn on_tick(&mut self) {
        self.maybe_finish(Instant::now());
    }

    /// A fetch worker finished. Stale completions (reset, abort, mode
    /// switch) are dropped by the sequence check.
    pub fn on_prompt_ready(
        &mut self,
        mode: Mode,
        seq: u64,
        outcome: Result<String, FetchFailure>,
    ) {
        if self.pending_fetch != Some(seq) {
            return;
        }
        self.pending_fetch = None;
        if self.screen != AppScreen::Typing {
            return;
        }
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if session.mode != mode {
            return;
        }
        let previous = session.prompt_string();
        let text = self.prompts.resolve(mode, &previous, outcome, Instant::now());
        if let Some(session) = self.session.as_mut() {
            session.install_prompt(&text);
        }
    }

    fn advance_prompt(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let mode = session.mode;
        let previous = session.prompt_string();
        match self.prompts.next(mode, &previous, Instant::now()) {
            NextPrompt::Ready(text) => {
                if let Some(session) = self.session.as_mut() {
                    session.install_prompt(&text);
                }
            }
            NextPrompt::Fetch(job) => {
                self.fetch_seq += 1;
                let seq = self.fetch_seq;
                self.pending_fetch = Some(seq);
                let tx = self.tx.clone();
                thread::spawn(move || {
                    let outcome = job.run();
                    let _ = tx.send(AppEvent::PromptReady { mode, seq, outcome });
                });
            }
        }
    }

    fn maybe_finish(&mut self, now: Instant) {
        if self.screen != AppScreen::Typing {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.finish_if_due(now) {
            let result = SessionResult::from_session(session);
            self.history.sessions.push(result.clone());
            if let Some(store) = &self.store {
                let _ = store.save_history(&self.history);
            }
            self.last_result = Some(result);
            self.screen = AppScreen::Done;
        }
    }
}

/// Map a digit key to a menu index, rejecting anything outside `1..=max`.
pub fn pick_index_from_key(ch: char, max: usize) -> Option<usize> {
    let digit = ch.to_digit(10)? as usize;
    if (1..=max).contains(&digit) {
        Some(digit - 1)
    } else {
        None
    }
}

pub fn quick_pick_hint(max: usize) -> String {
    if max <= 1 {
        "1".to_string()
    } else {
        format!("1-{max}")
    }
}
