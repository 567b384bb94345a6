pub mod backoff;
pub mod sanitize;
pub mod source;
pub mod words;

use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::RuntimeConfig;
use crate::prompt::backoff::BackoffGate;
use crate::prompt::source::{FetchFailure, RemoteSource};
use crate::prompt::words::{pick_different, sample_words};

const NORMAL_FALLBACK: &str = "the quick brown fox jumps over the lazy dog.";
const SPECIAL_FALLBACK: &str = "!@#$ %^&* ()_+ []{} <>? /\\| `~ ;;:: ++--.";
const QUOTE_EMPTY_FALLBACK: &str = "keep typing with steady rhythm.";
const CODE_EMPTY_FALLBACK: &str = "fmt.Println(\"hello, keyflow\")";

const FALLBACK_QUOTES: [&str; 3] = [
    "Type with calm precision and let rhythm do the heavy lifting.",
    "Progress in typing is consistency repeated over short focused sessions.",
    "Accuracy builds speed; speed without accuracy always stalls.",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Normal,
    SpecialChars,
    Quote,
    Code,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Normal, Mode::SpecialChars, Mode::Quote, Mode::Code];

    pub fn label(self) -> &'static str {
        match self {
            Mode::Normal => "Normal",
            Mode::SpecialChars => "Special Chars Practice",
            Mode::Quote => "Quote Practice",
            Mode::Code => "Code Practice",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::SpecialChars => "special",
            Mode::Quote => "quote",
            Mode::Code => "code",
        }
    }

    /// Remote modes advance eagerly once the prompt is consumed and source
    /// their content over the network.
    pub fn is_remote(self) -> bool {
        matches!(self, Mode::Quote | Mode::Code)
    }
}

/// What prompt selection decided: either text ready to install, or a fetch
/// invocation the caller must run off the event loop.
pub enum NextPrompt {
    Ready(String),
    Fetch(FetchJob),
}

/// A remote invocation, detached from the service so it can run on a worker
/// thread. `run` blocks for up to the full retry window.
pub struct FetchJob {
    pub mode: Mode,
    pub previous: String,
    source: RemoteSource,
}

impl FetchJob {
    pub fn run(&self) -> Result<String, FetchFailure> {
        match self.mode {
            Mode::Quote => self.source.fetch_quote(&self.previous),
            Mode::Code => self.source.fetch_code(&self.previous),
            Mode::Normal | Mode::SpecialChars => Err(FetchFailure::Error(
                source::FetchError::EndpointUnconfigured,
            )),
        }
    }
}

/// Produces the next prompt per mode: local word sampling, remote fetch
/// gated by per-source backoff, and static fallback pools. One instance per
/// running session; all mutable state (gates, RNG) lives here.
pub struct PromptService {
    words: Vec<String>,
    special_char_words: Vec<String>,
    word_count: usize,
    code_examples: Vec<String>,
    fallback_quotes: Vec<String>,
    source: RemoteSource,
    pub quote_gate: BackoffGate,
    pub code_gate: BackoffGate,
    rng: SmallRng,
}

impl PromptService {
    pub fn new(cfg: &RuntimeConfig) -> Self {
        Self {
            words: cfg.words.clone(),
            special_char_words: cfg.special_char_words.clone(),
            word_count: cfg.prompt_word_count,
            code_examples: cfg.code_examples.clone(),
            fallback_quotes: FALLBACK_QUOTES.iter().map(|s| s.to_string()).collect(),
            source: RemoteSource::new(cfg.quote_endpoint.clone(), cfg.code_endpoint.clone()),
            quote_gate: BackoffGate::default(),
            code_gate: BackoffGate::default(),
            rng: SmallRng::from_entropy(),
        }
    }

    /// Decide the next prompt for `mode`. Word modes always resolve
    /// immediately; remote modes resolve immediately only when the gate is
    /// in cooldown or the endpoint is unconfigured, otherwise they hand back
    /// a job whose outcome must be fed to [`PromptService::resolve`].
    pub fn next(&mut self, mode: Mode, previous: &str, now: Instant) -> NextPrompt {
        match mode {
            Mode::Normal | Mode::SpecialChars => NextPrompt::Ready(self.sample(mode, previous)),
            Mode::Quote => {
                if self.quote_gate.should_skip(now) {
                    NextPrompt::Ready(self.fallback(mode, previous))
                } else {
                    NextPrompt::Fetch(self.job(mode, previous))
                }
            }
            Mode::Code => {
                if self.code_gate.should_skip(now) || self.source.code_endpoint.trim().is_empty() {
                    NextPrompt::Ready(self.fallback(mode, previous))
                } else {
                    NextPrompt::Fetch(self.job(mode, previous))
                }
            }
        }
    }

    /// Fold a fetch outcome back in. Success is used as-is (the retry loop
    /// already guaranteed it differs from `previous`); a failed invocation
    /// trips the source's gate and the fallback pool serves instead.
    pub fn resolve(
        &mut self,
        mode: Mode,
        previous: &str,
        outcome: Result<String, FetchFailure>,
        now: Instant,
    ) -> String {
        match outcome {
            Ok(content) => content,
            Err(failure) => {
                if matches!(failure, FetchFailure::Error(_)) {
                    match mode {
                        Mode::Quote => self.quote_gate.trip(now),
                        Mode::Code => self.code_gate.trip(now),
                        Mode::Normal | Mode::SpecialChars => {}
                    }
                }
                self.fallback(mode, previous)
            }
        }
    }

    fn job(&self, mode: Mode, previous: &str) -> FetchJob {
        FetchJob {
            mode,
            previous: previous.to_string(),
            source: self.source.clone(),
        }
    }

    fn sample(&mut self, mode: Mode, previous: &str) -> String {
        match mode {
            Mode::SpecialChars => sample_words(
                &mut self.rng,
                &self.special_char_words,
                self.word_count,
                previous,
                SPECIAL_FALLBACK,
            ),
            _ => sample_words(
                &mut self.rng,
                &self.words,
                self.word_count,
                previous,
                NORMAL_FALLBACK,
            ),
        }
    }

    fn fallback(&mut self, mode: Mode, previous: &str) -> String {
        match mode {
            Mode::Quote => pick_different(
                &mut self.rng,
                &self.fallback_quotes,
                previous,
                QUOTE_EMPTY_FALLBACK,
            ),
            Mode::Code => pick_different(
                &mut self.rng,
                &self.code_examples,
                previous,
                CODE_EMPTY_FALLBACK,
            ),
            Mode::Normal | Mode::SpecialChars => self.sample(mode, previous),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn service(quote_endpoint: &str, code_endpoint: &str) -> PromptService {
        let cfg = AppConfig {
            normal_words: vec!["alpha".into(), "beta".into(), "gamma".into()],
            special_char_words: vec!["!@#".into(), "$%^".into()],
            prompt_word_count: 4,
            quote_endpoint: quote_endpoint.to_string(),
            code_endpoint: code_endpoint.to_string(),
            code_examples: vec!["fmt.Println(\"a\")".into(), "fmt.Println(\"b\")".into()],
            ..AppConfig::default()
        };
        PromptService::new(&cfg.resolve().unwrap())
    }

    #[test]
    fn normal_mode_is_ready_and_non_empty() {
        let mut service = service("https://example.test/quote", "");
        match service.next(Mode::Normal, "", Instant::now()) {
            NextPrompt::Ready(prompt) => {
                assert!(!prompt.is_empty());
                assert!(prompt.ends_with('.'));
            }
            NextPrompt::Fetch(_) => panic!("word modes never fetch"),
        }
    }

    #[test]
    fn quote_mode_fetches_when_gate_is_open() {
        let mut service = service("https://example.test/quote", "");
        assert!(matches!(
            service.next(Mode::Quote, "", Instant::now()),
            NextPrompt::Fetch(_)
        ));
    }

    #[test]
    fn quote_mode_falls_back_while_gate_cooling_down() {
        let mut service = service("https://example.test/quote", "");
        let now = Instant::now();
        service.quote_gate.trip(now);
        match service.next(Mode::Quote, "", now) {
            NextPrompt::Ready(prompt) => {
                assert!(FALLBACK_QUOTES.contains(&prompt.as_str()));
            }
            NextPrompt::Fetch(_) => panic!("gate in cooldown must not fetch"),
        }
    }

    #[test]
    fn code_mode_without_endpoint_rotates_fallback_examples() {
        let mut service = service("https://example.test/quote", "");
        let previous = "fmt.Println(\"a\")";
        match service.next(Mode::Code, previous, Instant::now()) {
            NextPrompt::Ready(prompt) => assert_eq!(prompt, "fmt.Println(\"b\")"),
            NextPrompt::Fetch(_) => panic!("unconfigured endpoint must not fetch"),
        }
    }

    #[test]
    fn resolve_error_trips_gate_and_serves_fallback() {
        let mut service = service("https://example.test/quote", "");
        let now = Instant::now();
        let outcome = Err(FetchFailure::Error(source::FetchError::Status(503)));
        let prompt = service.resolve(Mode::Quote, "", outcome, now);
        assert!(FALLBACK_QUOTES.contains(&prompt.as_str()));
        assert!(service.quote_gate.should_skip(now + std::time::Duration::from_millis(1)));
    }

    #[test]
    fn resolve_repeats_only_does_not_trip_gate() {
        let mut service = service("https://example.test/quote", "");
        let now = Instant::now();
        let prompt = service.resolve(Mode::Quote, "", Err(FetchFailure::RepeatsOnly), now);
        assert!(!prompt.is_empty());
        assert!(!service.quote_gate.should_skip(now + std::time::Duration::from_millis(1)));
    }

    #[test]
    fn resolve_success_passes_content_through() {
        let mut service = service("https://example.test/quote", "");
        let prompt = service.resolve(
            Mode::Quote,
            "old",
            Ok("recovered quote".to_string()),
            Instant::now(),
        );
        assert_eq!(prompt, "recovered quote");
    }
}
