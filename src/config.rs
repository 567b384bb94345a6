use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

const WORDS_EN: &str = include_str!("../assets/words-en.json");

/// On-disk JSON config shape. Every field is optional; absent fields take
/// the built-in defaults so an empty `{}` file is a valid config.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_normal_words")]
    pub normal_words: Vec<String>,
    #[serde(default = "default_special_char_words")]
    pub special_char_words: Vec<String>,
    #[serde(default = "default_durations")]
    pub durations: Vec<String>,
    #[serde(default = "default_prompt_word_count")]
    pub prompt_word_count: usize,
    #[serde(default = "default_quote_endpoint")]
    pub quote_endpoint: String,
    /// Empty means the remote code source is not configured; code mode then
    /// serves from `code_examples` only.
    #[serde(default)]
    pub code_endpoint: String,
    #[serde(default = "default_code_examples")]
    pub code_examples: Vec<String>,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_normal_words() -> Vec<String> {
    serde_json::from_str(WORDS_EN).unwrap_or_default()
}

fn default_special_char_words() -> Vec<String> {
    [
        "!@#$", "%^&*", "()_+", "[]{}", "{}[]", "<>[]", "/?\\|", "`~", ";;::", "\"'\"'", "==!=",
        "++--", "<<>>", "||&&", "@@##", "$$%%", "^^~~", ".,<>", "///\\", "(()))",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_durations() -> Vec<String> {
    vec![
        "15s".to_string(),
        "30s".to_string(),
        "1m".to_string(),
        "2m".to_string(),
    ]
}

fn default_prompt_word_count() -> usize {
    18
}

fn default_quote_endpoint() -> String {
    "https://dummyjson.com/quotes/random".to_string()
}

fn default_code_examples() -> Vec<String> {
    vec![
        "for i := 0; i < 10; i++ { fmt.Println(i) }".to_string(),
        "if err != nil { return fmt.Errorf(\"failed: %w\", err) }".to_string(),
        "items := []string{\"go\", \"tui\"}; for _, it := range items { fmt.Println(it) }"
            .to_string(),
    ]
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            normal_words: default_normal_words(),
            special_char_words: default_special_char_words(),
            durations: default_durations(),
            prompt_word_count: default_prompt_word_count(),
            quote_endpoint: default_quote_endpoint(),
            code_endpoint: String::new(),
            code_examples: default_code_examples(),
            theme: default_theme(),
        }
    }
}

/// Validated config as consumed by the rest of the app, immutable for the
/// lifetime of a run.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub words: Vec<String>,
    pub special_char_words: Vec<String>,
    pub duration_options: Vec<Duration>,
    pub duration_labels: Vec<String>,
    pub prompt_word_count: usize,
    pub quote_endpoint: String,
    pub code_endpoint: String,
    pub code_examples: Vec<String>,
    pub theme: String,
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> Result<RuntimeConfig> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path(),
        };
        match fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: AppConfig = serde_json::from_str(&content)
                    .with_context(|| format!("parse config {}", path.display()))?;
                cfg.resolve()
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => AppConfig::default().resolve(),
            Err(err) => {
                Err(err).with_context(|| format!("read config {}", path.display()))
            }
        }
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("keyflow")
            .join("config.json")
    }

    pub fn resolve(&self) -> Result<RuntimeConfig> {
        if self.normal_words.is_empty() {
            bail!("normal_words must not be empty");
        }
        if self.special_char_words.is_empty() {
            bail!("special_char_words must not be empty");
        }
        if self.prompt_word_count == 0 {
            bail!("prompt_word_count must be > 0");
        }
        if self.durations.is_empty() {
            bail!("durations must not be empty");
        }

        let mut duration_options = Vec::with_capacity(self.durations.len());
        let mut duration_labels = Vec::with_capacity(self.durations.len());
        for raw in &self.durations {
            let duration =
                parse_duration(raw).with_context(|| format!("invalid duration {raw:?}"))?;
            duration_options.push(duration);
            duration_labels.push(raw.clone());
        }

        let quote_endpoint = match self.quote_endpoint.trim() {
            "" => default_quote_endpoint(),
            trimmed => trimmed.to_string(),
        };
        let code_examples = if self.code_examples.is_empty() {
            default_code_examples()
        } else {
            self.code_examples.clone()
        };

        Ok(RuntimeConfig {
            words: self.normal_words.clone(),
            special_char_words: self.special_char_words.clone(),
            duration_options,
            duration_labels,
            prompt_word_count: self.prompt_word_count,
            quote_endpoint,
            code_endpoint: self.code_endpoint.trim().to_string(),
            code_examples,
            theme: self.theme.clone(),
        })
    }
}

/// Parse compound duration strings such as `"15s"`, `"1m"` or `"1m30s"`.
pub fn parse_duration(raw: &str) -> Result<Duration> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("empty duration");
    }
    let mut total = Duration::ZERO;
    let mut value: Option<u64> = None;
    for c in trimmed.chars() {
        if let Some(digit) = c.to_digit(10) {
            value = Some(value.unwrap_or(0) * 10 + u64::from(digit));
            continue;
        }
        let Some(v) = value.take() else {
            bail!("unexpected {c:?}");
        };
        let secs = match c {
            's' => v,
            'm' => v * 60,
            'h' => v * 3600,
            _ => bail!("unknown unit {c:?}"),
        };
        total += Duration::from_secs(secs);
    }
    if value.is_some() {
        bail!("missing unit");
    }
    if total.is_zero() {
        bail!("must be > 0");
    }
    Ok(total)
}
