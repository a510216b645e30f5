use crate::gateway::{DEFAULT_MODEL, OPENROUTER_API, SUMMARY_INPUT_CHARS};
use crate::layout::{DEFAULT_CHILD_RADIUS, DEFAULT_STAGGER, DEFAULT_TOPIC_RADIUS, RadialLayout};
use crate::source::{BLUESKY_XRPC, HACKER_NEWS_API, REDDIT_ORIGIN, SourceEndpoints, TraversalLimits};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const API_KEY_ENV: &str = "THREADWEAVER_API_KEY";
pub const OPENROUTER_KEY_ENV: &str = "OPENROUTER_API_KEY";
pub const DEFAULT_HISTORY_ENTRIES: usize = 20;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmSettings,
    pub sources: SourceSettings,
    pub layout: RadialLayout,
    pub history: HistorySettings,
}

#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub max_input_chars: usize,
}

#[derive(Debug, Clone)]
pub struct SourceSettings {
    pub limits: TraversalLimits,
    pub endpoints: SourceEndpoints,
}

#[derive(Debug, Clone)]
pub struct HistorySettings {
    pub max_entries: usize,
    pub path: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    llm: Option<RawLlm>,
    sources: Option<RawSources>,
    layout: Option<RawLayout>,
    history: Option<RawHistory>,
}

#[derive(Debug, Default, Deserialize)]
struct RawLlm {
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
    max_input_chars: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSources {
    max_comments: Option<usize>,
    max_depth: Option<usize>,
    hacker_news_url: Option<String>,
    reddit_url: Option<String>,
    bluesky_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawLayout {
    topic_radius: Option<f64>,
    child_radius: Option<f64>,
    stagger: Option<f64>,
    root_label: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawHistory {
    max_entries: Option<usize>,
    path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmSettings::default(),
            sources: SourceSettings::default(),
            layout: RadialLayout::default(),
            history: HistorySettings::default(),
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: OPENROUTER_API.to_string(),
            max_input_chars: SUMMARY_INPUT_CHARS,
        }
    }
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            limits: TraversalLimits::default(),
            endpoints: SourceEndpoints::default(),
        }
    }
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_HISTORY_ENTRIES,
            path: config_dir().join("history.json"),
        }
    }
}

/// `{config_dir}/threadweaver`, or `.threadweaver` when the platform has none.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("threadweaver"))
        .unwrap_or_else(|| PathBuf::from(".threadweaver"))
}

pub fn default_config_path() -> PathBuf {
    config_dir().join("config.toml")
}

impl Config {
    /// Load from `path`; a missing file yields the defaults.
    /// Environment API keys are applied on top either way.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)?
        } else {
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;
        let defaults = Self::default();

        let llm = raw.llm.unwrap_or_default();
        let sources = raw.sources.unwrap_or_default();
        let layout = raw.layout.unwrap_or_default();
        let history = raw.history.unwrap_or_default();

        Ok(Self {
            llm: LlmSettings {
                api_key: llm.api_key.filter(|k| !k.trim().is_empty()),
                model: llm.model.unwrap_or(defaults.llm.model),
                base_url: llm.base_url.unwrap_or(defaults.llm.base_url),
                max_input_chars: llm.max_input_chars.unwrap_or(SUMMARY_INPUT_CHARS),
            },
            sources: SourceSettings {
                limits: TraversalLimits {
                    max_comments: sources
                        .max_comments
                        .unwrap_or(defaults.sources.limits.max_comments),
                    max_depth: sources.max_depth.unwrap_or(defaults.sources.limits.max_depth),
                },
                endpoints: SourceEndpoints {
                    hacker_news: sources
                        .hacker_news_url
                        .unwrap_or_else(|| HACKER_NEWS_API.to_string()),
                    reddit: sources.reddit_url.unwrap_or_else(|| REDDIT_ORIGIN.to_string()),
                    bluesky: sources.bluesky_url.unwrap_or_else(|| BLUESKY_XRPC.to_string()),
                },
            },
            layout: RadialLayout {
                topic_radius: layout.topic_radius.unwrap_or(DEFAULT_TOPIC_RADIUS),
                child_radius: layout.child_radius.unwrap_or(DEFAULT_CHILD_RADIUS),
                stagger: layout.stagger.unwrap_or(DEFAULT_STAGGER),
                root_label: layout.root_label.unwrap_or(defaults.layout.root_label),
            },
            history: HistorySettings {
                max_entries: history.max_entries.unwrap_or(DEFAULT_HISTORY_ENTRIES),
                path: history.path.unwrap_or(defaults.history.path),
            },
        })
    }

    /// Let `THREADWEAVER_API_KEY` or `OPENROUTER_API_KEY` replace the configured key.
    pub fn apply_env(&mut self) {
        let from_env = [API_KEY_ENV, OPENROUTER_KEY_ENV]
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()));
        if let Some(key) = from_env {
            self.llm.api_key = Some(key);
        }
    }
}

pub fn generate_config_template() -> String {
    format!(
        r#"# threadweaver configuration

[llm]
# API key for the chat-completion endpoint. THREADWEAVER_API_KEY or
# OPENROUTER_API_KEY take precedence when set.
# api_key = "sk-or-..."
model = "{model}"
base_url = "{base_url}"
# Thread text beyond this many characters is cut off before summarizing
max_input_chars = {max_input}

[sources]
# Comments collected per thread, and how deep replies are followed
max_comments = {max_comments}
max_depth = {max_depth}

[layout]
topic_radius = {topic_radius:.1}
child_radius = {child_radius:.1}
stagger = {stagger:.1}

[history]
max_entries = {max_entries}
# path = "/path/to/history.json"
"#,
        model = DEFAULT_MODEL,
        base_url = OPENROUTER_API,
        max_input = SUMMARY_INPUT_CHARS,
        max_comments = TraversalLimits::default().max_comments,
        max_depth = TraversalLimits::default().max_depth,
        topic_radius = DEFAULT_TOPIC_RADIUS,
        child_radius = DEFAULT_CHILD_RADIUS,
        stagger = DEFAULT_STAGGER,
        max_entries = DEFAULT_HISTORY_ENTRIES,
    )
}
