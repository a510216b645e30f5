mod chat;
mod fetch;
mod history;
mod init;
mod models;
mod serve;
mod weave;

pub use chat::cmd_chat;
pub use fetch::cmd_fetch;
pub use history::cmd_history;
pub use init::{cmd_init, cmd_init_with_fs};
pub use models::cmd_models;
pub use serve::cmd_serve;
pub use weave::cmd_weave;

use crate::cli::OutputFormat;
use crate::config::{Config, default_config_path};
use crate::fs::{FileSystem, default_fs};
use crate::history::HistoryStore;
use crate::output::{GraphDocument, JsonOutput, MarkdownOutput, render_to_string};
use crate::style;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Shared context for command execution, reducing boilerplate across commands.
pub struct CommandContext {
    pub config_path: PathBuf,
    pub config: Config,
}

impl CommandContext {
    /// Load the config at `path` (or the default location). A broken config
    /// file is reported and replaced by defaults.
    pub fn new(path: Option<&Path>) -> Self {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);

        let config = Config::load(&config_path).unwrap_or_else(|e| {
            style::warning(&format!("Failed to load config: {}. Using defaults.", e));
            let mut config = Config::default();
            config.apply_env();
            config
        });

        Self {
            config_path,
            config,
        }
    }

    pub fn history(&self) -> HistoryStore<'static> {
        HistoryStore::new(
            default_fs(),
            self.config.history.path.clone(),
            self.config.history.max_entries,
        )
    }

    /// Config with the model replaced when one was given on the command line.
    pub fn config_with_model(&self, model: Option<&str>) -> Config {
        let mut config = self.config.clone();
        if let Some(model) = model {
            config.llm.model = model.to_string();
        }
        config
    }

    /// Fail early with a hint when no API key is available.
    pub fn require_api_key(&self) -> Result<(), i32> {
        if self.config.llm.api_key.is_some() {
            return Ok(());
        }
        style::error("No API key configured");
        style::hint(&format!(
            "set THREADWEAVER_API_KEY, or add api_key under [llm] in {}",
            style::path(&self.config_path)
        ));
        Err(1)
    }
}

pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, i32> {
    tokio::runtime::Runtime::new().map_err(|e| {
        style::error(&format!("Failed to start async runtime: {}", e));
        1
    })
}

/// Write `content` to `output`, or to stdout when no file is given.
pub(crate) fn write_output(content: &str, output: Option<&Path>, fs: &dyn FileSystem) -> i32 {
    match output {
        Some(path) => {
            if let Err(e) = fs.write(path, content) {
                style::error(&format!("Failed to write {}: {}", style::path(path), e));
                return 1;
            }
            style::success(&format!("Wrote {}", style::path(path)));
            0
        }
        None => {
            let mut stdout = std::io::stdout();
            if let Err(e) = stdout.write_all(content.as_bytes()) {
                style::error(&format!("Failed to write output: {}", e));
                return 1;
            }
            0
        }
    }
}

/// Format a document and write it out. Markdown on a terminal is rendered.
pub(crate) fn emit_document(
    document: &GraphDocument,
    format: OutputFormat,
    output: Option<&Path>,
) -> i32 {
    let rendered = match format {
        OutputFormat::Json => render_to_string(&JsonOutput::new(), document),
        OutputFormat::Markdown => render_to_string(&MarkdownOutput::new(), document),
    };
    let content = match rendered {
        Ok(content) => content,
        Err(e) => {
            style::error(&format!("Failed to format output: {}", e));
            return 1;
        }
    };

    if output.is_none() && matches!(format, OutputFormat::Markdown) && style::is_terminal() {
        if let Err(e) = style::render_markdown(&content, &mut std::io::stdout()) {
            style::error(&format!("Failed to write output: {}", e));
            return 1;
        }
        return 0;
    }
    write_output(&content, output, default_fs())
}
