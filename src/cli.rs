use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "threadweaver")]
#[command(about = "Weave discussion threads into topic mind-maps")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Fetch, summarize and lay out a thread
    Weave(WeaveArgs),

    /// Fetch a thread and print its flattened text
    Fetch(FetchArgs),

    /// Ask a question about a woven thread
    Chat(ChatArgs),

    /// Open a woven thread in the browser viewer
    Serve(ServeArgs),

    /// List, show or delete past threads
    History(HistoryArgs),

    /// List the models offered by the LLM API
    Models,

    /// Write a starter config file
    Init(InitArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct WeaveArgs {
    /// Thread URL (Hacker News, Reddit or Bluesky) or Hacker News item id
    pub input: String,

    /// Model id (overrides the config)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "markdown")]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Start the viewer after weaving
    #[arg(long)]
    pub serve: bool,

    /// Port for the viewer
    #[arg(long, default_value = "3000")]
    pub port: u16,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,

    /// Export the graph as a static HTML page
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Do not record this thread in history
    #[arg(long)]
    pub no_history: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct FetchArgs {
    /// Thread URL or Hacker News item id
    pub input: String,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct ChatArgs {
    /// Question about the thread
    pub question: String,

    /// History entry id or graph JSON file
    #[arg(long)]
    pub from: String,

    /// Model id (overrides the config)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Write the augmented graph JSON here (history entries are updated in place)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    /// History entry id or graph JSON file
    #[arg(long)]
    pub from: String,

    /// Port for the viewer
    #[arg(long, default_value = "3000")]
    pub port: u16,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub action: Option<HistoryAction>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum HistoryAction {
    /// List saved threads, newest first (default)
    List,
    /// Print a saved graph
    Show {
        id: String,
        #[arg(short, long, default_value = "markdown")]
        format: OutputFormat,
    },
    /// Remove one entry
    Delete { id: String },
    /// Remove all entries
    Clear,
}

#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Where to write the file (defaults to the user config path)
    #[arg(long)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}
