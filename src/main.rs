use clap::Parser;
use threadweaver::cli::{Cli, Command};
use threadweaver::{
    CommandContext, cmd_chat, cmd_fetch, cmd_history, cmd_init, cmd_models, cmd_serve, cmd_weave,
};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default = if verbose { "threadweaver=info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = CommandContext::new(cli.config.as_deref());

    let exit_code = match cli.command {
        Command::Weave(args) => cmd_weave(args, &ctx),
        Command::Fetch(args) => cmd_fetch(args, &ctx),
        Command::Chat(args) => cmd_chat(args, &ctx),
        Command::Serve(args) => cmd_serve(args, &ctx),
        Command::History(args) => cmd_history(args, &ctx),
        Command::Models => cmd_models(&ctx),
        Command::Init(args) => cmd_init(args, &ctx),
    };

    std::process::exit(exit_code);
}
