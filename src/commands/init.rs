use crate::cli::InitArgs;
use crate::config::generate_config_template;
use crate::fs::{FileSystem, default_fs};
use crate::style;

use super::CommandContext;

pub fn cmd_init(args: InitArgs, ctx: &CommandContext) -> i32 {
    cmd_init_with_fs(args, ctx, default_fs())
}

pub fn cmd_init_with_fs(args: InitArgs, ctx: &CommandContext, fs: &dyn FileSystem) -> i32 {
    let config_path = args.path.unwrap_or_else(|| ctx.config_path.clone());
    if fs.exists(&config_path) {
        style::error(&format!(
            "config already exists at {}",
            style::path(&config_path)
        ));
        return 1;
    }

    if let Err(e) = fs.write(&config_path, &generate_config_template()) {
        style::error(&format!("Failed to write config file: {}", e));
        return 1;
    }

    style::success(&format!("Created config at {}", style::path(&config_path)));
    style::hint("add your API key under [llm], or set THREADWEAVER_API_KEY");
    0
}
