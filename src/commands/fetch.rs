use crate::api;
use crate::cli::FetchArgs;
use crate::fs::default_fs;
use crate::style;

use super::{CommandContext, runtime, write_output};

pub fn cmd_fetch(args: FetchArgs, ctx: &CommandContext) -> i32 {
    let rt = match runtime() {
        Ok(rt) => rt,
        Err(code) => return code,
    };

    style::status(&format!("Fetching {}", style::url(&args.input)));
    let thread = match rt.block_on(api::fetch_thread(&args.input, &ctx.config)) {
        Ok(thread) => thread,
        Err(e) => {
            style::error(&e.to_string());
            return 1;
        }
    };

    let content = format!(
        "# {}\nsource: {}\n\n{}\n",
        thread.title, thread.source, thread.text
    );
    write_output(&content, args.output.as_deref(), default_fs())
}
