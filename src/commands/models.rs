use crate::api;
use crate::style;

use super::{CommandContext, runtime};

pub fn cmd_models(ctx: &CommandContext) -> i32 {
    let rt = match runtime() {
        Ok(rt) => rt,
        Err(code) => return code,
    };

    let models = match rt.block_on(api::gateway(&ctx.config).list_models()) {
        Ok(models) => models,
        Err(e) => {
            style::error(&e.to_string());
            return 1;
        }
    };

    style::header(&format!("{} model(s)", models.len()));
    for model in &models {
        let marker = if model.id == ctx.config.llm.model { "*" } else { " " };
        print!("{} {}", marker, model.id);
        if !model.name.is_empty() && model.name != model.id {
            print!("  ({})", model.name);
        }
        println!();
        if let Some(context) = model.context_length {
            println!("{}", style::metric("context", context));
        }
        if let Some(pricing) = &model.pricing {
            println!(
                "{}",
                style::metric("price", format!("{} / {}", pricing.prompt, pricing.completion))
            );
        }
    }
    0
}
