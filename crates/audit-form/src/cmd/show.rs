use anyhow::Result;
use audit_spec::{render_json_ui, render_text};
use clap::Args;

use super::Context;

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Print the display list as JSON
    #[arg(long)]
    pub json: bool,
    /// Show the second instance of a duplicate group (repeatable)
    #[arg(long, value_name = "GROUP")]
    pub expand: Vec<String>,
}

pub fn run(ctx: &mut Context, args: ShowArgs) -> Result<()> {
    for group in args.expand {
        ctx.session.expand_duplicate(group);
    }
    let items = ctx.session.display_list();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&render_json_ui(&items))?);
    } else {
        println!("{}", render_text(&items));
    }
    Ok(())
}
