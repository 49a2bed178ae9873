use anyhow::{Result, bail};
use clap::Args;

use super::{Context, ensure_saved};

#[derive(Args, Debug, Clone)]
pub struct AnswerArgs {
    /// Question id
    pub id: String,
    /// New response, e.g. yes, no, partial or free text
    pub value: String,
}

#[derive(Args, Debug, Clone)]
pub struct DetailArgs {
    /// Question id
    pub id: String,
    pub text: String,
}

#[derive(Args, Debug, Clone)]
pub struct GradientArgs {
    /// Gradient question id
    pub id: String,
    /// Rise of the ramp
    #[arg(long)]
    pub height: Option<String>,
    /// Run of the ramp
    #[arg(long)]
    pub length: Option<String>,
}

pub fn run_answer(ctx: &mut Context, args: AnswerArgs) -> Result<()> {
    let status = ctx.session.set_response(&args.id, args.value)?;
    ensure_saved(status)?;
    report_hidden(ctx);
    Ok(())
}

pub fn run_detail(ctx: &mut Context, args: DetailArgs) -> Result<()> {
    ensure_saved(ctx.session.set_detail(&args.id, args.text)?)
}

pub fn run_gradient(ctx: &mut Context, args: GradientArgs) -> Result<()> {
    if args.height.is_none() && args.length.is_none() {
        bail!("pass --height, --length or both");
    }
    if let Some(height) = args.height {
        ensure_saved(ctx.session.set_height(&args.id, height)?)?;
    }
    if let Some(length) = args.length {
        ensure_saved(ctx.session.set_length(&args.id, length)?)?;
    }
    Ok(())
}

fn report_hidden(ctx: &Context) {
    let hidden = ctx.session.hidden();
    if !hidden.is_empty() {
        let ids: Vec<_> = hidden.into_iter().collect();
        println!("hidden by answers: {}", ids.join(", "));
    }
}
