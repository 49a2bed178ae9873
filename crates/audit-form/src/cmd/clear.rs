use anyhow::{Result, bail};
use clap::Args;

use super::Context;

#[derive(Args, Debug, Clone)]
pub struct ClearArgs {
    /// Confirm deleting every answer and image
    #[arg(long)]
    pub yes: bool,
}

pub fn run(ctx: &mut Context, args: ClearArgs) -> Result<()> {
    if !args.yes {
        bail!("refusing to clear saved answers and images without --yes");
    }
    ctx.session.clear(&mut ctx.images)?;
    println!("cleared saved data in {}", ctx.data_dir.display());
    Ok(())
}
