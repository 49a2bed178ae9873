use anyhow::{Result, bail};

use super::Context;

pub fn run(ctx: &Context) -> Result<()> {
    let result = ctx.session.validate();
    if !result.valid {
        bail!(
            "Please enter height and length for all ramps marked Yes. Incomplete: {}",
            result.invalid_ids.join(", ")
        );
    }
    println!("All ramps marked yes have both measurements.");
    Ok(())
}
