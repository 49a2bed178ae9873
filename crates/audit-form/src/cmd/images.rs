use std::fs;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;

use super::{Context, ensure_saved};

#[derive(Args, Debug, Clone)]
pub struct AttachArgs {
    /// Image question id
    pub id: String,
    /// Image file to attach
    pub file: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct DetachArgs {
    /// Image question id
    pub id: String,
    /// Zero-based position in the question's image list
    pub index: usize,
}

pub fn run_attach(ctx: &mut Context, args: AttachArgs) -> Result<()> {
    let bytes = fs::read(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let limit = ctx.config.max_upload_bytes();
    let status = ctx
        .session
        .attach_image(&args.id, &bytes, &mut ctx.images, limit)?;
    ensure_saved(status)?;
    if let Some(reference) = ctx
        .session
        .question(&args.id)
        .and_then(|working| working.answer.image_list.last())
    {
        println!("{reference}");
    }
    Ok(())
}

pub fn run_detach(ctx: &mut Context, args: DetachArgs) -> Result<()> {
    let status = ctx
        .session
        .remove_image(&args.id, args.index, &mut ctx.images)?;
    ensure_saved(status)
}
