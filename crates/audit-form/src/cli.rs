use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::cmd::{
    self, answer::AnswerArgs, answer::DetailArgs, answer::GradientArgs, clear::ClearArgs,
    export::ExportCommand, images::AttachArgs, images::DetachArgs, show::ShowArgs,
};
use crate::config::DATA_DIR_ENV;

#[derive(Parser, Debug)]
#[command(
    name = "audit-form",
    about = "Fill in and export an accessibility audit questionnaire",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Config file (defaults to the per-user config.toml)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding answers.json and user_images/
    #[arg(long, value_name = "DIR", global = true, env = DATA_DIR_ENV)]
    pub data_dir: Option<PathBuf>,

    /// Questionnaire JSON replacing the built-in one
    #[arg(long, value_name = "FILE", global = true)]
    pub schema: Option<PathBuf>,

    /// More log output (repeatable)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the questions currently on screen
    Show(ShowArgs),
    /// Set the main response of a question
    Answer(AnswerArgs),
    /// Set the supplementary text of a question
    Detail(DetailArgs),
    /// Record ramp measurements for a gradient question
    Gradient(GradientArgs),
    /// Attach an image to an image question
    Attach(AttachArgs),
    /// Remove an attached image by position
    Detach(DetachArgs),
    /// Check that every ramp marked yes has both measurements
    Validate,
    /// Export the report
    #[command(subcommand)]
    Export(ExportCommand),
    /// Delete all answers and images
    Clear(ClearArgs),
    /// Print the JSON schema of the questionnaire file
    Schema,
}

pub fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    if let Commands::Schema = cli.command {
        return cmd::schema::run();
    }
    let mut ctx = cmd::Context::open(&cli)?;
    match cli.command {
        Commands::Show(args) => cmd::show::run(&mut ctx, args),
        Commands::Answer(args) => cmd::answer::run_answer(&mut ctx, args),
        Commands::Detail(args) => cmd::answer::run_detail(&mut ctx, args),
        Commands::Gradient(args) => cmd::answer::run_gradient(&mut ctx, args),
        Commands::Attach(args) => cmd::images::run_attach(&mut ctx, args),
        Commands::Detach(args) => cmd::images::run_detach(&mut ctx, args),
        Commands::Validate => cmd::validate::run(&ctx),
        Commands::Export(command) => cmd::export::run(&ctx, command),
        Commands::Clear(args) => cmd::clear::run(&mut ctx, args),
        Commands::Schema => cmd::schema::run(),
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
