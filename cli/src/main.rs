use std::{io::Write, process::ExitCode};

use clap::Parser;

/// Retext applies recipe-driven textual patches to UI component files.
#[derive(Debug, Parser, Clone)]
#[clap(version, author)]
pub struct CLIOpts {
    /// Log every transformation step.
    #[clap(short, long, global = true)]
    pub verbose: bool,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Parser, Clone)]
pub enum Command {
    /// Apply a recipe to its target file.
    #[clap(name = "apply")]
    Apply(ApplyOpts),
    /// List the built-in recipes.
    #[clap(name = "list")]
    List,
}

#[derive(Debug, Parser, Clone)]
pub struct ApplyOpts {
    /// Built-in recipe to apply.
    #[clap(default_value = retext::DEFAULT_RECIPE)]
    pub recipe: String,
    /// Load the recipe from a TOML file instead of the built-ins.
    #[clap(long, env = "RETEXT_RECIPE_FILE")]
    pub recipe_file: Option<String>,
    /// Directory the recipe target is resolved against.
    #[clap(long, env = "RETEXT_ROOT", default_value = ".")]
    pub root: String,
    /// Fail, without writing, when a transformation finds no match.
    #[clap(long)]
    pub strict: bool,
    /// Report what would change without writing.
    #[clap(long)]
    pub dry_run: bool,
    /// Keep a copy of the original file as `<file>.bak`.
    #[clap(long)]
    pub backup: bool,
}

mod logging;
mod transform;

fn main() -> ExitCode {
    let opts = CLIOpts::parse();
    logging::init(opts.verbose);

    let result = match opts.command {
        Command::Apply(opts) => transform::apply(&opts).map(|message| vec![message]),
        Command::List => transform::list(),
    };

    let code = report(
        result,
        &mut std::io::stdout().lock(),
        &mut std::io::stderr().lock(),
    );
    ExitCode::from(code)
}

/// Prints the outcome and returns the process exit status.
fn report(result: retext::Result<Vec<String>>, out: &mut impl Write, err: &mut impl Write) -> u8 {
    match result {
        Ok(lines) => {
            for line in lines {
                let _ = writeln!(out, "{line}");
            }
            0
        }
        Err(error) => {
            let _ = writeln!(err, "❌ {error}");
            1
        }
    }
}
