use std::path::Path;

use retext::{FileRewriter, Recipe, RewriteOptions};
use tracing::info;
use tracing_attributes::instrument;

use crate::ApplyOpts;

pub fn load_recipe(opts: &ApplyOpts) -> retext::Result<Recipe> {
    match &opts.recipe_file {
        Some(path) => Recipe::from_file(path),
        None => Recipe::builtin(&opts.recipe),
    }
}

/// Runs the recipe and returns the line to show the user.
#[instrument(skip_all, fields(recipe = %opts.recipe))]
pub fn apply(opts: &ApplyOpts) -> retext::Result<String> {
    let recipe = load_recipe(opts)?;
    let transformations = recipe.compile()?;
    let target = recipe.target_path(Path::new(&opts.root));

    let rewriter = FileRewriter::new(RewriteOptions {
        strict: opts.strict,
        dry_run: opts.dry_run,
        backup: opts.backup,
        ..RewriteOptions::default()
    });
    let report = rewriter.rewrite(&target, &transformations)?;
    info!(summary = %report.summary(), "recipe {} done", recipe.name);

    if opts.dry_run {
        let verb = if report.changed { "Would update" } else { "Would leave unchanged" };
        return Ok(format!("{verb} {} ({})", target.display(), report.summary()));
    }
    Ok(recipe.success_message())
}

/// `name  description` lines for every built-in recipe.
pub fn list() -> retext::Result<Vec<String>> {
    Recipe::builtin_names()
        .map(|name| {
            let recipe = Recipe::builtin(name)?;
            Ok(format!(
                "{name:<20}{}",
                recipe.description.as_deref().unwrap_or_default()
            ))
        })
        .collect()
}
