use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use itertools::Itertools;
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::{Result, RewriteError},
    transformation::{StepOutcome, Transformation},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOptions {
    /// Fail instead of writing when a transformation finds no match.
    pub strict: bool,
    pub dry_run: bool,
    /// Copy the original file to `<file>.bak` before overwriting it.
    pub backup: bool,
    /// Write through a temporary file renamed over the target.
    pub atomic: bool,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            strict: false,
            dry_run: false,
            backup: false,
            atomic: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub name: String,
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteReport {
    pub path: PathBuf,
    pub steps: Vec<StepReport>,
    pub changed: bool,
    pub written: bool,
}

impl RewriteReport {
    pub fn missed(&self) -> impl Iterator<Item = &StepReport> {
        self.steps
            .iter()
            .filter(|step| step.outcome == StepOutcome::NotFound)
    }

    /// One line per run, e.g. `import: applied, overlay: not found`.
    pub fn summary(&self) -> String {
        self.steps
            .iter()
            .map(|step| format!("{}: {}", step.name, step.outcome))
            .join(", ")
    }
}

/// Applies `transformations` in order to `content`, each one seeing the output
/// of the previous one.
pub fn apply_all(content: &str, transformations: &[Transformation]) -> (String, Vec<StepReport>) {
    let mut buffer = content.to_owned();
    let steps = transformations
        .iter()
        .map(|transformation| {
            let outcome = transformation.apply(&mut buffer);
            debug!(
                name = transformation.name(),
                kind = transformation.matcher().kind(),
                %outcome,
                "transformation"
            );
            StepReport {
                name: transformation.name().to_owned(),
                outcome,
            }
        })
        .collect();
    (buffer, steps)
}

#[derive(Debug, Clone, Default)]
pub struct FileRewriter {
    options: RewriteOptions,
}

impl FileRewriter {
    pub fn new(options: RewriteOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RewriteOptions {
        &self.options
    }

    /// Reads `path`, applies the transformations and writes the result back
    /// to the same path.
    ///
    /// Missing matches are recorded in the report and logged; in strict mode
    /// they abort the rewrite before anything is written.
    #[instrument(level = "info", skip(self, path, transformations), fields(path = %path.display()))]
    pub fn rewrite(&self, path: &Path, transformations: &[Transformation]) -> Result<RewriteReport> {
        let original = fs::read_to_string(path).map_err(|source| RewriteError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let (patched, steps) = apply_all(&original, transformations);
        for step in steps.iter().filter(|step| step.outcome == StepOutcome::NotFound) {
            if self.options.strict {
                return Err(RewriteError::NoMatch {
                    path: path.to_path_buf(),
                    name: step.name.clone(),
                });
            }
            warn!(name = %step.name, "transformation found no match, left unchanged");
        }

        let changed = patched != original;
        let written = changed && !self.options.dry_run;
        if written {
            if self.options.backup {
                let backup = backup_path(path);
                fs::write(&backup, &original).map_err(|source| RewriteError::Backup {
                    path: backup.clone(),
                    source,
                })?;
                debug!(backup = %backup.display(), "original saved");
            }
            self.write(path, &patched)
                .map_err(|source| RewriteError::Write {
                    path: path.to_path_buf(),
                    source,
                })?;
            info!(bytes = patched.len(), "file rewritten");
        } else {
            debug!(changed, dry_run = self.options.dry_run, "nothing written");
        }

        Ok(RewriteReport {
            path: path.to_path_buf(),
            steps,
            changed,
            written,
        })
    }

    fn write(&self, path: &Path, content: &str) -> std::io::Result<()> {
        if !self.options.atomic {
            return fs::write(path, content);
        }
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(content.as_bytes())?;
        file.as_file().set_permissions(fs::metadata(path)?.permissions())?;
        file.persist(path).map_err(|err| err.error)?;
        Ok(())
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}
