//! Recipes: a target file and the ordered transformations to apply to it,
//! described in TOML.
//!
//! ```toml
//! name = "example"
//! target = "src/App.jsx"
//!
//! [[transformation]]
//! kind = "literal"
//! find = "import './App.css';"
//! replace = "import './App.css';\nimport Popup from './Popup';"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{
    block,
    error::{Result, RewriteError},
    transformation::{Matcher, Transformation, compile_pattern},
};

const BUILTINS: &[(&str, &str)] = &[
    (
        "cacao-processing",
        include_str!("../recipes/cacao-processing.toml"),
    ),
    ("matching-cards", include_str!("../recipes/matching-cards.toml")),
];

pub const DEFAULT_RECIPE: &str = "cacao-processing";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Recipe {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Relative paths are resolved against the root passed to [`Recipe::target_path`].
    pub target: PathBuf,
    #[serde(default)]
    pub success_message: Option<String>,
    #[serde(default, rename = "transformation")]
    pub transformations: Vec<TransformationSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransformationSpec {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub matcher: MatcherSpec,
    pub replace: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MatcherSpec {
    Literal {
        find: String,
    },
    Pattern {
        pattern: String,
        #[serde(default = "default_dot_matches_new_line")]
        dot_matches_new_line: bool,
    },
    Block {
        start: String,
    },
    Span {
        start: String,
        end: String,
    },
}

fn default_dot_matches_new_line() -> bool {
    true
}

impl Recipe {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let table: toml::Table = content.parse()?;
        check_transformation_keys(&table)?;
        Ok(toml::Value::Table(table).try_into()?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| RewriteError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn builtin(name: &str) -> Result<Self> {
        let (_, content) = BUILTINS
            .iter()
            .find(|(builtin, _)| *builtin == name)
            .ok_or_else(|| RewriteError::UnknownRecipe(name.to_owned()))?;
        Self::from_toml_str(content)
    }

    pub fn builtin_names() -> impl Iterator<Item = &'static str> {
        BUILTINS.iter().map(|(name, _)| *name)
    }

    pub fn target_path(&self, root: &Path) -> PathBuf {
        root.join(&self.target)
    }

    pub fn success_message(&self) -> String {
        self.success_message.clone().unwrap_or_else(|| {
            let file_name = self
                .target
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.target.display().to_string());
            format!("✅ Successfully updated {file_name}!")
        })
    }

    /// Validates the specs and builds the transformations, in recipe order.
    pub fn compile(&self) -> Result<Vec<Transformation>> {
        self.transformations
            .iter()
            .enumerate()
            .map(|(index, spec)| spec.compile(index))
            .collect()
    }
}

impl TransformationSpec {
    fn compile(&self, index: usize) -> Result<Transformation> {
        let name = self
            .name
            .clone()
            .unwrap_or_else(|| format!("#{}", index + 1));
        let matcher = match &self.matcher {
            MatcherSpec::Literal { find } => {
                non_empty(&name, "find", find)?;
                Matcher::Literal(find.clone())
            }
            MatcherSpec::Pattern {
                pattern,
                dot_matches_new_line,
            } => Matcher::Pattern(compile_pattern(&name, pattern, *dot_matches_new_line)?),
            MatcherSpec::Block { start } => {
                non_empty(&name, "start", start)?;
                if block::opening_bracket(start).is_none() {
                    return Err(RewriteError::InvalidRecipe {
                        message: format!(
                            "transformation `{name}`: block start `{start}` has no opening bracket"
                        ),
                    });
                }
                Matcher::Block(start.clone())
            }
            MatcherSpec::Span { start, end } => {
                non_empty(&name, "start", start)?;
                non_empty(&name, "end", end)?;
                Matcher::Span {
                    start: start.clone(),
                    end: end.clone(),
                }
            }
        };
        Ok(Transformation::new(name, matcher, self.replace.clone()))
    }
}

const COMMON_KEYS: &[&str] = &["name", "kind", "replace"];

fn kind_keys(kind: &str) -> Option<&'static [&'static str]> {
    match kind {
        "literal" => Some(&["find"]),
        "pattern" => Some(&["pattern", "dot_matches_new_line"]),
        "block" => Some(&["start"]),
        "span" => Some(&["start", "end"]),
        _ => None,
    }
}

/// The flattened matcher rules out `deny_unknown_fields`, so transformation
/// keys are checked on the raw table. Unknown kinds are left to serde.
fn check_transformation_keys(table: &toml::Table) -> Result<()> {
    let Some(toml::Value::Array(transformations)) = table.get("transformation") else {
        return Ok(());
    };
    for (index, entry) in transformations.iter().enumerate() {
        let Some(entry) = entry.as_table() else {
            continue;
        };
        let Some(allowed) = entry
            .get("kind")
            .and_then(toml::Value::as_str)
            .and_then(kind_keys)
        else {
            continue;
        };
        let unknown = entry
            .keys()
            .find(|key| !COMMON_KEYS.contains(&key.as_str()) && !allowed.contains(&key.as_str()));
        if let Some(key) = unknown {
            let name = entry
                .get("name")
                .and_then(toml::Value::as_str)
                .map(str::to_owned)
                .unwrap_or_else(|| format!("#{}", index + 1));
            return Err(RewriteError::InvalidRecipe {
                message: format!("transformation `{name}`: unknown key `{key}`"),
            });
        }
    }
    Ok(())
}

fn non_empty(name: &str, field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(RewriteError::InvalidRecipe {
            message: format!("transformation `{name}`: `{field}` must not be empty"),
        });
    }
    Ok(())
}
