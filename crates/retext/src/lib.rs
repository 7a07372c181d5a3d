//! Recipe-driven textual patches for UI component files: read a file, apply an
//! ordered list of transformations, write it back.

pub mod block;
pub mod error;
pub mod recipe;
pub mod rewriter;
pub mod transformation;

pub use error::{Result, RewriteError};
pub use recipe::{DEFAULT_RECIPE, Recipe};
pub use rewriter::{FileRewriter, RewriteOptions, RewriteReport, StepReport, apply_all};
pub use transformation::{Matcher, StepOutcome, Transformation};
