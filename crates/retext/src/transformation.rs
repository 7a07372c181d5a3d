use std::{fmt, ops::Range};

use regex::{Regex, RegexBuilder};

use crate::{
    block,
    error::{Result, RewriteError},
};

/// How a transformation locates the text it replaces. Every matcher only
/// considers the first occurrence.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Exact substring.
    Literal(String),
    /// Regular expression.
    Pattern(Regex),
    /// From a marker to the bracket closing the marker's first opening bracket.
    Block(String),
    /// From `start` up to, but not including, the next `end`.
    Span { start: String, end: String },
}

impl Matcher {
    /// Byte range of the first match in `haystack`.
    pub fn find(&self, haystack: &str) -> Option<Range<usize>> {
        match self {
            Matcher::Literal(needle) => haystack
                .find(needle.as_str())
                .map(|start| start..start + needle.len()),
            Matcher::Pattern(regex) => regex.find(haystack).map(|m| m.range()),
            Matcher::Block(marker) => block::find_block(haystack, marker),
            Matcher::Span { start, end } => {
                let from = haystack.find(start.as_str())?;
                let search_from = from + start.len();
                let to = haystack[search_from..].find(end.as_str())?;
                Some(from..search_from + to)
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Matcher::Literal(_) => "literal",
            Matcher::Pattern(_) => "pattern",
            Matcher::Block(_) => "block",
            Matcher::Span { .. } => "span",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Applied,
    /// The replacement is already in the buffer, usually from a previous run.
    AlreadyApplied,
    NotFound,
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StepOutcome::Applied => "applied",
            StepOutcome::AlreadyApplied => "already applied",
            StepOutcome::NotFound => "not found",
        })
    }
}

/// A (matcher, replacement) pair. The replacement is inserted verbatim, `$`
/// and `\` have no special meaning in it.
#[derive(Debug, Clone)]
pub struct Transformation {
    name: String,
    matcher: Matcher,
    replacement: String,
}

impl Transformation {
    pub fn new(name: impl Into<String>, matcher: Matcher, replacement: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            matcher,
            replacement: replacement.into(),
        }
    }

    pub fn literal(find: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self::new("literal", Matcher::Literal(find.into()), replacement)
    }

    /// Compiles `pattern` with `.` matching line breaks.
    pub fn pattern(pattern: &str, replacement: impl Into<String>) -> Result<Self> {
        let regex = compile_pattern("pattern", pattern, true)?;
        Ok(Self::new("pattern", Matcher::Pattern(regex), replacement))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Replaces the first match in `buffer`.
    ///
    /// A step is considered already applied when nothing matches but the
    /// replacement is present, or when the first match lies inside an
    /// occurrence of the replacement (an insertion anchored on the text it
    /// keeps).
    pub fn apply(&self, buffer: &mut String) -> StepOutcome {
        match self.matcher.find(buffer) {
            Some(range) => {
                if self.replacement_covers(buffer, &range) {
                    return StepOutcome::AlreadyApplied;
                }
                buffer.replace_range(range, &self.replacement);
                StepOutcome::Applied
            }
            None if !self.replacement.is_empty() && buffer.contains(self.replacement.as_str()) => {
                StepOutcome::AlreadyApplied
            }
            None => StepOutcome::NotFound,
        }
    }

    fn replacement_covers(&self, buffer: &str, range: &Range<usize>) -> bool {
        if self.replacement.is_empty() {
            return false;
        }
        let len = self.replacement.len();
        buffer
            .match_indices(self.replacement.as_str())
            .any(|(start, _)| start <= range.start && range.end <= start + len)
    }
}

pub(crate) fn compile_pattern(name: &str, pattern: &str, dot_matches_new_line: bool) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .dot_matches_new_line(dot_matches_new_line)
        .build()
        .map_err(|source| RewriteError::InvalidPattern {
            name: name.to_owned(),
            source,
        })
}
