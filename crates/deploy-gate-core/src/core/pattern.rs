// crates/deploy-gate-core/src/core/pattern.rs
// ============================================================================
// Module: Deploy Gate Pattern Matcher
// Description: Regex and glob pattern classification, compilation, matching.
// Purpose: Match configured patterns against review bodies deterministically.
// Dependencies: globset, regex, thiserror
// ============================================================================

//! ## Overview
//! Policy files carry two pattern dialects under the same key, told apart by
//! the `/…/` sigil: `"/<body>/"` or `"/<body>/i"` compiles as a regex (the
//! trailing `i` selects case-insensitive matching), anything else compiles as
//! a shell-style glob. A leading `!` on the regex form is accepted and
//! stripped without negating the match; the prefix is reserved. Compilation
//! failure in either dialect is a configuration error, never a silent
//! non-match.

// ============================================================================
// SECTION: Imports
// ============================================================================

use globset::GlobBuilder;
use globset::GlobMatcher;
use regex::Regex;
use regex::RegexBuilder;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Pattern compilation errors.
#[derive(Debug, Error)]
pub enum PatternError {
    /// Regex body failed to compile.
    #[error("invalid regex pattern {pattern:?}: {source}")]
    Regex {
        /// Pattern as written in the policy.
        pattern: String,
        /// Compilation failure reported by the regex engine.
        source: regex::Error,
    },
    /// Glob failed to compile.
    #[error("invalid glob pattern {pattern:?}: {source}")]
    Glob {
        /// Pattern as written in the policy.
        pattern: String,
        /// Compilation failure reported by the glob engine.
        source: globset::Error,
    },
}

// ============================================================================
// SECTION: Compiled Pattern
// ============================================================================

/// Compiled form of a configured pattern.
#[derive(Debug, Clone)]
enum PatternKind {
    /// Regex dialect, selected by the `/…/` sigil.
    Regex(Regex),
    /// Glob dialect for everything else.
    Glob {
        /// Compiled glob matcher.
        matcher: GlobMatcher,
        /// Whether a separator-free pattern also matches the basename.
        match_base: bool,
    },
}

/// Pattern compiled from a policy document.
///
/// # Invariants
/// - Construction fails loudly on an uncompilable pattern; a compiled
///   pattern always matches deterministically.
#[derive(Debug, Clone)]
pub struct MatchPattern {
    /// Pattern as written in the policy.
    source: String,
    /// Compiled matcher.
    kind: PatternKind,
}

impl MatchPattern {
    /// Classifies and compiles a configured pattern.
    ///
    /// A leading `!` on the regex form is stripped and otherwise ignored;
    /// the prefix is reserved and does not negate the match.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] when the regex body or the glob fails to
    /// compile.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let kind = match split_regex_sigil(pattern) {
            Some((body, case_insensitive)) => {
                let regex = RegexBuilder::new(body)
                    .case_insensitive(case_insensitive)
                    .build()
                    .map_err(|source| PatternError::Regex {
                        pattern: pattern.to_string(),
                        source,
                    })?;
                PatternKind::Regex(regex)
            }
            None => {
                let matcher = GlobBuilder::new(pattern)
                    .literal_separator(false)
                    .build()
                    .map_err(|source| PatternError::Glob {
                        pattern: pattern.to_string(),
                        source,
                    })?
                    .compile_matcher();
                PatternKind::Glob {
                    matcher,
                    match_base: !pattern.contains('/'),
                }
            }
        };
        Ok(Self {
            source: pattern.to_string(),
            kind,
        })
    }

    /// Returns the pattern as written in the policy.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns true when the pattern uses the regex dialect.
    #[must_use]
    pub const fn is_regex(&self) -> bool {
        matches!(self.kind, PatternKind::Regex(_))
    }

    /// Tests the pattern against the given text.
    ///
    /// Empty text never matches a non-empty pattern.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        match &self.kind {
            PatternKind::Regex(regex) => regex.is_match(text),
            PatternKind::Glob {
                matcher,
                match_base,
            } => {
                if matcher.is_match(text) {
                    return true;
                }
                if !match_base {
                    return false;
                }
                let basename = text.rsplit('/').next().unwrap_or(text);
                matcher.is_match(basename)
            }
        }
    }
}

// ============================================================================
// SECTION: Sigil Classification
// ============================================================================

/// Splits a pattern on the regex sigil `^!?/.*/(i)?$`.
///
/// Returns the regex body and the case-insensitivity flag, or `None` when
/// the pattern is not in regex form and should compile as a glob.
fn split_regex_sigil(pattern: &str) -> Option<(&str, bool)> {
    let unprefixed = pattern.strip_prefix('!').unwrap_or(pattern);
    let rest = unprefixed.strip_prefix('/')?;
    if let Some(body) = rest.strip_suffix("/i") {
        return Some((body, true));
    }
    rest.strip_suffix('/').map(|body| (body, false))
}
