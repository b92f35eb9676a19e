// crates/skip-logic/src/state.rs
// ============================================================================
// Module: Rule State Algebra
// Description: Three-valued rule outcomes and skip-tolerant logic tables.
// Purpose: Provide deterministic pass/fail/skipped reduction for rule groups.
// Dependencies: serde::{Deserialize, Serialize}
// ============================================================================

//! ## Overview
//! Defines the three-valued rule outcome and the reductions used to fold rule
//! groups. Unlike Kleene-style logics, `Skipped` here is not an infectious
//! unknown: it is the identity of both reductions, so a skipped rule drops
//! out of its group entirely. `Fail` absorbs under AND and `Pass` absorbs
//! under OR, which makes both reductions commutative monoids; group results
//! are therefore independent of member order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Rule State
// ============================================================================

/// Three-valued outcome of an approval rule evaluation.
///
/// # Invariants
/// - Represents a closed set of outcomes: pass, fail, or skipped.
/// - `Skipped` marks a rule whose gating condition did not apply; it is never
///   a failure and never a success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleState {
    /// The rule's requirement was satisfied.
    Pass,
    /// The rule applied but its requirement was not satisfied.
    Fail,
    /// The rule's condition did not apply; the rule abstains.
    Skipped,
}

impl RuleState {
    /// Returns true if the outcome is `Pass`.
    #[must_use]
    pub const fn is_pass(self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Returns true if the outcome is `Fail`.
    #[must_use]
    pub const fn is_fail(self) -> bool {
        matches!(self, Self::Fail)
    }

    /// Returns true if the outcome is `Skipped`.
    #[must_use]
    pub const fn is_skipped(self) -> bool {
        matches!(self, Self::Skipped)
    }

    /// Combines two outcomes under AND semantics.
    ///
    /// `Skipped` is the identity and `Fail` absorbs; two applied rules pass
    /// only when both pass.
    #[must_use]
    pub const fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::Skipped, state) | (state, Self::Skipped) => state,
            (Self::Fail, _) | (_, Self::Fail) => Self::Fail,
            (Self::Pass, Self::Pass) => Self::Pass,
        }
    }

    /// Combines two outcomes under OR semantics.
    ///
    /// `Skipped` is the identity and `Pass` absorbs; two applied rules fail
    /// only when both fail.
    #[must_use]
    pub const fn or(self, other: Self) -> Self {
        match (self, other) {
            (Self::Skipped, state) | (state, Self::Skipped) => state,
            (Self::Pass, _) | (_, Self::Pass) => Self::Pass,
            (Self::Fail, Self::Fail) => Self::Fail,
        }
    }
}

impl From<bool> for RuleState {
    fn from(value: bool) -> Self {
        if value { Self::Pass } else { Self::Fail }
    }
}

impl fmt::Display for RuleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Skipped => "skipped",
        };
        f.write_str(label)
    }
}

// ============================================================================
// SECTION: Group Reductions
// ============================================================================

/// Reduces a group of outcomes under AND semantics.
///
/// Skipped members are discarded; a group whose members all skipped (or an
/// empty group) is itself `Skipped`. Otherwise the group passes only when
/// every remaining member passed.
pub fn combine_all<I>(states: I) -> RuleState
where
    I: IntoIterator<Item = RuleState>,
{
    states.into_iter().fold(RuleState::Skipped, RuleState::and)
}

/// Reduces a group of outcomes under OR semantics.
///
/// Skipped members are discarded; a group whose members all skipped (or an
/// empty group) is itself `Skipped`. Otherwise the group passes when any
/// remaining member passed.
pub fn combine_any<I>(states: I) -> RuleState
where
    I: IntoIterator<Item = RuleState>,
{
    states.into_iter().fold(RuleState::Skipped, RuleState::or)
}
