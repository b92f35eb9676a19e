// crates/skip-logic/src/lib.rs
// ============================================================================
// Module: Skip Logic Root
// Description: Public API surface for the three-valued rule outcome algebra.
// Purpose: Expose rule states and skip-tolerant group reductions.
// Dependencies: crate::state
// ============================================================================

//! ## Overview
//! Skip logic models rule outcomes as `pass`, `fail`, or `skipped` and defines
//! how groups of outcomes combine. Skipped is the neutral element of both the
//! AND and the OR reduction: skipped members drop out of a group, and a group
//! whose members all skipped is itself skipped. The engine layer decides what
//! a skipped top level means; this crate only provides the algebra.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod state;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use state::RuleState;
pub use state::combine_all;
pub use state::combine_any;
