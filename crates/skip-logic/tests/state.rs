// crates/skip-logic/tests/state.rs
// ============================================================================
// Module: Rule State Tests
// Description: Tests for the three-valued outcome algebra and reductions.
// ============================================================================
//! ## Overview
//! Validates the AND/OR tables, the identity and absorption laws, and the
//! order independence of group reductions.

mod support;

use skip_logic::RuleState;
use skip_logic::combine_all;
use skip_logic::combine_any;
use support::TestResult;
use support::ensure;

/// All rule states, for exhaustive table checks.
const STATES: [RuleState; 3] = [RuleState::Pass, RuleState::Fail, RuleState::Skipped];

// ============================================================================
// SECTION: Logic Tables
// ============================================================================

#[test]
fn test_and_table() -> TestResult {
    ensure(RuleState::Pass.and(RuleState::Pass) == RuleState::Pass, "pass & pass")?;
    ensure(RuleState::Pass.and(RuleState::Fail) == RuleState::Fail, "pass & fail")?;
    ensure(RuleState::Fail.and(RuleState::Fail) == RuleState::Fail, "fail & fail")?;
    ensure(RuleState::Pass.and(RuleState::Skipped) == RuleState::Pass, "pass & skipped")?;
    ensure(RuleState::Fail.and(RuleState::Skipped) == RuleState::Fail, "fail & skipped")?;
    ensure(
        RuleState::Skipped.and(RuleState::Skipped) == RuleState::Skipped,
        "skipped & skipped",
    )?;
    Ok(())
}

#[test]
fn test_or_table() -> TestResult {
    ensure(RuleState::Pass.or(RuleState::Pass) == RuleState::Pass, "pass | pass")?;
    ensure(RuleState::Pass.or(RuleState::Fail) == RuleState::Pass, "pass | fail")?;
    ensure(RuleState::Fail.or(RuleState::Fail) == RuleState::Fail, "fail | fail")?;
    ensure(RuleState::Pass.or(RuleState::Skipped) == RuleState::Pass, "pass | skipped")?;
    ensure(RuleState::Fail.or(RuleState::Skipped) == RuleState::Fail, "fail | skipped")?;
    ensure(
        RuleState::Skipped.or(RuleState::Skipped) == RuleState::Skipped,
        "skipped | skipped",
    )?;
    Ok(())
}

#[test]
fn test_skipped_is_identity_for_both_reductions() -> TestResult {
    for state in STATES {
        ensure(RuleState::Skipped.and(state) == state, "skipped is left identity under and")?;
        ensure(state.and(RuleState::Skipped) == state, "skipped is right identity under and")?;
        ensure(RuleState::Skipped.or(state) == state, "skipped is left identity under or")?;
        ensure(state.or(RuleState::Skipped) == state, "skipped is right identity under or")?;
    }
    Ok(())
}

#[test]
fn test_commutativity_and_associativity() -> TestResult {
    for a in STATES {
        for b in STATES {
            ensure(a.and(b) == b.and(a), "and must be commutative")?;
            ensure(a.or(b) == b.or(a), "or must be commutative")?;
            for c in STATES {
                ensure(a.and(b).and(c) == a.and(b.and(c)), "and must be associative")?;
                ensure(a.or(b).or(c) == a.or(b.or(c)), "or must be associative")?;
            }
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Group Reductions
// ============================================================================

#[test]
fn test_empty_groups_are_skipped() -> TestResult {
    ensure(combine_all([]) == RuleState::Skipped, "empty AND group must be skipped")?;
    ensure(combine_any([]) == RuleState::Skipped, "empty OR group must be skipped")?;
    Ok(())
}

#[test]
fn test_all_skipped_groups_are_skipped() -> TestResult {
    let members = [RuleState::Skipped, RuleState::Skipped, RuleState::Skipped];
    ensure(combine_all(members) == RuleState::Skipped, "all-skipped AND group must be skipped")?;
    ensure(combine_any(members) == RuleState::Skipped, "all-skipped OR group must be skipped")?;
    Ok(())
}

#[test]
fn test_skipped_members_drop_out() -> TestResult {
    ensure(
        combine_all([RuleState::Skipped, RuleState::Pass]) == RuleState::Pass,
        "AND over {skipped, pass} must pass",
    )?;
    ensure(
        combine_all([RuleState::Skipped, RuleState::Fail]) == RuleState::Fail,
        "AND over {skipped, fail} must fail",
    )?;
    ensure(
        combine_any([RuleState::Skipped, RuleState::Fail]) == RuleState::Fail,
        "OR over {skipped, fail} must fail",
    )?;
    ensure(
        combine_any([RuleState::Fail, RuleState::Skipped, RuleState::Pass]) == RuleState::Pass,
        "OR over {fail, skipped, pass} must pass",
    )?;
    Ok(())
}

#[test]
fn test_reduction_is_order_independent() -> TestResult {
    let permutations = [
        [RuleState::Pass, RuleState::Fail, RuleState::Skipped],
        [RuleState::Pass, RuleState::Skipped, RuleState::Fail],
        [RuleState::Fail, RuleState::Pass, RuleState::Skipped],
        [RuleState::Fail, RuleState::Skipped, RuleState::Pass],
        [RuleState::Skipped, RuleState::Pass, RuleState::Fail],
        [RuleState::Skipped, RuleState::Fail, RuleState::Pass],
    ];
    for members in permutations {
        ensure(combine_all(members) == RuleState::Fail, "AND result must ignore member order")?;
        ensure(combine_any(members) == RuleState::Pass, "OR result must ignore member order")?;
    }
    Ok(())
}

// ============================================================================
// SECTION: Conversions and Serialization
// ============================================================================

#[test]
fn test_from_bool() -> TestResult {
    ensure(RuleState::from(true) == RuleState::Pass, "true maps to pass")?;
    ensure(RuleState::from(false) == RuleState::Fail, "false maps to fail")?;
    Ok(())
}

#[test]
fn test_predicates() -> TestResult {
    ensure(RuleState::Pass.is_pass(), "pass reports is_pass")?;
    ensure(RuleState::Fail.is_fail(), "fail reports is_fail")?;
    ensure(RuleState::Skipped.is_skipped(), "skipped reports is_skipped")?;
    ensure(!RuleState::Skipped.is_fail(), "skipped is not a failure")?;
    Ok(())
}

#[test]
fn test_serde_round_trip() -> TestResult {
    for state in STATES {
        let encoded = serde_json::to_string(&state)?;
        let decoded: RuleState = serde_json::from_str(&encoded)?;
        ensure(decoded == state, "rule state must survive a serde round trip")?;
    }
    ensure(
        serde_json::to_string(&RuleState::Skipped)? == "\"skipped\"",
        "rule states serialize in snake case",
    )?;
    Ok(())
}
