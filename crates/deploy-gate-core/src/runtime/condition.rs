// crates/deploy-gate-core/src/runtime/condition.rs
// ============================================================================
// Module: Deploy Gate Condition Evaluator
// Description: Rule condition predicates over the evaluation context.
// Purpose: Decide whether a rule's gate applies to the change at hand.
// Dependencies: crate::{core, interfaces, runtime::membership}
// ============================================================================

//! ## Overview
//! A rule condition gates a rule: when unmet, the rule is skipped rather than
//! failed. Every predicate provided on a condition must hold; absent
//! predicates are vacuously true, so a condition with no fields always holds.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::context::PolicyContext;
use crate::core::policy::EnvironmentCondition;
use crate::core::policy::IdentitySet;
use crate::core::policy::RuleCondition;
use crate::interfaces::MembershipError;
use crate::interfaces::MembershipSource;
use crate::runtime::membership::MembershipResolver;

// ============================================================================
// SECTION: Condition Evaluation
// ============================================================================

/// Returns true when every predicate on the condition holds.
///
/// # Errors
///
/// Returns [`MembershipError`] when a roster lookup fails.
pub fn evaluate_condition<S>(
    condition: &RuleCondition,
    context: &PolicyContext,
    membership: &MembershipResolver<'_, S>,
) -> Result<bool, MembershipError>
where
    S: MembershipSource,
{
    if let Some(environment) = &condition.environment
        && !environment_matches(environment, context)
    {
        return Ok(false);
    }
    if let Some(committers) = &condition.has_valid_signatures_by
        && !has_valid_signatures_by(committers, context, membership)?
    {
        return Ok(false);
    }
    if let Some(authors) = &condition.was_authored_by
        && !was_authored_by(authors, context, membership)?
    {
        return Ok(false);
    }
    Ok(true)
}

// ============================================================================
// SECTION: Predicates
// ============================================================================

/// Tests the environment whitelist/blacklist against the context environment.
fn environment_matches(condition: &EnvironmentCondition, context: &PolicyContext) -> bool {
    let Some(environment) = &context.environment else {
        return false;
    };
    if let Some(matches) = &condition.matches
        && !matches.contains(&environment.name)
    {
        return false;
    }
    if let Some(not_matches) = &condition.not_matches
        && not_matches.contains(&environment.name)
    {
        return false;
    }
    true
}

/// Tests that every commit carries a provider-verified signature from an
/// authorized committer.
fn has_valid_signatures_by<S>(
    committers: &IdentitySet,
    context: &PolicyContext,
    membership: &MembershipResolver<'_, S>,
) -> Result<bool, MembershipError>
where
    S: MembershipSource,
{
    for commit in &context.commits {
        let verified = commit.verification.as_ref().is_some_and(|v| v.verified);
        if !verified {
            return Ok(false);
        }
        let Some(committer) = &commit.committer else {
            return Ok(false);
        };
        if !membership.is_member_of_any(&committer.login, committers)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Tests that every commit was authored by an authorized identity.
///
/// A change with no commits was authored by nobody. A commit without an
/// author reduces to the empty login, which never matches.
fn was_authored_by<S>(
    authors: &IdentitySet,
    context: &PolicyContext,
    membership: &MembershipResolver<'_, S>,
) -> Result<bool, MembershipError>
where
    S: MembershipSource,
{
    if context.commits.is_empty() {
        return Ok(false);
    }
    for commit in &context.commits {
        let Some(author) = &commit.author else {
            return Ok(false);
        };
        if !membership.is_member_of_any(&author.login, authors)? {
            return Ok(false);
        }
    }
    Ok(true)
}
