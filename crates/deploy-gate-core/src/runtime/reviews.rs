// crates/deploy-gate-core/src/runtime/reviews.rs
// ============================================================================
// Module: Deploy Gate Review Filter
// Description: Method-valid review filtering and authorized approval counting.
// Purpose: Reduce raw reviews to the approvals that satisfy a requirement.
// Dependencies: crate::{core, interfaces, runtime::membership}
// ============================================================================

//! ## Overview
//! Raw reviews pass through three filters before they can count toward a
//! requirement: commit binding (a review must target the deployment's SHA
//! when one is bound), self-review exclusion (no commit author or committer
//! may approve their own change), and method matching (an explicit approval
//! state, or a comment body matching a configured pattern). The surviving
//! reviews are then checked against the requirement's identity set and
//! deduplicated per reviewer before comparing with the threshold.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use crate::core::context::Commit;
use crate::core::context::Review;
use crate::core::context::ReviewState;
use crate::core::identifiers::CommitSha;
use crate::core::identifiers::ReviewId;
use crate::core::identifiers::UserId;
use crate::core::pattern::MatchPattern;
use crate::core::pattern::PatternError;
use crate::core::policy::ApprovalMethods;
use crate::core::policy::ApprovalRequirement;
use crate::interfaces::MembershipError;
use crate::interfaces::MembershipSource;
use crate::runtime::membership::MembershipResolver;

// ============================================================================
// SECTION: Review Filter
// ============================================================================

/// Reduces raw reviews to the method-valid set for a rule.
///
/// Input order is preserved and duplicate review ids are not introduced.
/// When no approval methods are configured, no review is retained.
///
/// # Errors
///
/// Returns [`PatternError`] when a configured comment pattern fails to
/// compile.
pub fn filter_method_valid<'a>(
    reviews: &'a [Review],
    commits: &[Commit],
    deployment_sha: Option<&CommitSha>,
    methods: Option<&ApprovalMethods>,
) -> Result<Vec<&'a Review>, PatternError> {
    let patterns = compile_comment_patterns(methods)?;
    let mut seen: BTreeSet<ReviewId> = BTreeSet::new();
    let mut retained = Vec::new();

    for review in reviews {
        if let Some(sha) = deployment_sha
            && review.commit_id != *sha
        {
            continue;
        }
        if is_self_review(review, commits) {
            continue;
        }
        if !method_matches(review, methods, &patterns) {
            continue;
        }
        if seen.insert(review.id) {
            retained.push(review);
        }
    }

    Ok(retained)
}

/// Compiles the configured comment patterns up front.
fn compile_comment_patterns(
    methods: Option<&ApprovalMethods>,
) -> Result<Vec<MatchPattern>, PatternError> {
    let Some(methods) = methods else {
        return Ok(Vec::new());
    };
    methods.github_review_comment_patterns.iter().map(|p| MatchPattern::new(p)).collect()
}

/// Returns true when the reviewer authored or committed any context commit.
fn is_self_review(review: &Review, commits: &[Commit]) -> bool {
    commits.iter().any(|commit| {
        actor_id_is(commit.author.as_ref().map(|a| a.id), review.user.id)
            || actor_id_is(commit.committer.as_ref().map(|c| c.id), review.user.id)
    })
}

/// Returns true when the optional actor id equals the reviewer id.
fn actor_id_is(actor: Option<UserId>, reviewer: UserId) -> bool {
    actor.is_some_and(|id| id == reviewer)
}

/// Returns true when at least one configured method accepts the review.
fn method_matches(
    review: &Review,
    methods: Option<&ApprovalMethods>,
    patterns: &[MatchPattern],
) -> bool {
    let Some(methods) = methods else {
        return false;
    };
    if methods.github_review && review.state == ReviewState::Approved {
        return true;
    }
    if !patterns.is_empty()
        && review.state == ReviewState::Commented
        && let Some(body) = &review.body
    {
        return patterns.iter().any(|pattern| pattern.matches(body));
    }
    false
}

// ============================================================================
// SECTION: Requirement Check
// ============================================================================

/// Counts method-valid reviews from authorized reviewers.
///
/// A reviewer counts at most once, keyed by user id; the first occurrence
/// wins.
///
/// # Errors
///
/// Returns [`MembershipError`] when a roster lookup fails.
pub fn count_authorized<S>(
    reviews: &[&Review],
    requirement: &ApprovalRequirement,
    membership: &MembershipResolver<'_, S>,
) -> Result<usize, MembershipError>
where
    S: MembershipSource,
{
    let mut counted: BTreeSet<UserId> = BTreeSet::new();
    for review in reviews {
        if counted.contains(&review.user.id) {
            continue;
        }
        if membership.is_member_of_any(&review.user.login, &requirement.reviewers)? {
            counted.insert(review.user.id);
        }
    }
    Ok(counted.len())
}
