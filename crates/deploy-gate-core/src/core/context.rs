// crates/deploy-gate-core/src/core/context.rs
// ============================================================================
// Module: Deploy Gate Evaluation Context
// Description: Snapshot of commits, reviews, and deployment facts.
// Purpose: Provide the immutable input record for one policy evaluation.
// Dependencies: crate::core::identifiers, serde
// ============================================================================

//! ## Overview
//! The evaluation context is a host-assembled snapshot of everything the
//! engine may consult: the change's commits with signature verification
//! metadata, the submitted reviews, the target environment, and the pending
//! deployment. The snapshot is immutable for the duration of one evaluation;
//! the engine never fetches change data itself and never reads wall-clock
//! time (timestamps are explicit caller-supplied values).

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::CommitSha;
use crate::core::identifiers::EnvironmentName;
use crate::core::identifiers::Login;
use crate::core::identifiers::ReviewId;
use crate::core::identifiers::UserId;

// ============================================================================
// SECTION: Time Values
// ============================================================================

/// Caller-supplied timestamp attached to context records.
///
/// # Invariants
/// - Values are explicitly provided by the host; the engine never reads
///   wall-clock time and performs no validation on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Timestamp {
    /// Unix epoch milliseconds.
    UnixMillis(i64),
    /// Monotonic logical time value.
    Logical(u64),
}

// ============================================================================
// SECTION: Actors and Commits
// ============================================================================

/// Account that authored, committed, or reviewed a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitActor {
    /// Numeric account identifier.
    pub id: UserId,
    /// Account login.
    pub login: Login,
}

/// Provider-computed signature verification metadata for a commit.
///
/// # Invariants
/// - `verified` is trusted as-is; the engine performs no cryptographic
///   verification of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureVerification {
    /// Whether the provider verified the commit signature.
    pub verified: bool,
    /// Provider-reported verification reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Commit included in the proposed change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Commit SHA.
    pub sha: CommitSha,
    /// Commit author, when known to the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<GitActor>,
    /// Commit committer, when known to the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committer: Option<GitActor>,
    /// Signature verification metadata, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification: Option<SignatureVerification>,
}

// ============================================================================
// SECTION: Reviews
// ============================================================================

/// Review state reported by the hosting provider.
///
/// # Invariants
/// - Unrecognized states deserialize to `Unrecognized` and never satisfy an
///   approval method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    /// Reviewer approved the change.
    Approved,
    /// Reviewer requested changes.
    ChangesRequested,
    /// Reviewer left a comment without an explicit verdict.
    Commented,
    /// Review was dismissed.
    Dismissed,
    /// Review is pending submission.
    Pending,
    /// State the engine does not recognize.
    #[serde(other)]
    Unrecognized,
}

/// Review submitted against the change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Review identifier.
    pub id: ReviewId,
    /// Reviewer account.
    pub user: GitActor,
    /// Review state.
    pub state: ReviewState,
    /// Review body text, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Submission time, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<Timestamp>,
    /// SHA of the commit the review was submitted against.
    pub commit_id: CommitSha,
}

// ============================================================================
// SECTION: Environment and Deployment
// ============================================================================

/// Target environment for the evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// Environment name.
    pub name: EnvironmentName,
}

/// Commit reference carried by a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRef {
    /// Commit SHA.
    pub sha: CommitSha,
}

/// Pending deployment the evaluation decides on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    /// Environment the deployment targets.
    pub environment: EnvironmentName,
    /// Provider event that created the deployment.
    pub event: String,
    /// Commit the deployment is bound to.
    pub commit: CommitRef,
}

// ============================================================================
// SECTION: Policy Context
// ============================================================================

/// Immutable input snapshot for one policy evaluation.
///
/// # Invariants
/// - `commits` and `reviews` preserve provider order.
/// - The snapshot is never mutated during evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PolicyContext {
    /// Commits included in the change, in provider order.
    #[serde(default)]
    pub commits: Vec<Commit>,
    /// Reviews submitted against the change, in provider order.
    #[serde(default)]
    pub reviews: Vec<Review>,
    /// Target environment, when the evaluation is environment-scoped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,
    /// Pending deployment, when one is bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment: Option<Deployment>,
}

impl PolicyContext {
    /// Returns the SHA the pending deployment is bound to, if any.
    #[must_use]
    pub fn deployment_sha(&self) -> Option<&CommitSha> {
        self.deployment.as_ref().map(|deployment| &deployment.commit.sha)
    }
}
