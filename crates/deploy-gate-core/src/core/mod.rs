// crates/deploy-gate-core/src/core/mod.rs
// ============================================================================
// Module: Deploy Gate Core Types
// Description: Canonical policy document and evaluation context structures.
// Purpose: Provide stable, serializable types for approval policies.
// Dependencies: serde, smallvec
// ============================================================================

//! ## Overview
//! Core types define the approval policy document, the evaluation context
//! snapshot, the pattern dialects, and the canonical hashing helpers. These
//! types are the canonical source of truth for any derived host surfaces.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod context;
pub mod hashing;
pub mod identifiers;
pub mod pattern;
pub mod policy;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use context::Commit;
pub use context::CommitRef;
pub use context::Deployment;
pub use context::Environment;
pub use context::GitActor;
pub use context::PolicyContext;
pub use context::Review;
pub use context::ReviewState;
pub use context::SignatureVerification;
pub use context::Timestamp;
pub use hashing::DEFAULT_HASH_ALGORITHM;
pub use hashing::HashAlgorithm;
pub use hashing::HashDigest;
pub use hashing::HashError;
pub use identifiers::CommitSha;
pub use identifiers::EnvironmentName;
pub use identifiers::Login;
pub use identifiers::OrgName;
pub use identifiers::ReviewId;
pub use identifiers::TeamRef;
pub use identifiers::TeamRefError;
pub use identifiers::UserId;
pub use pattern::MatchPattern;
pub use pattern::PatternError;
pub use policy::ApprovalMethods;
pub use policy::ApprovalPolicy;
pub use policy::ApprovalRequirement;
pub use policy::ApprovalRule;
pub use policy::EnvironmentCondition;
pub use policy::IdentitySet;
pub use policy::MAX_RULE_DEPTH;
pub use policy::NamedApprovalRule;
pub use policy::PolicyConfig;
pub use policy::PolicyError;
pub use policy::RuleChildren;
pub use policy::RuleCondition;
