// crates/deploy-gate-core/src/core/policy.rs
// ============================================================================
// Module: Deploy Gate Policy Model
// Description: Approval policy documents, rules, conditions, requirements.
// Purpose: Define canonical policy types with validation helpers.
// Dependencies: crate::core::{hashing, identifiers, pattern}, serde, smallvec,
// thiserror
// ============================================================================

//! ## Overview
//! A policy document lists approval rules combined with OR at the top level.
//! Rules are either references to named rules or inline AND/OR groups nesting
//! arbitrarily; named rules gate on conditions and demand a threshold of
//! authorized approving reviews. Documents are validated at load time: rule
//! names are unique, every reference resolves, rule trees are depth-bounded,
//! and every configured pattern compiles. A policy that fails validation is a
//! configuration error, never a denial.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use smallvec::SmallVec;
use thiserror::Error;

use crate::core::hashing::DEFAULT_HASH_ALGORITHM;
use crate::core::hashing::HashAlgorithm;
use crate::core::hashing::HashDigest;
use crate::core::hashing::HashError;
use crate::core::identifiers::EnvironmentName;
use crate::core::identifiers::Login;
use crate::core::identifiers::OrgName;
use crate::core::identifiers::TeamRef;
use crate::core::pattern::MatchPattern;
use crate::core::pattern::PatternError;

// ============================================================================
// SECTION: Identity Sets
// ============================================================================

/// Union of user logins, organizations, and teams naming authorized
/// identities.
///
/// # Invariants
/// - Omitted fields are empty and contribute no membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct IdentitySet {
    /// Individual user logins.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<Login>,
    /// Organizations whose members are authorized.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub organizations: Vec<OrgName>,
    /// Teams (as `org/slug`) whose members are authorized.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub teams: Vec<TeamRef>,
}

impl IdentitySet {
    /// Returns true when the set names no identities at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.organizations.is_empty() && self.teams.is_empty()
    }
}

// ============================================================================
// SECTION: Rule Conditions
// ============================================================================

/// Environment predicate applied by a rule condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EnvironmentCondition {
    /// Allowed environment names (inclusive whitelist).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matches: Option<Vec<EnvironmentName>>,
    /// Disallowed environment names (blacklist).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_matches: Option<Vec<EnvironmentName>>,
}

/// Gate deciding whether a rule applies to the evaluation at hand.
///
/// # Invariants
/// - Every provided predicate must hold; absent predicates are vacuously
///   true. A condition with no fields set always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RuleCondition {
    /// Environment whitelist/blacklist predicate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<EnvironmentCondition>,
    /// Every commit must carry a provider-verified signature from an
    /// authorized committer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_valid_signatures_by: Option<IdentitySet>,
    /// Every commit's author must be authorized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub was_authored_by: Option<IdentitySet>,
}

// ============================================================================
// SECTION: Requirements and Methods
// ============================================================================

/// Threshold of authorized approving reviews demanded by a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRequirement {
    /// Number of distinct valid approving reviews required.
    pub count: u32,
    /// Identities allowed to approve.
    #[serde(flatten)]
    pub reviewers: IdentitySet,
}

/// Mechanisms by which a review counts as approving.
///
/// # Invariants
/// - A rule whose `methods` are wholly absent accepts no review; a counted
///   requirement under it can never be satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ApprovalMethods {
    /// Count reviews whose state is `APPROVED`.
    #[serde(default)]
    pub github_review: bool,
    /// Count `COMMENTED` reviews whose body matches any of these patterns.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub github_review_comment_patterns: Vec<String>,
}

// ============================================================================
// SECTION: Approval Rules
// ============================================================================

/// Child storage for inline rule groups.
pub type RuleChildren = SmallVec<[Box<ApprovalRule>; 4]>;

/// Approval rule expression.
///
/// On the wire a rule is a bare string (reference to a named rule), an
/// `{and: […]}` group, an `{or: […]}` group, or a bare list treated as OR.
/// Inline groups nest arbitrarily; named references are leaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApprovalRule {
    /// Reference to a named approval rule.
    Named(String),
    /// Conjunction of child rules.
    And {
        /// Child rules, all of which must hold.
        and: RuleChildren,
    },
    /// Disjunction of child rules.
    Or {
        /// Child rules, any of which may hold.
        or: RuleChildren,
    },
    /// Bare ordered list, treated as a disjunction.
    List(RuleChildren),
}

impl ApprovalRule {
    /// Creates a reference to a named approval rule.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Creates a conjunction of the given rules.
    #[must_use]
    pub fn all_of(rules: Vec<Self>) -> Self {
        Self::And {
            and: rules.into_iter().map(Box::new).collect(),
        }
    }

    /// Creates a disjunction of the given rules.
    #[must_use]
    pub fn any_of(rules: Vec<Self>) -> Self {
        Self::Or {
            or: rules.into_iter().map(Box::new).collect(),
        }
    }
}

/// Named approval rule: an optional gate plus an approval threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedApprovalRule {
    /// Rule name, unique within the policy.
    pub name: String,
    /// Gate deciding whether the rule applies; an unmet gate skips the rule.
    #[serde(default, rename = "if", skip_serializing_if = "Option::is_none")]
    pub condition: Option<RuleCondition>,
    /// Approval threshold; absent (or zero) means automatically satisfied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires: Option<ApprovalRequirement>,
    /// Mechanisms by which reviews count as approving.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub methods: Option<ApprovalMethods>,
}

// ============================================================================
// SECTION: Policy Document
// ============================================================================

/// Top-level approval section of a policy document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ApprovalPolicy {
    /// Ordered rule list combined with OR.
    #[serde(default)]
    pub approval: Vec<ApprovalRule>,
}

/// Canonical policy document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PolicyConfig {
    /// Top-level approval policy.
    #[serde(default)]
    pub policy: ApprovalPolicy,
    /// Named approval rules referenced from the policy.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub approval_rules: Vec<NamedApprovalRule>,
}

/// Maximum nesting depth accepted for inline rule trees.
pub const MAX_RULE_DEPTH: usize = 32;

impl PolicyConfig {
    /// Returns the named rule with the given name, if defined.
    #[must_use]
    pub fn rule_named(&self, name: &str) -> Option<&NamedApprovalRule> {
        self.approval_rules.iter().find(|rule| rule.name == name)
    }

    /// Computes the canonical hash of the policy document.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Canonicalization`] when serialization fails.
    pub fn canonical_hash(&self) -> Result<HashDigest, HashError> {
        crate::core::hashing::hash_canonical_json(DEFAULT_HASH_ALGORITHM, self)
    }

    /// Computes the canonical hash using a specific algorithm.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Canonicalization`] when serialization fails.
    pub fn canonical_hash_with(&self, algorithm: HashAlgorithm) -> Result<HashDigest, HashError> {
        crate::core::hashing::hash_canonical_json(algorithm, self)
    }

    /// Validates the policy document invariants.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`] when validation fails.
    pub fn validate(&self) -> Result<(), PolicyError> {
        ensure_unique_rule_names(&self.approval_rules)?;
        for rule in &self.policy.approval {
            ensure_rule_depth(rule, 0)?;
            ensure_references_resolve(rule, self)?;
        }
        ensure_patterns_compile(&self.approval_rules)?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Policy document validation and resolution errors.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// Duplicate named rule detected.
    #[error("duplicate approval rule name: {0}")]
    DuplicateRule(String),
    /// Policy references a rule that is not defined.
    #[error("approval policy references unknown rule: {0}")]
    UnknownRule(String),
    /// Named rule reference cycle detected during evaluation.
    #[error("circular approval rule reference: {0}")]
    CircularReference(String),
    /// Inline rule tree nests deeper than the supported bound.
    #[error("approval rule tree exceeds maximum depth ({max_depth})")]
    RuleTreeTooDeep {
        /// Maximum supported nesting depth.
        max_depth: usize,
    },
    /// A configured pattern failed to compile.
    #[error("invalid pattern in rule {rule:?}: {source}")]
    InvalidPattern {
        /// Name of the rule carrying the pattern.
        rule: String,
        /// Underlying compilation failure.
        #[source]
        source: PatternError,
    },
    /// Policy document could not be canonicalized for fingerprinting.
    #[error("failed to fingerprint policy: {0}")]
    Digest(#[from] HashError),
}

// ============================================================================
// SECTION: Validation Helpers
// ============================================================================

/// Ensures named rule names are unique within the document.
fn ensure_unique_rule_names(rules: &[NamedApprovalRule]) -> Result<(), PolicyError> {
    for (index, rule) in rules.iter().enumerate() {
        if rules.iter().skip(index + 1).any(|other| other.name == rule.name) {
            return Err(PolicyError::DuplicateRule(rule.name.clone()));
        }
    }
    Ok(())
}

/// Ensures an inline rule tree stays within the supported depth bound.
fn ensure_rule_depth(rule: &ApprovalRule, depth: usize) -> Result<(), PolicyError> {
    if depth > MAX_RULE_DEPTH {
        return Err(PolicyError::RuleTreeTooDeep {
            max_depth: MAX_RULE_DEPTH,
        });
    }
    match rule {
        ApprovalRule::Named(_) => Ok(()),
        ApprovalRule::And {
            and: children,
        }
        | ApprovalRule::Or {
            or: children,
        }
        | ApprovalRule::List(children) => {
            for child in children {
                ensure_rule_depth(child, depth + 1)?;
            }
            Ok(())
        }
    }
}

/// Ensures every named reference in a rule tree resolves.
fn ensure_references_resolve(rule: &ApprovalRule, config: &PolicyConfig) -> Result<(), PolicyError> {
    for name in collect_references(rule) {
        if config.rule_named(name).is_none() {
            return Err(PolicyError::UnknownRule(name.to_string()));
        }
    }
    Ok(())
}

/// Ensures every configured pattern compiles.
fn ensure_patterns_compile(rules: &[NamedApprovalRule]) -> Result<(), PolicyError> {
    for rule in rules {
        let Some(methods) = &rule.methods else {
            continue;
        };
        for pattern in &methods.github_review_comment_patterns {
            MatchPattern::new(pattern).map_err(|source| PolicyError::InvalidPattern {
                rule: rule.name.clone(),
                source,
            })?;
        }
    }
    Ok(())
}

/// Collects named references in a rule tree.
fn collect_references(rule: &ApprovalRule) -> Vec<&str> {
    let mut out = Vec::new();
    collect_references_inner(rule, &mut out);
    out
}

/// Walks a rule tree and appends named references.
fn collect_references_inner<'a>(rule: &'a ApprovalRule, out: &mut Vec<&'a str>) {
    match rule {
        ApprovalRule::Named(name) => {
            if !out.contains(&name.as_str()) {
                out.push(name);
            }
        }
        ApprovalRule::And {
            and: children,
        }
        | ApprovalRule::Or {
            or: children,
        }
        | ApprovalRule::List(children) => {
            for child in children {
                collect_references_inner(child, out);
            }
        }
    }
}
