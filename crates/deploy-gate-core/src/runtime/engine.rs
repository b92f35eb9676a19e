// crates/deploy-gate-core/src/runtime/engine.rs
// ============================================================================
// Module: Deploy Gate Policy Engine
// Description: Three-valued rule evaluation and the allow/deny decision.
// Purpose: Evaluate approval policies against context snapshots
// deterministically. Dependencies: crate::{core, interfaces, runtime},
// skip-logic, serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! The policy engine is the single canonical evaluation path: it validates
//! the policy document up front, walks the rule tree to a three-valued
//! outcome, and maps that outcome to an allow/deny decision. Skipped rules
//! drop out of their groups; a top level where every rule skipped denies the
//! deployment. Configuration defects and roster fetch failures surface as
//! errors, never as denials.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use skip_logic::RuleState;
use skip_logic::combine_all;
use skip_logic::combine_any;
use thiserror::Error;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::core::context::PolicyContext;
use crate::core::hashing::HashDigest;
use crate::core::policy::ApprovalRule;
use crate::core::policy::NamedApprovalRule;
use crate::core::policy::PolicyConfig;
use crate::core::policy::PolicyError;
use crate::interfaces::MembershipError;
use crate::interfaces::MembershipSource;
use crate::runtime::condition::evaluate_condition;
use crate::runtime::membership::MembershipResolver;
use crate::runtime::reviews::count_authorized;
use crate::runtime::reviews::filter_method_valid;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Evaluation errors surfaced to the caller.
///
/// Both kinds are fatal to the evaluation: a malformed policy must fail
/// loudly and a failed roster fetch must be retryable upstream. Neither is
/// ever mapped to a deny decision.
#[derive(Debug, Error)]
pub enum EvaluationError {
    /// Policy document defect discovered during evaluation.
    #[error("policy configuration error: {0}")]
    Config(#[from] PolicyError),
    /// Roster lookup failed upstream.
    #[error(transparent)]
    Membership(#[from] MembershipError),
}

// ============================================================================
// SECTION: Evaluation Report
// ============================================================================

/// Outcome of one named rule within an evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTraceEntry {
    /// Name of the evaluated rule.
    pub name: String,
    /// Three-valued outcome of the rule.
    pub state: RuleState,
    /// Number of authorized approving reviews counted for the rule.
    pub approvals: usize,
}

/// Serializable result of one policy evaluation.
///
/// # Invariants
/// - `allowed` is true exactly when `status` is `Pass`.
/// - `trace` lists named rule outcomes in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyEvaluation {
    /// Final allow/deny decision.
    pub allowed: bool,
    /// Three-valued outcome of the top-level rule list.
    pub status: RuleState,
    /// Canonical digest of the policy that produced the decision.
    pub policy_digest: HashDigest,
    /// Named rule outcomes in evaluation order.
    pub trace: Vec<RuleTraceEntry>,
}

// ============================================================================
// SECTION: Policy Engine
// ============================================================================

/// Deployment approval policy engine.
///
/// # Invariants
/// - The policy document is validated at construction; a constructed engine
///   never discovers an unresolvable reference or uncompilable pattern.
/// - The engine holds no mutable state; evaluations are independent and
///   pure given identical context and roster responses.
pub struct PolicyEngine<S> {
    /// Validated policy document.
    config: PolicyConfig,
    /// Host-supplied roster source.
    membership: S,
    /// Canonical digest of the policy document.
    digest: HashDigest,
}

impl<S> PolicyEngine<S>
where
    S: MembershipSource,
{
    /// Creates a new engine over a validated policy document.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`] when the policy document fails validation or
    /// cannot be fingerprinted.
    pub fn new(config: PolicyConfig, membership: S) -> Result<Self, PolicyError> {
        config.validate()?;
        let digest = config.canonical_hash()?;
        Ok(Self {
            config,
            membership,
            digest,
        })
    }

    /// Returns the policy document the engine evaluates.
    #[must_use]
    pub const fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Returns the canonical digest of the policy document.
    #[must_use]
    pub const fn policy_digest(&self) -> &HashDigest {
        &self.digest
    }

    /// Evaluates the policy against a context snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError`] on configuration defects or roster fetch
    /// failures; a completed evaluation never errors.
    pub fn evaluate(&self, context: &PolicyContext) -> Result<bool, EvaluationError> {
        Ok(self.evaluate_detailed(context)?.allowed)
    }

    /// Evaluates the policy and returns the full per-rule report.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError`] on configuration defects or roster fetch
    /// failures.
    pub fn evaluate_detailed(
        &self,
        context: &PolicyContext,
    ) -> Result<PolicyEvaluation, EvaluationError> {
        let rules = &self.config.policy.approval;
        if rules.is_empty() {
            warn!(policy = %self.digest.value, "approval policy lists no rules; denying");
            return Ok(PolicyEvaluation {
                allowed: false,
                status: RuleState::Skipped,
                policy_digest: self.digest.clone(),
                trace: Vec::new(),
            });
        }

        debug!(policy = %self.digest.value, rules = rules.len(), "evaluating approval policy");

        let membership = MembershipResolver::new(&self.membership);
        let mut trace = Vec::new();
        let mut visited: Vec<String> = Vec::new();
        let mut states = Vec::with_capacity(rules.len());
        for rule in rules {
            states.push(self.evaluate_rule(rule, context, &membership, &mut trace, &mut visited)?);
        }
        let status = combine_any(states);
        let allowed = status.is_pass();

        if allowed {
            info!(policy = %self.digest.value, "deployment approved by policy");
        } else if status.is_skipped() {
            warn!(policy = %self.digest.value, "no approval rule applied; denying");
        } else {
            warn!(policy = %self.digest.value, "approval policy not satisfied; denying");
        }

        Ok(PolicyEvaluation {
            allowed,
            status,
            policy_digest: self.digest.clone(),
            trace,
        })
    }

    /// Evaluates one rule expression to a three-valued outcome.
    fn evaluate_rule(
        &self,
        rule: &ApprovalRule,
        context: &PolicyContext,
        membership: &MembershipResolver<'_, S>,
        trace: &mut Vec<RuleTraceEntry>,
        visited: &mut Vec<String>,
    ) -> Result<RuleState, EvaluationError> {
        match rule {
            ApprovalRule::Named(name) => {
                if visited.iter().any(|seen| seen == name) {
                    return Err(PolicyError::CircularReference(name.clone()).into());
                }
                let named = self
                    .config
                    .rule_named(name)
                    .ok_or_else(|| PolicyError::UnknownRule(name.clone()))?;
                visited.push(name.clone());
                let state = self.evaluate_named(named, context, membership, trace);
                visited.pop();
                state
            }
            ApprovalRule::And {
                and: children,
            } => {
                let mut states = Vec::with_capacity(children.len());
                for child in children {
                    states.push(self.evaluate_rule(child, context, membership, trace, visited)?);
                }
                Ok(combine_all(states))
            }
            ApprovalRule::Or {
                or: children,
            }
            | ApprovalRule::List(children) => {
                let mut states = Vec::with_capacity(children.len());
                for child in children {
                    states.push(self.evaluate_rule(child, context, membership, trace, visited)?);
                }
                Ok(combine_any(states))
            }
        }
    }

    /// Evaluates a named rule: condition gate, then approval threshold.
    fn evaluate_named(
        &self,
        named: &NamedApprovalRule,
        context: &PolicyContext,
        membership: &MembershipResolver<'_, S>,
        trace: &mut Vec<RuleTraceEntry>,
    ) -> Result<RuleState, EvaluationError> {
        if let Some(condition) = &named.condition
            && !evaluate_condition(condition, context, membership)?
        {
            debug!(rule = %named.name, "condition not met; rule skipped");
            trace.push(RuleTraceEntry {
                name: named.name.clone(),
                state: RuleState::Skipped,
                approvals: 0,
            });
            return Ok(RuleState::Skipped);
        }

        let requires = match &named.requires {
            Some(requires) if requires.count > 0 => requires,
            _ => {
                debug!(rule = %named.name, "no approval threshold; rule satisfied");
                trace.push(RuleTraceEntry {
                    name: named.name.clone(),
                    state: RuleState::Pass,
                    approvals: 0,
                });
                return Ok(RuleState::Pass);
            }
        };

        let valid = filter_method_valid(
            &context.reviews,
            &context.commits,
            context.deployment_sha(),
            named.methods.as_ref(),
        )
        .map_err(|source| PolicyError::InvalidPattern {
            rule: named.name.clone(),
            source,
        })?;
        let approvals = count_authorized(&valid, requires, membership)?;
        let needed = usize::try_from(requires.count).unwrap_or(usize::MAX);
        let state = RuleState::from(approvals >= needed);

        debug!(rule = %named.name, state = %state, approvals, needed, "approval rule evaluated");
        trace.push(RuleTraceEntry {
            name: named.name.clone(),
            state,
            approvals,
        });
        Ok(state)
    }
}
