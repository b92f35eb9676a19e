// crates/deploy-gate-core/tests/support/mod.rs
// ============================================================================
// Module: Test Support
// Description: Shared helpers and roster doubles for engine integration tests.
// ============================================================================
//! ## Overview
//! Shared test helpers: Result-based assertions, in-memory roster sources,
//! and context fixture builders.

#![allow(
    dead_code,
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output, panic-based assertions, and per-binary unused helpers are permitted."
)]

use std::cell::Cell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;

use deploy_gate_core::Commit;
use deploy_gate_core::CommitSha;
use deploy_gate_core::GitActor;
use deploy_gate_core::Login;
use deploy_gate_core::Member;
use deploy_gate_core::MembershipError;
use deploy_gate_core::MembershipSource;
use deploy_gate_core::OrgName;
use deploy_gate_core::Review;
use deploy_gate_core::ReviewId;
use deploy_gate_core::ReviewState;
use deploy_gate_core::SignatureVerification;
use deploy_gate_core::UserId;

// ========================================================================
// Test Result Helpers
// ========================================================================

/// Standard result type used across engine integration tests.
pub type TestResult<T = ()> = Result<T, Box<dyn Error>>;

/// Lightweight error type for test assertions.
#[derive(Debug)]
struct TestError {
    /// Human-readable failure message.
    message: String,
}

impl TestError {
    /// Creates a new test error with the provided message.
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TestError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

impl Error for TestError {}

/// Returns an error when a test condition fails.
///
/// # Errors
/// Returns a `TestError` when the condition is false.
pub fn ensure(condition: bool, message: impl Into<String>) -> TestResult {
    if condition { Ok(()) } else { Err(Box::new(TestError::new(message))) }
}

// ========================================================================
// Roster Doubles
// ========================================================================

/// In-memory roster source with fixed members.
#[derive(Debug, Default)]
pub struct StaticMembership {
    /// Organization rosters keyed by organization name.
    orgs: BTreeMap<String, Vec<String>>,
    /// Team rosters keyed by organization and slug.
    teams: BTreeMap<(String, String), Vec<String>>,
}

impl StaticMembership {
    /// Creates an empty roster source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an organization roster.
    pub fn with_org(mut self, org: &str, members: &[&str]) -> Self {
        self.orgs.insert(org.to_string(), members.iter().map(ToString::to_string).collect());
        self
    }

    /// Adds a team roster.
    pub fn with_team(mut self, org: &str, slug: &str, members: &[&str]) -> Self {
        self.teams.insert(
            (org.to_string(), slug.to_string()),
            members.iter().map(ToString::to_string).collect(),
        );
        self
    }
}

/// Converts roster logins into members.
fn to_members(logins: Option<&Vec<String>>) -> Vec<Member> {
    logins
        .map(|logins| {
            logins
                .iter()
                .map(|login| Member {
                    login: Login::new(login),
                })
                .collect()
        })
        .unwrap_or_default()
}

impl MembershipSource for StaticMembership {
    fn list_organization_members(&self, org: &OrgName) -> Result<Vec<Member>, MembershipError> {
        Ok(to_members(self.orgs.get(org.as_str())))
    }

    fn list_team_members(
        &self,
        org: &OrgName,
        slug: &str,
    ) -> Result<Vec<Member>, MembershipError> {
        Ok(to_members(self.teams.get(&(org.as_str().to_string(), slug.to_string()))))
    }
}

/// Roster source that counts fetches before delegating.
#[derive(Debug)]
pub struct CountingMembership {
    /// Delegate roster source.
    inner: StaticMembership,
    /// Number of organization roster fetches.
    pub org_fetches: Cell<usize>,
    /// Number of team roster fetches.
    pub team_fetches: Cell<usize>,
}

impl CountingMembership {
    /// Wraps a static roster source with fetch counters.
    pub fn new(inner: StaticMembership) -> Self {
        Self {
            inner,
            org_fetches: Cell::new(0),
            team_fetches: Cell::new(0),
        }
    }
}

impl MembershipSource for CountingMembership {
    fn list_organization_members(&self, org: &OrgName) -> Result<Vec<Member>, MembershipError> {
        self.org_fetches.set(self.org_fetches.get() + 1);
        self.inner.list_organization_members(org)
    }

    fn list_team_members(
        &self,
        org: &OrgName,
        slug: &str,
    ) -> Result<Vec<Member>, MembershipError> {
        self.team_fetches.set(self.team_fetches.get() + 1);
        self.inner.list_team_members(org, slug)
    }
}

/// Roster source whose lookups always fail.
#[derive(Debug, Default)]
pub struct FailingMembership;

impl MembershipSource for FailingMembership {
    fn list_organization_members(&self, org: &OrgName) -> Result<Vec<Member>, MembershipError> {
        Err(MembershipError::organization(org, "roster backend offline"))
    }

    fn list_team_members(
        &self,
        org: &OrgName,
        slug: &str,
    ) -> Result<Vec<Member>, MembershipError> {
        Err(MembershipError::team(org, slug, "roster backend offline"))
    }
}

// ========================================================================
// Context Fixtures
// ========================================================================

/// Creates an actor with the given id and login.
pub fn actor(id: u64, login: &str) -> GitActor {
    GitActor {
        id: UserId::new(id),
        login: Login::new(login),
    }
}

/// Creates a commit authored and committed by the same actor, unverified.
pub fn authored_commit(sha: &str, author: GitActor) -> Commit {
    Commit {
        sha: CommitSha::new(sha),
        author: Some(author.clone()),
        committer: Some(author),
        verification: None,
    }
}

/// Creates a commit with explicit committer and verification outcome.
pub fn signed_commit(sha: &str, committer: GitActor, verified: bool) -> Commit {
    Commit {
        sha: CommitSha::new(sha),
        author: Some(committer.clone()),
        committer: Some(committer),
        verification: Some(SignatureVerification {
            verified,
            reason: None,
        }),
    }
}

/// Creates an `APPROVED` review bound to the given SHA.
pub fn approved_review(id: u64, reviewer: GitActor, sha: &str) -> Review {
    Review {
        id: ReviewId::new(id),
        user: reviewer,
        state: ReviewState::Approved,
        body: None,
        submitted_at: None,
        commit_id: CommitSha::new(sha),
    }
}

/// Creates a `COMMENTED` review with the given body, bound to the given SHA.
pub fn commented_review(id: u64, reviewer: GitActor, body: &str, sha: &str) -> Review {
    Review {
        id: ReviewId::new(id),
        user: reviewer,
        state: ReviewState::Commented,
        body: Some(body.to_string()),
        submitted_at: None,
        commit_id: CommitSha::new(sha),
    }
}
