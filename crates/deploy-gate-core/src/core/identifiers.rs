// crates/deploy-gate-core/src/core/identifiers.rs
// ============================================================================
// Module: Deploy Gate Identifiers
// Description: Canonical identifiers for actors, commits, and environments.
// Purpose: Provide strongly typed, serializable identity values with stable
// string forms. Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! This module defines the identifier types used throughout deploy-gate.
//! String-backed identifiers are opaque and serialize transparently; identity
//! comparison is exact string equality, never normalized or fuzzy. Team
//! references carry an `org/slug` wire form and fail loudly when malformed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Actor Identifiers
// ============================================================================

/// Login of a user account on the hosting provider.
///
/// # Invariants
/// - Compared by exact string equality; an empty login never matches any
///   identity set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Login(String);

impl Login {
    /// Creates a new login.
    #[must_use]
    pub fn new(login: impl Into<String>) -> Self {
        Self(login.into())
    }

    /// Returns the login as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when the login is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Login {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for Login {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Login {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Numeric account identifier assigned by the hosting provider.
///
/// # Invariants
/// - Stable for the lifetime of the account; used for self-review exclusion
///   and reviewer deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Creates a new user identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for UserId {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

/// Numeric review identifier assigned by the hosting provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewId(u64);

impl ReviewId {
    /// Creates a new review identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for ReviewId {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Organization Identifiers
// ============================================================================

/// Organization name on the hosting provider.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrgName(String);

impl OrgName {
    /// Creates a new organization name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrgName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for OrgName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for OrgName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Team reference formatted as `org/slug` on the wire.
///
/// # Invariants
/// - Both halves are non-empty; a malformed reference is a configuration
///   error at deserialization, never silently ignored.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TeamRef {
    /// Organization owning the team.
    org: OrgName,
    /// Team slug within the organization.
    slug: String,
}

/// Error raised when a team reference is not formatted as `org/slug`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("team reference must be formatted as org/slug: {0:?}")]
pub struct TeamRefError(pub String);

impl TeamRef {
    /// Creates a team reference from its parts.
    #[must_use]
    pub fn new(org: impl Into<OrgName>, slug: impl Into<String>) -> Self {
        Self {
            org: org.into(),
            slug: slug.into(),
        }
    }

    /// Returns the organization owning the team.
    #[must_use]
    pub const fn org(&self) -> &OrgName {
        &self.org
    }

    /// Returns the team slug within the organization.
    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }
}

impl fmt::Display for TeamRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.org, self.slug)
    }
}

impl std::str::FromStr for TeamRef {
    type Err = TeamRefError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.split_once('/') {
            Some((org, slug)) if !org.is_empty() && !slug.is_empty() && !slug.contains('/') => {
                Ok(Self::new(org, slug))
            }
            _ => Err(TeamRefError(value.to_string())),
        }
    }
}

impl TryFrom<String> for TeamRef {
    type Error = TeamRefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TeamRef> for String {
    fn from(value: TeamRef) -> Self {
        value.to_string()
    }
}

// ============================================================================
// SECTION: Change Identifiers
// ============================================================================

/// Commit SHA as reported by the hosting provider.
///
/// # Invariants
/// - Opaque; compared by exact string equality for deployment binding.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitSha(String);

impl CommitSha {
    /// Creates a new commit SHA.
    #[must_use]
    pub fn new(sha: impl Into<String>) -> Self {
        Self(sha.into())
    }

    /// Returns the SHA as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommitSha {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for CommitSha {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CommitSha {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Deployment environment name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvironmentName(String);

impl EnvironmentName {
    /// Creates a new environment name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EnvironmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for EnvironmentName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for EnvironmentName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
