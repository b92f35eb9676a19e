// crates/deploy-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Deploy Gate Interfaces
// Description: Host-supplied membership roster interfaces.
// Purpose: Define the contract surface the engine uses to resolve identity.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how the engine reaches identity data on the hosting
//! provider without embedding client details. Implementations must be
//! deterministic for the duration of one evaluation and must surface fetch
//! failures as errors; the engine never treats a failed lookup as
//! non-membership.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::Login;
use crate::core::identifiers::OrgName;

// ============================================================================
// SECTION: Membership Source
// ============================================================================

/// Roster member returned by membership lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Member login.
    pub login: Login,
}

/// Membership lookup errors.
#[derive(Debug, Error)]
pub enum MembershipError {
    /// Roster lookup failed upstream.
    #[error("membership lookup failed for {scope}: {message}")]
    Lookup {
        /// Roster that was being fetched (`org` or `org/slug`).
        scope: String,
        /// Failure reported by the host client.
        message: String,
    },
}

impl MembershipError {
    /// Creates a lookup error for an organization roster.
    #[must_use]
    pub fn organization(org: &OrgName, message: impl Into<String>) -> Self {
        Self::Lookup {
            scope: org.to_string(),
            message: message.into(),
        }
    }

    /// Creates a lookup error for a team roster.
    #[must_use]
    pub fn team(org: &OrgName, slug: &str, message: impl Into<String>) -> Self {
        Self::Lookup {
            scope: format!("{org}/{slug}"),
            message: message.into(),
        }
    }
}

/// Host-supplied source of organization and team rosters.
///
/// Lookups may hit the network; the engine memoizes results per evaluation,
/// so a conforming implementation is called at most once per roster key
/// within one evaluation.
pub trait MembershipSource {
    /// Lists the members of an organization.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError`] when the roster cannot be fetched.
    fn list_organization_members(&self, org: &OrgName) -> Result<Vec<Member>, MembershipError>;

    /// Lists the members of a team within an organization.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError`] when the roster cannot be fetched.
    fn list_team_members(
        &self,
        org: &OrgName,
        slug: &str,
    ) -> Result<Vec<Member>, MembershipError>;
}

impl<T> MembershipSource for &T
where
    T: MembershipSource + ?Sized,
{
    fn list_organization_members(&self, org: &OrgName) -> Result<Vec<Member>, MembershipError> {
        (**self).list_organization_members(org)
    }

    fn list_team_members(
        &self,
        org: &OrgName,
        slug: &str,
    ) -> Result<Vec<Member>, MembershipError> {
        (**self).list_team_members(org, slug)
    }
}
