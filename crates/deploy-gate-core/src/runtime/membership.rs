// crates/deploy-gate-core/src/runtime/membership.rs
// ============================================================================
// Module: Deploy Gate Membership Resolver
// Description: Identity-set membership with per-evaluation roster memoization.
// Purpose: Decide whether a login belongs to an identity set deterministically.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The membership resolver answers "is this login in this identity set" by
//! checking direct user lists, then organization rosters, then team rosters,
//! short-circuiting on the first hit. Rosters are fetched through the host's
//! [`MembershipSource`] and memoized for the resolver's lifetime, so each
//! roster key is fetched at most once per evaluation. A fetch failure is an
//! evaluation error, never silent non-membership.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::core::identifiers::Login;
use crate::core::identifiers::OrgName;
use crate::core::identifiers::TeamRef;
use crate::core::policy::IdentitySet;
use crate::interfaces::MembershipError;
use crate::interfaces::MembershipSource;

// ============================================================================
// SECTION: Membership Resolver
// ============================================================================

/// Resolves identity-set membership for the duration of one evaluation.
///
/// # Invariants
/// - Roster caches are confined to this resolver and discarded with it;
///   nothing is shared across evaluations.
/// - Each `(org)` and `(org, slug)` roster is fetched at most once.
pub struct MembershipResolver<'a, S> {
    /// Host-supplied roster source.
    source: &'a S,
    /// Memoized organization rosters keyed by organization.
    org_rosters: RefCell<BTreeMap<OrgName, BTreeSet<Login>>>,
    /// Memoized team rosters keyed by organization and slug.
    team_rosters: RefCell<BTreeMap<(OrgName, String), BTreeSet<Login>>>,
}

impl<'a, S> MembershipResolver<'a, S>
where
    S: MembershipSource,
{
    /// Creates a resolver over the given roster source.
    #[must_use]
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            org_rosters: RefCell::new(BTreeMap::new()),
            team_rosters: RefCell::new(BTreeMap::new()),
        }
    }

    /// Returns true when the login belongs to the identity set.
    ///
    /// Checks direct users, then organizations, then teams, short-circuiting
    /// on the first hit. An empty login never matches; empty lists contribute
    /// no membership.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError`] when a roster lookup fails.
    pub fn is_member_of_any(
        &self,
        login: &Login,
        set: &IdentitySet,
    ) -> Result<bool, MembershipError> {
        if login.is_empty() {
            return Ok(false);
        }
        if set.users.iter().any(|user| user == login) {
            return Ok(true);
        }
        for org in &set.organizations {
            if self.organization_contains(org, login)? {
                return Ok(true);
            }
        }
        for team in &set.teams {
            if self.team_contains(team, login)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Returns true when the organization roster contains the login.
    fn organization_contains(
        &self,
        org: &OrgName,
        login: &Login,
    ) -> Result<bool, MembershipError> {
        let mut rosters = self.org_rosters.borrow_mut();
        if !rosters.contains_key(org) {
            let members = self.source.list_organization_members(org)?;
            let roster = members.into_iter().map(|member| member.login).collect();
            rosters.insert(org.clone(), roster);
        }
        Ok(rosters.get(org).is_some_and(|roster| roster.contains(login)))
    }

    /// Returns true when the team roster contains the login.
    fn team_contains(&self, team: &TeamRef, login: &Login) -> Result<bool, MembershipError> {
        let key = (team.org().clone(), team.slug().to_string());
        let mut rosters = self.team_rosters.borrow_mut();
        if !rosters.contains_key(&key) {
            let members = self.source.list_team_members(team.org(), team.slug())?;
            let roster = members.into_iter().map(|member| member.login).collect();
            rosters.insert(key.clone(), roster);
        }
        Ok(rosters.get(&key).is_some_and(|roster| roster.contains(login)))
    }
}
