//! Explicit session context.
//!
//! Screens receive the session as an argument instead of reading global
//! auth state, which keeps the view layer testable without a backend.

use std::fmt;

use chrono::{DateTime, Utc};
use roster_model::{TenantId, UserId};
use tracing::info;

use crate::error::{Result, SourceError};

/// Partition boundary every query and mutation is restricted to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantScope {
    tenant: TenantId,
}

impl TenantScope {
    pub fn new(tenant: TenantId) -> Self {
        Self { tenant }
    }

    pub fn tenant(&self) -> &TenantId {
        &self.tenant
    }
}

impl fmt::Display for TenantScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.tenant.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionState {
    SignedOut,
    SignedIn {
        user: UserId,
        scope: TenantScope,
        since: DateTime<Utc>,
    },
}

/// Login/logout lifecycle of the current user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    state: SessionState,
}

impl Default for Session {
    fn default() -> Self {
        Self::signed_out()
    }
}

impl Session {
    pub fn signed_out() -> Self {
        Self {
            state: SessionState::SignedOut,
        }
    }

    pub fn signed_in(user: UserId, tenant: TenantId) -> Self {
        let mut session = Self::signed_out();
        session.sign_in(user, tenant);
        session
    }

    pub fn sign_in(&mut self, user: UserId, tenant: TenantId) {
        info!(user = %user, tenant = %tenant, "signed in");
        self.state = SessionState::SignedIn {
            user,
            scope: TenantScope::new(tenant),
            since: Utc::now(),
        };
    }

    pub fn sign_out(&mut self) {
        if let SessionState::SignedIn { user, .. } = &self.state {
            info!(user = %user, "signed out");
        }
        self.state = SessionState::SignedOut;
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self.state, SessionState::SignedIn { .. })
    }

    /// Tenant scope of the signed-in user, or an auth failure.
    pub fn scope(&self) -> Result<&TenantScope> {
        match &self.state {
            SessionState::SignedIn { scope, .. } => Ok(scope),
            SessionState::SignedOut => Err(SourceError::Auth("not signed in".to_string())),
        }
    }

    pub fn user(&self) -> Option<&UserId> {
        match &self.state {
            SessionState::SignedIn { user, .. } => Some(user),
            SessionState::SignedOut => None,
        }
    }

    pub fn signed_in_since(&self) -> Option<DateTime<Utc>> {
        match &self.state {
            SessionState::SignedIn { since, .. } => Some(*since),
            SessionState::SignedOut => None,
        }
    }
}
