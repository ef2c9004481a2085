//! Access policy.
//!
//! Callers decode their own credentials into a [`Principal`]; this module only
//! decides whether that principal may perform an [`Action`].

use crate::error::{JoblyError, JoblyResult};

/// Who is making the request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Principal {
    #[default]
    Anonymous,
    User { username: String, is_admin: bool },
}

impl Principal {
    pub fn user(username: impl Into<String>) -> Self {
        Self::User {
            username: username.into(),
            is_admin: false,
        }
    }

    pub fn admin(username: impl Into<String>) -> Self {
        Self::User {
            username: username.into(),
            is_admin: true,
        }
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::User { username, .. } => Some(username),
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::User { is_admin: true, .. })
    }
}

/// Operations exposed to callers, keyed by their target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<'a> {
    ListCompanies,
    GetCompany,
    CreateCompany,
    UpdateCompany,
    RemoveCompany,
    ListJobs,
    GetJob,
    CreateJob,
    UpdateJob,
    RemoveJob,
    RegisterUser,
    ListUsers,
    GetUser(&'a str),
    UpdateUser(&'a str),
    RemoveUser(&'a str),
    ApplyToJob(&'a str),
}

pub fn ensure_logged_in(principal: &Principal) -> JoblyResult<()> {
    match principal {
        Principal::Anonymous => Err(JoblyError::unauthorized("login required")),
        Principal::User { .. } => Ok(()),
    }
}

pub fn ensure_admin(principal: &Principal) -> JoblyResult<()> {
    ensure_logged_in(principal)?;
    if principal.is_admin() {
        Ok(())
    } else {
        Err(JoblyError::unauthorized("admin only"))
    }
}

/// Passes for `username` itself or any admin.
pub fn ensure_correct_user_or_admin(principal: &Principal, username: &str) -> JoblyResult<()> {
    ensure_logged_in(principal)?;
    if principal.is_admin() || principal.username() == Some(username) {
        Ok(())
    } else {
        Err(JoblyError::unauthorized(format!("not allowed to act as {username}")))
    }
}

pub fn authorize(principal: &Principal, action: Action<'_>) -> JoblyResult<()> {
    let result = match action {
        Action::ListCompanies | Action::GetCompany | Action::ListJobs | Action::GetJob => Ok(()),
        Action::CreateCompany
        | Action::UpdateCompany
        | Action::RemoveCompany
        | Action::CreateJob
        | Action::UpdateJob
        | Action::RemoveJob
        | Action::RegisterUser
        | Action::ListUsers => ensure_admin(principal),
        Action::GetUser(username)
        | Action::UpdateUser(username)
        | Action::RemoveUser(username)
        | Action::ApplyToJob(username) => ensure_correct_user_or_admin(principal, username),
    };
    if let Err(ref e) = result {
        tracing::debug!(target: "jobly.model", ?action, principal = ?principal.username(), error = %e, "denied");
    }
    result
}

/// Password hashing seam used by the user model.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> JoblyResult<String>;

    fn verify(&self, password: &str, hash: &str) -> JoblyResult<bool>;
}
