//! Authentication and authorization primitives.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Password verification
//! - The closed set of user roles and what each may do

mod password;

pub use password::{PasswordError, hash_password, verify_password};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Enrolls in periods, owns a cart.
    Student,
    /// Teaches periods. Read-only access to the catalog.
    Teacher,
    /// Manages the catalog and all enrollments.
    Admin,
}

/// Something a caller may want to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Read courses and periods.
    ViewCatalog,
    /// Create courses and periods, change period status and capacity.
    ManageCatalog,
    /// Own a cart and check it out.
    UseCart,
    /// Read one's own enrollments.
    ViewOwnEnrollments,
    /// Create enrollments on behalf of students.
    EnrollStudents,
    /// List, update and delete any enrollment, record payments on it.
    ManageEnrollments,
}

impl Permission {
    /// Returns the string representation of the permission.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ViewCatalog => "view_catalog",
            Self::ManageCatalog => "manage_catalog",
            Self::UseCart => "use_cart",
            Self::ViewOwnEnrollments => "view_own_enrollments",
            Self::EnrollStudents => "enroll_students",
            Self::ManageEnrollments => "manage_enrollments",
        }
    }
}

/// A role was asked to do something it may not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("role {role} may not {}", permission.as_str())]
pub struct AccessDenied {
    /// The caller's role.
    pub role: UserRole,
    /// What was attempted.
    pub permission: Permission,
}

impl UserRole {
    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
            Self::Admin => "admin",
        }
    }

    /// Parses a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "student" => Some(Self::Student),
            "teacher" => Some(Self::Teacher),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Returns true if this role grants the permission.
    #[must_use]
    pub const fn allows(&self, permission: Permission) -> bool {
        match permission {
            Permission::ViewCatalog => true,
            Permission::UseCart | Permission::ViewOwnEnrollments => matches!(self, Self::Student),
            Permission::ManageCatalog
            | Permission::EnrollStudents
            | Permission::ManageEnrollments => matches!(self, Self::Admin),
        }
    }

    /// Like [`UserRole::allows`] but returns an error for use with `?`.
    pub const fn authorize(self, permission: Permission) -> Result<(), AccessDenied> {
        if self.allows(permission) {
            Ok(())
        } else {
            Err(AccessDenied {
                role: self,
                permission,
            })
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
