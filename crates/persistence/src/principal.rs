//! Principals and the permissions attached to their roles.
//!
//! The HTTP layer authenticates a request and hands the engine a
//! [`Principal`]. Every engine operation checks the principal's role before
//! touching storage.
//!
//! ```
//! use ldp_persistence::principal::{Operation, Principal, Role};
//!
//! let writer = Principal::new("alice", Role::Writer);
//! let reader = Principal::new("bob", Role::Reader);
//!
//! assert!(writer.check_permission(Operation::Create).is_ok());
//! assert!(reader.check_permission(Operation::Create).is_err());
//! assert!(reader.check_permission(Operation::Read).is_ok());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AccessError;

/// Operations that can be performed on resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Read resources and their descriptions.
    Read,
    /// Create new resources (POST, PUT to an unused path).
    Create,
    /// Replace or patch existing resources.
    Update,
    /// Delete resources and their descendants.
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Read => write!(f, "read"),
            Operation::Create => write!(f, "create"),
            Operation::Update => write!(f, "update"),
            Operation::Delete => write!(f, "delete"),
        }
    }
}

/// Roles a principal can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access.
    Admin,
    /// May read and mutate resources.
    Writer,
    /// May only read.
    Reader,
}

impl Role {
    /// Returns `true` if the role permits `operation`.
    pub fn can_perform(self, operation: Operation) -> bool {
        match self {
            Role::Admin | Role::Writer => true,
            Role::Reader => operation == Operation::Read,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Writer => write!(f, "writer"),
            Role::Reader => write!(f, "reader"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "writer" => Ok(Role::Writer),
            "reader" => Ok(Role::Reader),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// An authenticated (or anonymous) caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    id: String,
    role: Role,
}

impl Principal {
    /// Identifier recorded when authentication is disabled.
    pub const ANONYMOUS: &'static str = "anonymous";

    /// Identifier recorded for resources the server creates itself.
    pub const SYSTEM: &'static str = "system";

    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    /// The caller used when authentication is disabled. Has full access.
    pub fn anonymous() -> Self {
        Self::new(Self::ANONYMOUS, Role::Admin)
    }

    /// The server itself, e.g. when bootstrapping the root container.
    pub fn system() -> Self {
        Self::new(Self::SYSTEM, Role::Admin)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn can_perform(&self, operation: Operation) -> bool {
        self.role.can_perform(operation)
    }

    /// Checks that the principal may perform `operation`.
    pub fn check_permission(&self, operation: Operation) -> Result<(), AccessError> {
        if self.can_perform(operation) {
            Ok(())
        } else {
            Err(AccessError::Forbidden {
                principal: self.id.clone(),
                operation,
            })
        }
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.role)
    }
}
