//!
//! # Netlist Result and Error Types
//!

use std::fmt;

use serde::{Deserialize, Serialize};

/// # [NetlistError] Result Type
pub type NetlistResult<T> = Result<T, NetlistError>;

/// Entity namespace, used to report which kind of entity an error concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Cell,
    Pin,
    Net,
    StdCell,
    StdCellPin,
}
impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            EntityKind::Cell => "cell",
            EntityKind::Pin => "pin",
            EntityKind::Net => "net",
            EntityKind::StdCell => "standard-cell",
            EntityKind::StdCellPin => "standard-cell pin",
        };
        write!(f, "{}", s)
    }
}

///
/// # Netlist Error Enumeration
///
/// All errors are synchronous and local to the operation that raised them;
/// a rejected operation never leaves the netlist partially mutated.
///
#[derive(Debug, PartialEq, Eq)]
pub enum NetlistError {
    /// Insertion under an already-used name
    NameConflict { kind: EntityKind, name: String },
    /// Operation on a stale, destroyed, or null entity
    UnknownEntity { kind: EntityKind },
    /// Lookup by name with no match
    NotFound { kind: EntityKind, name: String },
    /// Unresolved standard-cell type (or type-pin) name
    UnknownType { name: String },
    /// Cell type change with incompatible pin arity
    TypeMismatch { have: usize, want: usize },
    /// Rejected request against the structure's current state,
    /// e.g. removal of a net whose pins are still connected
    InvalidState(String),
    /// # [Ptr] Locking
    /// Generally caused by a [std::sync::PoisonError], which is not forwardable due to lifetime constraints.
    PtrLock,
}
impl NetlistError {
    /// Create a [NetlistError::InvalidState] from anything String-convertible
    pub fn invalid_state(s: impl Into<String>) -> Self {
        Self::InvalidState(s.into())
    }
}
impl fmt::Display for NetlistError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NetlistError::NameConflict { kind, name } => {
                write!(f, "{} name `{}` is already in use", kind, name)
            }
            NetlistError::UnknownEntity { kind } => {
                write!(f, "invalid or stale {} entity", kind)
            }
            NetlistError::NotFound { kind, name } => {
                write!(f, "no {} named `{}`", kind, name)
            }
            NetlistError::UnknownType { name } => {
                write!(f, "unresolved standard-cell type `{}`", name)
            }
            NetlistError::TypeMismatch { have, want } => {
                write!(
                    f,
                    "pin-count mismatch: cell has {} pins, type declares {}",
                    have, want
                )
            }
            NetlistError::InvalidState(msg) => write!(f, "invalid state: {}", msg),
            NetlistError::PtrLock => write!(f, "[std::sync::PoisonError]"),
        }
    }
}
impl std::error::Error for NetlistError {}

impl<T> From<std::sync::PoisonError<T>> for NetlistError {
    fn from(_e: std::sync::PoisonError<T>) -> Self {
        Self::PtrLock
    }
}
