//! Outcome: the result of a rules-engine operation.
//!
//! Every operation reports whether it went through, with an optional
//! human-readable message. Refusals are values, not errors: a denied
//! arming request is a normal answer, and the home is left untouched.

use std::fmt;

use serde::Serialize;

use crate::id::{HomeId, ZoneId};

/// Why (part of) an operation was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// Arming was requested while users are present in the home.
    UsersPresent,
    /// A user tried to enter a zone while the home is armed.
    AlarmTriggered,
    /// The caller may not act on someone else's account.
    NotPermitted,
    /// A referenced home does not exist.
    UnknownHome(HomeId),
    /// A referenced zone does not exist.
    UnknownZone(ZoneId),
}

/// Coarse classification of a [`Denial`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    /// A rule of the home refused the request.
    Policy,
    /// The caller's identity does not allow the request.
    Authorization,
    /// The request referenced something that does not exist.
    Validation,
}

impl Denial {
    #[must_use]
    pub fn kind(&self) -> DenialKind {
        match self {
            Self::UsersPresent | Self::AlarmTriggered => DenialKind::Policy,
            Self::NotPermitted => DenialKind::Authorization,
            Self::UnknownHome(_) | Self::UnknownZone(_) => DenialKind::Validation,
        }
    }

    /// Human-readable reason shown to the acting user.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::UsersPresent => {
                "Alarm cannot be engaged because there are still users present in the home."
            }
            Self::AlarmTriggered => {
                "Alarm has been triggered. Please leave the home and disable the alarm."
            }
            Self::NotPermitted => "You are not allowed to perform this action.",
            Self::UnknownHome(_) => "Home supplied does not exist",
            Self::UnknownZone(_) => "Zone supplied does not exist",
        }
    }
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

/// Result of an operation that may be refused by a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// Everything requested was applied.
    Applied(T),
    /// The record was persisted but some requested parts were refused.
    Partial { value: T, notices: Vec<Denial> },
    /// Nothing was changed.
    Denied(Denial),
}

impl<T> Outcome<T> {
    /// Build an outcome from a value and the notices gathered on the way.
    #[must_use]
    pub fn with_notices(value: T, notices: Vec<Denial>) -> Self {
        if notices.is_empty() {
            Self::Applied(value)
        } else {
            Self::Partial { value, notices }
        }
    }

    #[must_use]
    pub fn success(&self) -> bool {
        !matches!(self, Self::Denied(_))
    }

    /// The message shown to the caller, set whenever something was refused.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Applied(_) => None,
            Self::Partial { notices, .. } => Some(
                notices
                    .iter()
                    .map(Denial::reason)
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            Self::Denied(denial) => Some(denial.reason().to_string()),
        }
    }

    /// The refusal that stopped the operation, if any.
    #[must_use]
    pub fn denial(&self) -> Option<&Denial> {
        match self {
            Self::Denied(denial) => Some(denial),
            _ => None,
        }
    }

    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Applied(value) | Self::Partial { value, .. } => Some(value),
            Self::Denied(_) => None,
        }
    }

    #[must_use]
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Applied(value) | Self::Partial { value, .. } => Some(value),
            Self::Denied(_) => None,
        }
    }

    /// Transform the carried value, keeping notices and denials.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Applied(value) => Outcome::Applied(f(value)),
            Self::Partial { value, notices } => Outcome::Partial {
                value: f(value),
                notices,
            },
            Self::Denied(denial) => Outcome::Denied(denial),
        }
    }
}
