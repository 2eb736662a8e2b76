//! User: a person of the simulation, placed in a home and possibly a zone.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SmartHomeError, ValidationError};
use crate::id::{HomeId, UserId, ZoneId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Parent,
    Child,
    Admin,
}

impl Role {
    /// Derive the sign-up role from the profile flags.
    ///
    /// Parent wins over child; guests and everyone else are plain users.
    #[must_use]
    pub fn from_flags(is_parent: bool, is_child: bool) -> Self {
        if is_parent {
            Self::Parent
        } else if is_child {
            Self::Child
        } else {
            Self::User
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Parent => "parent",
            Self::Child => "child",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "parent" => Ok(Self::Parent),
            "child" => Ok(Self::Child),
            "admin" => Ok(Self::Admin),
            other => Err(ValidationError::InvalidIdentifier(format!("role {other}"))),
        }
    }
}

/// Opaque password hash. Produced outside the domain, never serialized.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Credential(String);

impl Credential {
    #[must_use]
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(..)")
    }
}

/// A simulated person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(skip)]
    pub credential: Credential,
    pub role: Role,
    pub home_id: Option<HomeId>,
    /// `None` means outside the home.
    pub zone_id: Option<ZoneId>,
}

impl User {
    /// Create a builder for constructing a [`User`].
    #[must_use]
    pub fn builder() -> UserBuilder {
        UserBuilder::default()
    }

    /// Whether the user is inside some zone of `home_id`.
    #[must_use]
    pub fn is_present_in(&self, home_id: HomeId) -> bool {
        self.home_id == Some(home_id) && self.zone_id.is_some()
    }

    /// Whether `self` may manage the account of `target`.
    #[must_use]
    pub fn may_manage(&self, target: UserId) -> bool {
        self.id == target || self.role == Role::Admin
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::Validation`] when `name` is empty or the
    /// email address has no `@`.
    pub fn validate(&self) -> Result<(), SmartHomeError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        let email = self.email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err(ValidationError::InvalidEmail(self.email.clone()).into()),
        }
    }
}

/// Step-by-step builder for [`User`].
#[derive(Debug, Default)]
pub struct UserBuilder {
    id: Option<UserId>,
    name: Option<String>,
    email: Option<String>,
    credential: Option<Credential>,
    role: Option<Role>,
    home_id: Option<HomeId>,
    zone_id: Option<ZoneId>,
}

impl UserBuilder {
    #[must_use]
    pub fn id(mut self, id: UserId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    #[must_use]
    pub fn home_id(mut self, home_id: HomeId) -> Self {
        self.home_id = Some(home_id);
        self
    }

    #[must_use]
    pub fn zone_id(mut self, zone_id: ZoneId) -> Self {
        self.zone_id = Some(zone_id);
        self
    }

    /// Consume the builder, validate, and return a [`User`].
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::Validation`] if the name or email is invalid.
    pub fn build(self) -> Result<User, SmartHomeError> {
        let user = User {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            credential: self.credential.unwrap_or_default(),
            role: self.role.unwrap_or_default(),
            home_id: self.home_id,
            zone_id: self.zone_id,
        };
        user.validate()?;
        Ok(user)
    }
}
