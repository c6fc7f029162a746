use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A bcrypt digest. Only the password hasher and the store produce values of
/// this type, so a plaintext password cannot end up in `Admin::password_hash`.
#[derive(Clone, PartialEq, Eq, sqlx::Type)]
#[sqlx(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub(crate) fn from_digest(digest: String) -> Self {
        Self(digest)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash([REDACTED])")
    }
}

/// Admin account. Deliberately not `Serialize`; use [`AdminProfile`] or
/// [`AdminSummary`] on the wire.
#[derive(Debug, Clone, FromRow)]
pub struct Admin {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: PasswordHash,
}

impl Admin {
    pub fn new(name: String, email: String, password_hash: PasswordHash) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
        }
    }

    pub fn set_password(&mut self, password_hash: PasswordHash) {
        self.password_hash = password_hash;
    }

    pub fn profile(&self) -> AdminProfile {
        AdminProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct AdminSummary {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Hotel {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub price: f64,
    pub description: String,
    /// Stored upload filename, empty when the hotel has no picture.
    pub image: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewHotel {
    pub name: String,
    pub location: String,
    pub price: f64,
    pub description: String,
    pub image: String,
}

impl Hotel {
    pub fn new(new: NewHotel) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: new.name,
            location: new.location,
            price: new.price,
            description: new.description,
            image: new.image,
            created_at: Utc::now(),
        }
    }
}
