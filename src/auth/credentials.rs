use std::sync::Arc;
use uuid::Uuid;

use crate::auth::password::PasswordHasher;
use crate::db::{Admin, AdminStore, AdminSummary};
use crate::error::AuthError;
use crate::Result;

/// Admin records plus the hashing that guards their password field.
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn AdminStore>,
    hasher: PasswordHasher,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn AdminStore>, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Admin>> {
        self.store.find_admin_by_email(email).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Admin>> {
        self.store.find_admin_by_id(id).await
    }

    /// The pre-check gives the common case a cheap answer; a registration
    /// racing past it is still rejected by the store's uniqueness rule.
    pub async fn create(&self, name: &str, email: &str, password: &str) -> Result<Admin> {
        if self.store.find_admin_by_email(email).await?.is_some() {
            return Err(AuthError::DuplicateEmail.into());
        }

        let hash = self.hasher.hash(password).await?;
        let admin = Admin::new(name.to_string(), email.to_string(), hash);
        self.store.insert_admin(&admin).await
    }

    /// Hashes `password` and replaces the admin's stored hash.
    pub async fn set_password(&self, admin: &mut Admin, password: &str) -> Result<()> {
        let hash = self.hasher.hash(password).await?;
        admin.set_password(hash);
        self.save(admin).await
    }

    pub async fn save(&self, admin: &Admin) -> Result<()> {
        self.store.update_admin(admin).await
    }

    pub async fn verify_password(&self, admin: &Admin, password: &str) -> bool {
        self.hasher.verify(password, &admin.password_hash).await
    }

    pub async fn count(&self) -> Result<i64> {
        self.store.count_admins().await
    }

    pub async fn list_all(&self) -> Result<Vec<AdminSummary>> {
        self.store.list_admins().await
    }
}
