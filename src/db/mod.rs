//! Persistence for admin accounts and hotel records.
//!
//! Services talk to the [`AdminStore`] and [`HotelStore`] traits; the
//! PostgreSQL implementation lives in [`operations`] and an in-memory one in
//! [`memory`].

pub mod memory;
pub mod models;
pub mod operations;

use async_trait::async_trait;
use uuid::Uuid;

use crate::Result;

pub use memory::InMemoryStore;
pub use models::{Admin, AdminProfile, AdminSummary, Hotel, NewHotel, PasswordHash};
pub use operations::DbOperations;

#[async_trait]
pub trait AdminStore: Send + Sync {
    async fn find_admin_by_email(&self, email: &str) -> Result<Option<Admin>>;

    async fn find_admin_by_id(&self, id: Uuid) -> Result<Option<Admin>>;

    /// Fails with `AuthError::DuplicateEmail` when the email is already taken.
    async fn insert_admin(&self, admin: &Admin) -> Result<Admin>;

    async fn update_admin(&self, admin: &Admin) -> Result<()>;

    async fn count_admins(&self) -> Result<i64>;

    async fn list_admins(&self) -> Result<Vec<AdminSummary>>;
}

#[async_trait]
pub trait HotelStore: Send + Sync {
    async fn insert_hotel(&self, hotel: &Hotel) -> Result<Hotel>;

    /// Newest first.
    async fn list_hotels(&self) -> Result<Vec<Hotel>>;

    /// Returns the removed hotel, `None` when no hotel had this id.
    async fn delete_hotel(&self, id: Uuid) -> Result<Option<Hotel>>;

    async fn count_hotels(&self) -> Result<i64>;
}
