use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::models::{Admin, AdminSummary, Hotel};
use crate::db::{AdminStore, HotelStore};
use crate::error::{AuthError, DatabaseError};
use crate::Result;

/// Process-local store backing the test suites. Email uniqueness is
/// checked and the insert applied under one write lock.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    admins: Arc<RwLock<Vec<Admin>>>,
    hotels: Arc<RwLock<HashMap<Uuid, Hotel>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AdminStore for InMemoryStore {
    async fn find_admin_by_email(&self, email: &str) -> Result<Option<Admin>> {
        let admins = self.admins.read().await;
        Ok(admins.iter().find(|a| a.email == email).cloned())
    }

    async fn find_admin_by_id(&self, id: Uuid) -> Result<Option<Admin>> {
        let admins = self.admins.read().await;
        Ok(admins.iter().find(|a| a.id == id).cloned())
    }

    async fn insert_admin(&self, admin: &Admin) -> Result<Admin> {
        let mut admins = self.admins.write().await;
        if admins.iter().any(|a| a.email == admin.email) {
            return Err(AuthError::DuplicateEmail.into());
        }
        admins.push(admin.clone());
        Ok(admin.clone())
    }

    async fn update_admin(&self, admin: &Admin) -> Result<()> {
        let mut admins = self.admins.write().await;
        let stored = admins
            .iter_mut()
            .find(|a| a.id == admin.id)
            .ok_or(DatabaseError::NotFound)?;
        *stored = admin.clone();
        Ok(())
    }

    async fn count_admins(&self) -> Result<i64> {
        Ok(self.admins.read().await.len() as i64)
    }

    async fn list_admins(&self) -> Result<Vec<AdminSummary>> {
        let admins = self.admins.read().await;
        Ok(admins
            .iter()
            .map(|a| AdminSummary {
                name: a.name.clone(),
                email: a.email.clone(),
            })
            .collect())
    }
}

#[async_trait]
impl HotelStore for InMemoryStore {
    async fn insert_hotel(&self, hotel: &Hotel) -> Result<Hotel> {
        self.hotels.write().await.insert(hotel.id, hotel.clone());
        Ok(hotel.clone())
    }

    async fn list_hotels(&self) -> Result<Vec<Hotel>> {
        let mut hotels: Vec<Hotel> = self.hotels.read().await.values().cloned().collect();
        hotels.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(hotels)
    }

    async fn delete_hotel(&self, id: Uuid) -> Result<Option<Hotel>> {
        Ok(self.hotels.write().await.remove(&id))
    }

    async fn count_hotels(&self) -> Result<i64> {
        Ok(self.hotels.read().await.len() as i64)
    }
}
