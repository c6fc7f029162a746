use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::db::models::{Admin, AdminSummary, Hotel};
use crate::db::{AdminStore, HotelStore};
use crate::error::{AppError, AuthError, DatabaseError};
use crate::Result;

/// PostgreSQL-backed store. Email uniqueness is enforced by the
/// `admins_email_key` index, which is what settles concurrent registrations.
#[derive(Clone)]
pub struct DbOperations {
    pool: Arc<PgPool>,
}

impl DbOperations {
    pub async fn new_with_options(
        url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(url)
            .await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

        Ok(Self { pool: Arc::new(pool) })
    }

    pub fn pool(&self) -> Arc<PgPool> {
        self.pool.clone()
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(self.pool.as_ref()).await?;
        Ok(())
    }
}

#[async_trait]
impl AdminStore for DbOperations {
    async fn insert_admin(&self, admin: &Admin) -> Result<Admin> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"
            INSERT INTO admins (id, name, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash
            "#,
        )
        .bind(admin.id)
        .bind(&admin.name)
        .bind(&admin.email)
        .bind(&admin.password_hash)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::DatabaseError(DatabaseError::Duplicate) => AuthError::DuplicateEmail.into(),
            other => other,
        })?;

        Ok(admin)
    }

    async fn find_admin_by_email(&self, email: &str) -> Result<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(
            "SELECT id, name, email, password_hash FROM admins WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(admin)
    }

    async fn find_admin_by_id(&self, id: Uuid) -> Result<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(
            "SELECT id, name, email, password_hash FROM admins WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(admin)
    }

    async fn update_admin(&self, admin: &Admin) -> Result<()> {
        let result = sqlx::query(
            "UPDATE admins SET name = $1, email = $2, password_hash = $3, updated_at = NOW() WHERE id = $4",
        )
        .bind(&admin.name)
        .bind(&admin.email)
        .bind(&admin.password_hash)
        .bind(admin.id)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound.into());
        }
        Ok(())
    }

    async fn count_admins(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM admins")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn list_admins(&self) -> Result<Vec<AdminSummary>> {
        let admins = sqlx::query_as::<_, AdminSummary>(
            "SELECT name, email FROM admins ORDER BY created_at",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(admins)
    }
}

#[async_trait]
impl HotelStore for DbOperations {
    async fn insert_hotel(&self, hotel: &Hotel) -> Result<Hotel> {
        let hotel = sqlx::query_as::<_, Hotel>(
            r#"
            INSERT INTO hotels (id, name, location, price, description, image, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, location, price, description, image, created_at
            "#,
        )
        .bind(hotel.id)
        .bind(&hotel.name)
        .bind(&hotel.location)
        .bind(hotel.price)
        .bind(&hotel.description)
        .bind(&hotel.image)
        .bind(hotel.created_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(hotel)
    }

    async fn list_hotels(&self) -> Result<Vec<Hotel>> {
        let hotels = sqlx::query_as::<_, Hotel>(
            "SELECT id, name, location, price, description, image, created_at FROM hotels ORDER BY created_at DESC",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(hotels)
    }

    async fn delete_hotel(&self, id: Uuid) -> Result<Option<Hotel>> {
        let hotel = sqlx::query_as::<_, Hotel>(
            "DELETE FROM hotels WHERE id = $1 RETURNING id, name, location, price, description, image, created_at",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(hotel)
    }

    async fn count_hotels(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM hotels")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
