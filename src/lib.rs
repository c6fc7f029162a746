pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod hotels;
pub mod mail;

use std::sync::Arc;
use std::time::Duration;
use sqlx::PgPool;
use actix_files::Files;
use actix_web::{web, HttpResponse};
use tracing::info;

pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
pub use config::Settings;

pub use auth::{AuthService, CredentialStore, PasswordHasher, ResetTokens, TokenIssuer};
pub use db::{Admin, AdminStore, DbOperations, Hotel, HotelStore, InMemoryStore};
pub use mail::Mailer;

/// Health check endpoint handler
/// Returns a JSON response with server status and timestamp
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Application state shared across all workers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub db_pool: Option<Arc<PgPool>>,
    pub auth_service: Arc<AuthService>,
    pub hotels: Arc<dyn HotelStore>,
}

impl AppState {
    /// Connects to PostgreSQL, applies migrations when enabled and wires
    /// the services.
    pub async fn new(config: Settings) -> Result<Self> {
        let db = DbOperations::new_with_options(
            &config.database.url,
            config.database.max_connections,
            Duration::from_secs(5),
        )
        .await?;

        if config.database.run_migrations {
            db.run_migrations().await?;
            info!("Database migrations applied");
        }

        std::fs::create_dir_all(&config.uploads.dir)?;

        let mailer = mail::from_config(&config.mail)?;
        let pool = db.pool();
        let db = Arc::new(db);

        let mut state = Self::from_parts(config, db.clone(), db, mailer, PasswordHasher::new())?;
        state.db_pool = Some(pool);
        Ok(state)
    }

    /// Wires the services over the given stores and mailer.
    pub fn from_parts(
        config: Settings,
        admins: Arc<dyn AdminStore>,
        hotels: Arc<dyn HotelStore>,
        mailer: Arc<dyn Mailer>,
        hasher: PasswordHasher,
    ) -> Result<Self> {
        let issuer = TokenIssuer::new(&config.auth.jwt_secret);
        let resets = ResetTokens::new(
            issuer.clone(),
            chrono::Duration::minutes(config.auth.reset_ttl_minutes),
            &config.mail.reset_url,
        )?;

        let auth_service = AuthService::new(
            CredentialStore::new(admins, hasher),
            issuer,
            chrono::Duration::hours(config.auth.session_ttl_hours),
            resets,
            mailer,
        );

        Ok(Self {
            config: Arc::new(config),
            db_pool: None,
            auth_service: Arc::new(auth_service),
            hotels,
        })
    }

    pub async fn shutdown(&self) -> Result<()> {
        if let Some(pool) = &self.db_pool {
            pool.close().await;
        }
        Ok(())
    }
}

/// Route table shared by the server binary and the integration tests.
pub fn configure_routes(cfg: &mut web::ServiceConfig, settings: &Settings) {
    use auth::handlers as auth_api;
    use hotels::handlers as hotel_api;

    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _| AppError::ValidationError(err.to_string()).into()),
    )
    // an id that does not parse cannot name a record
    .app_data(
        web::PathConfig::default()
            .error_handler(|_, _| AppError::from(error::DatabaseError::NotFound).into()),
    )
    .route("/health", web::get().to(health_check))
    .service(
        web::scope("/api/auth")
            .route("/register", web::post().to(auth_api::register))
            .route("/login", web::post().to(auth_api::login))
            .route("/me", web::get().to(auth_api::me))
            .route("/logout", web::post().to(auth_api::logout))
            .route("/users", web::get().to(auth_api::list_users))
            .route("/users/count", web::get().to(auth_api::count_users))
            .route("/forgot-password", web::post().to(auth_api::forgot_password))
            .route("/reset-password", web::post().to(auth_api::reset_password)),
    )
    .service(
        web::scope("/api/hotels")
            .route("", web::post().to(hotel_api::create_hotel))
            .route("", web::get().to(hotel_api::list_hotels))
            .route("/count", web::get().to(hotel_api::count_hotels))
            .route("/{id}", web::delete().to(hotel_api::delete_hotel)),
    )
    .service(Files::new("/uploads", &settings.uploads.dir));
}
