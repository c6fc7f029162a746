//! Admin authentication.
//!
//! Passwords are bcrypt hashed, sessions are signed tokens carried in an
//! HTTP-only cookie, and password resets go through a short-lived token sent
//! by mail.

pub mod credentials;
pub mod handlers;
pub mod password;
pub mod reset;
mod service;
pub mod token;

pub use credentials::CredentialStore;
pub use password::{PasswordHasher, PASSWORD_COST};
pub use reset::ResetTokens;
pub use service::{AdminList, AuthService};
pub use token::{Claims, TokenIssuer};
