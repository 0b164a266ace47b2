//! # quill-auth
//!
//! Credential service for quillbox.
//!
//! Two concerns, both opaque to the rest of the system:
//! - One-way password hashing (Argon2id)
//! - Stateless signed session tokens (HS256, 24h lifetime)
//!
//! Tokens are never persisted server-side and cannot be revoked before
//! expiry; logout is purely client-side credential clearing.

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenService, TOKEN_TTL_HOURS};
