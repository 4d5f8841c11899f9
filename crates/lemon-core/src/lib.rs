//! # Lemon Core
//! 
//! Domain entities, access rules, repository traits and services for the
//! Little Lemon ordering backend.

pub mod access;
pub mod domain;
pub mod error;
pub mod integrity;
pub mod query;
pub mod repositories;
pub mod services;

// Re-export domain entities
pub use access::{Caller, OrderScope, Role};
pub use domain::*;
pub use error::{DomainError, FieldErrors};
