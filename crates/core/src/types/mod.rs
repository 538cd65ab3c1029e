//! Core types for Jabuticaba.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cep;
pub mod email;
pub mod id;
pub mod status;
pub mod uf;

pub use cep::{Cep, CepParseError};
pub use email::{Email, EmailError};
pub use id::*;
pub use status::{OrderStatus, StatusError};
pub use uf::{Uf, UfParseError};
