//! Application Layer
//!
//! Services and data transfer objects. This layer sits between the
//! transport handlers and the domain/registry.

pub mod dto;
pub mod services;
