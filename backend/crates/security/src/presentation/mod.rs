//! Presentation Layer
//!
//! HTTP handlers, DTOs, request validation and routers.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod validation;
