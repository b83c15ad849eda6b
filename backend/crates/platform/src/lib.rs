//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Password hash verification (bcrypt and Argon2id PHC strings)
//! - Zeroized clear-text password handling
//! - Client identification (IP address, User-Agent)

pub mod client;
pub mod password;
