//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, OS-backed randomness, hex)
//! - Password hashing schemes (Argon2id, plain digest)
//! - Cookie management

pub mod cookie;
pub mod crypto;
pub mod password;
