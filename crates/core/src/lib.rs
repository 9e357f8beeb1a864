//! Core business logic for the academy backend.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Roles, catalog rules, the seat ledger, enrollment eligibility and pricing
//! live here; the `academy-db` crate applies them inside transactions.
//!
//! # Modules
//!
//! - `auth` - Password hashing, user roles and permissions
//! - `catalog` - Courses, periods, period lifecycle and the seat ledger
//! - `enrollment` - Enrollment eligibility, pricing and payments
//! - `cart` - Cart lifecycle and item admission rules

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod enrollment;
