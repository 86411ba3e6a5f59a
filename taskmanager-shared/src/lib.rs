//! # Task Manager Shared Library
//!
//! Types, storage and business logic used by the task manager API server.
//!
//! ## Module Organization
//!
//! - `models`: row types and PostgreSQL queries for roles, users and tasks
//! - `repository`: per-entity repository traits, PostgreSQL and in-memory stores
//! - `services`: role, user and task services over the repositories
//! - `seed`: demo data seeding for an empty store
//! - `auth`: password hashing
//! - `db`: connection pool and migrations
//! - `error`: common error type

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod repository;
pub mod seed;
pub mod services;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
