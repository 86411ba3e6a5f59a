/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `roles`: Role listing and creation
/// - `users`: User management and ADMIN elevation
/// - `tasks`: Task management, completion and ownership

pub mod health;
pub mod roles;
pub mod tasks;
pub mod users;
