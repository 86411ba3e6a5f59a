/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
///
/// Session handling and login flows live outside this crate; the user service
/// only hashes passwords on the way in and verifies them on request.

pub mod password;
