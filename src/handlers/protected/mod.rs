// handlers/protected/mod.rs - Handlers behind person_auth_middleware
//
// Every handler here receives Extension<AuthPerson>; the person it carries is
// the acting identity for ownership checks and audit stamping.

pub mod person;
pub mod todo;
pub mod utils;
