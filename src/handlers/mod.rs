// handlers/mod.rs - Public and protected handler tiers
//
// Public (no auth): service info and health
// Protected (bearer token resolved to a Person): /todo/*, /person/*

pub mod public;
pub mod protected;
