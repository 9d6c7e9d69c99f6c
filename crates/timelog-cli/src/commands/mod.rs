pub mod auth;
pub mod check;
pub mod classify;
pub mod config;
pub mod record;
pub mod timer;
