//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! The access flow is split into small pieces composed by the session holder:
//! `locator` → `validator` → `loader`, driven through `auth` and gated by
//! `guard`. The four dashboard domains (`finances`, `health`, `academic`,
//! `schedule`) own their queries and aggregation so route handlers stay
//! focused on extraction and status codes.

pub mod academic;
pub mod auth;
pub mod clock;
pub mod dashboard;
pub mod finances;
pub mod guard;
pub mod health;
pub mod loader;
pub mod locator;
pub mod period;
pub mod schedule;
pub mod session;
pub mod store;
pub mod validator;
