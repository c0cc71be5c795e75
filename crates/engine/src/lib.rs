//! Berkana Engine library.
//!
//! Server-side code for the Berkana character sheet service.
//!
//! ## Structure
//!
//! - `use_cases/` - User story orchestration over the domain rules
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `api/` - HTTP entry points
//! - `app` - Application composition
//! - `config` - Environment configuration

pub mod api;
pub mod app;
pub mod config;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
