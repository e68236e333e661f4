//! UI Modules
//!
//! Each module implements the Module trait and handles its own:
//! - Key input processing
//! - Rendering
//! - Enter/leave hooks tied to its route
//!
//! Modules:
//! - dashboard: Tile grid, search, refresh and the onboarding dropdown
//! - detail: Services of one tile
//! - login: Username/password form
//! - wizard: Onboarding definition builder shown over the dashboard
//! - export: Saving wizard output

pub mod dashboard;
pub mod detail;
pub mod export;
pub mod login;
pub mod wizard;
