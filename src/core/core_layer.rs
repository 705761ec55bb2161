// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "welcome/mod.rs"]
pub mod welcome;

#[path = "social_alert/mod.rs"]
pub mod social_alert;
