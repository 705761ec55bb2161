// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

#[path = "welcome/mod.rs"]
pub mod welcome;

#[path = "social_alert/mod.rs"]
pub mod social_alert;
