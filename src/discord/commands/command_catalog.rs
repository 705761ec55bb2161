// Discord commands module.
// Each feature gets its own command file.

pub mod welcome;

pub mod social_alert;

// Bot presence management
pub mod presence;
