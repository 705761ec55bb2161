pub mod confirmation;
pub mod delivery;
pub mod welcome_models;
pub mod welcome_service;
pub mod welcome_store;

pub use confirmation::ConfirmationChannel;
pub use delivery::{DeliveryError, DirectMessenger};
pub use welcome_service::{GuildJoinOutcome, WelcomeService};
pub use welcome_store::{WelcomeError, WelcomeMessageStore};
