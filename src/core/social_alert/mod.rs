// Social feed alerts. For now only the Facebook Graph API lookups exist;
// posting alerts into guild channels builds on these.

pub mod social_client;
pub mod social_models;

pub use social_client::{SocialAlertError, SocialGraphClient};
pub use social_models::{is_valid_page_id, FacebookCredentials, FacebookPage, FeedPost};
