// Social alert infra layer.
// - `facebook_client.rs` talks to the Facebook Graph HTTP API.

pub mod facebook_client;

pub use facebook_client::FacebookGraphClient;
