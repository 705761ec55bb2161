pub mod adapters;
pub mod events;
