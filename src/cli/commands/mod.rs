pub mod auth;
pub mod event_types;
pub mod events;
pub mod inbox;
pub mod payments;
pub mod public;
pub mod templates;
