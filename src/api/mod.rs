pub mod client;
pub mod pagination;
pub mod token;

pub mod announcements;
pub mod auth;
pub mod chat;
pub mod direct_messages;
pub mod event_types;
pub mod events;
pub mod inbox;
pub mod invitation_templates;
pub mod invitations;
pub mod participants;
pub mod payments;
pub mod public;
pub mod whatsapp;

pub use client::{ApiClient, LogoutHandler, MultipartForm};
pub use pagination::{Page, QueryParams};
pub use token::TokenStore;
