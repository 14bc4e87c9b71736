pub mod admin;
pub mod events;
pub mod families;
pub mod messages;
pub mod news;
pub mod public;
pub mod root;
pub mod staff;
