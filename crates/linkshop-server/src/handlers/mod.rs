//! HTTP handlers

pub mod admin;
pub mod assets;
pub mod auth;
pub mod categories;
pub mod form;
pub mod ping;
pub mod products;
pub mod profile;
pub mod socials;

pub use ping::ping;
