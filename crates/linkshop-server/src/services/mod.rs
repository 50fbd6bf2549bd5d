//! Outbound services: media hosts and the keep-alive pinger

pub mod cloudinary;
pub mod placeholder;
pub mod self_ping;
#[cfg(test)]
pub mod testing;

pub use cloudinary::CloudinaryHost;
pub use placeholder::PlaceholderHost;
