//! Profile types

use crate::{ImageRef, Social};
use serde::{Deserialize, Serialize};

/// The single public profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub display_name: String,
    pub username: String,
    pub bio: String,
    pub highlight: String,
    pub avatar_url: String,
    #[serde(default, skip_serializing)]
    pub avatar_public_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub socials: Vec<Social>,
}

impl Profile {
    pub fn avatar(&self) -> Option<ImageRef> {
        if self.avatar_public_id.is_empty() {
            return None;
        }
        Some(ImageRef::new(&self.avatar_url, &self.avatar_public_id))
    }
}

/// Profile edit. Text fields replace the stored ones; the avatar is handled
/// separately as an upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub display_name: String,
    pub username: String,
    pub bio: String,
    pub highlight: String,
}
