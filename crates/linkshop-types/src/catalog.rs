//! Category and social link types

use serde::{Deserialize, Serialize};

/// Product category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Social network link shown on the profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Social {
    pub id: i64,
    pub name: String,
    pub url: String,
    /// Filename under the static icon directory
    pub icon: String,
    /// Display order, ascending
    pub ord: i32,
}

/// Social link creation request
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewSocial {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub ord: i32,
}

/// Partial social link update
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SocialUpdate {
    pub name: Option<String>,
    pub url: Option<String>,
    pub icon: Option<String>,
    pub ord: Option<i32>,
}

impl SocialUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.url.is_none() && self.icon.is_none() && self.ord.is_none()
    }

    pub fn apply_to(&self, social: &mut Social) {
        if let Some(name) = &self.name {
            social.name = name.clone();
        }
        if let Some(url) = &self.url {
            social.url = url.clone();
        }
        if let Some(icon) = &self.icon {
            social.icon = icon.clone();
        }
        if let Some(ord) = self.ord {
            social.ord = ord;
        }
    }
}
