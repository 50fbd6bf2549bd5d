//! Tag / external link rule shared by product create and update

use crate::{Result, ShopError, Tag};

/// Decide the external link a product ends up with.
///
/// `shopee` products keep the requested link, or the stored one when the
/// request leaves it blank; having neither is a validation error. Every other
/// tag clears the link.
pub fn resolve_external_url(
    tag: Tag,
    requested: Option<&str>,
    stored: Option<&str>,
) -> Result<String> {
    match tag {
        Tag::MyChoice => Ok(String::new()),
        Tag::Shopee => {
            let pick = |value: Option<&str>| {
                value
                    .map(str::trim)
                    .filter(|url| !url.is_empty())
                    .map(str::to_string)
            };
            pick(requested).or_else(|| pick(stored)).ok_or_else(|| {
                ShopError::validation("external_url is required for shopee products")
            })
        }
    }
}
