use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// One listing item picked off a page: its code and thumbnail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub code: String,
    pub image_url: String,
}

impl Entry {
    /// Builds an entry from raw parts, returning `None` when either part is
    /// blank after trimming.
    pub fn new(code: &str, image_url: &str) -> Option<Self> {
        let code = code.trim();
        let image_url = image_url.trim();
        (!code.is_empty() && !image_url.is_empty()).then(|| Self {
            code: code.to_string(),
            image_url: image_url.to_string(),
        })
    }

    pub fn is_complete(&self) -> bool {
        !self.code.trim().is_empty() && !self.image_url.trim().is_empty()
    }
}

impl Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} — {}", self.code, self.image_url)
    }
}

/// What a single container element on a listing page turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingBlock {
    Entry(Entry),
    /// Carried the marker but lacked a code or a usable image.
    Incomplete { id: String },
    Unmarked,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListingPage {
    pub blocks: Vec<ListingBlock>,
    /// `None` when the page has no "Pages:" label. With a label but no
    /// numeric links this is `Some(0)`.
    pub last_page: Option<u32>,
}

impl ListingPage {
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.blocks.iter().filter_map(|b| match b {
            ListingBlock::Entry(entry) => Some(entry),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookMessage {
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Embed {
    pub color: u32,
    pub image: EmbedImage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedImage {
    pub url: String,
}

impl WebhookMessage {
    /// A message with a single image-only embed and no text body.
    pub fn image(url: &str, color: u32) -> Self {
        Self {
            embeds: vec![Embed {
                color,
                image: EmbedImage {
                    url: url.to_string(),
                },
            }],
        }
    }
}
