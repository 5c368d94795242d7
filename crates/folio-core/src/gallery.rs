use std::time::Duration;

use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

pub const FLICKR_BASE_URL: &str = "https://www.flickr.com";
pub const FLICKR_ALBUM_ID: &str = "72157633423617771";
pub const FLICKR_NSID: &str = "92316068@N00";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub title: String,
    pub link: String,
    pub image_url: String,
    pub date_taken: String,
}

impl Photo {
    /// Flickr feeds list the small rendition; swap in the large one
    pub fn high_res_url(&self) -> String {
        if self.image_url.contains("staticflickr.com") {
            self.image_url.replace("_m.jpg", "_b.jpg")
        } else {
            self.image_url.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GallerySource {
    Flickr,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct Gallery {
    pub photos: Vec<Photo>,
    pub source: GallerySource,
}

impl Gallery {
    pub fn fallback() -> Self {
        let photo = |title: &str, path: &str| Photo {
            title: title.to_string(),
            link: "#".to_string(),
            image_url: format!(
                "https://images.weserv.nl/?url=http://www.ryandumlao.com/img/{}&w=800&q=80",
                path
            ),
            date_taken: String::new(),
        };

        Self {
            photos: vec![
                photo("Portfolio Profile", "profile.jpg"),
                photo("Travel & Contact", "contact.jpg"),
                photo("Pokémon Abode Legacy", "portfolio/pa.jpg"),
                photo("Engineering Research", "portfolio/gaas.jpg"),
            ],
            source: GallerySource::Fallback,
        }
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Lightbox navigation wraps around both ends
    pub fn next_index(&self, current: usize) -> usize {
        if self.photos.is_empty() {
            return 0;
        }
        (current + 1) % self.photos.len()
    }

    pub fn prev_index(&self, current: usize) -> usize {
        if self.photos.is_empty() {
            return 0;
        }
        (current + self.photos.len() - 1) % self.photos.len()
    }
}

#[derive(Deserialize)]
struct FeedMedia {
    m: String,
}

#[derive(Deserialize)]
struct FeedItem {
    title: String,
    link: String,
    media: FeedMedia,
    #[serde(default)]
    date_taken: String,
}

#[derive(Deserialize)]
struct Feed {
    #[serde(default)]
    items: Vec<FeedItem>,
}

/// Fetch the album, falling back to the fixed list on any failure
pub async fn load_album(base_url: &str) -> Gallery {
    match fetch_album(base_url).await {
        Ok(photos) if !photos.is_empty() => {
            info!(count = photos.len(), "loaded flickr album");
            Gallery { photos, source: GallerySource::Flickr }
        }
        Ok(_) => {
            warn!("flickr album is empty, using fallback photos");
            Gallery::fallback()
        }
        Err(e) => {
            warn!(error = %e, "flickr album unavailable, using fallback photos");
            Gallery::fallback()
        }
    }
}

async fn fetch_album(base_url: &str) -> Result<Vec<Photo>> {
    let url = format!(
        "{}/services/feeds/photoset.gne?set={}&nsid={}&lang=en-us&format=json&nojsoncallback=1",
        base_url.trim_end_matches('/'),
        FLICKR_ALBUM_ID,
        FLICKR_NSID
    );

    let response = Client::new()
        .get(&url)
        .timeout(Duration::from_secs(10))
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(anyhow!("Flickr feed failed with status: {}", response.status()));
    }

    // The feed escapes apostrophes as \' which is not valid JSON
    let body = response.text().await?.replace("\\'", "'");
    let feed: Feed = serde_json::from_str(&body)?;

    Ok(feed
        .items
        .into_iter()
        .map(|item| Photo {
            title: item.title,
            link: item.link,
            image_url: item.media.m,
            date_taken: item.date_taken,
        })
        .collect())
}
