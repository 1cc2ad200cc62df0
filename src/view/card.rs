use chrono::NaiveDate;
use serde::Serialize;

use super::format::{fire_rating_tier, format_view_count, relative_age_of};
use crate::catalog::VideoRecord;

/// What a grid cell shows for one video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub url: String,
    pub thumbnail: String,
    /// Images cycled through on hover. Empty unless the video has more than one.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub slideshow: Vec<String>,
    pub favorite: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fire: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
}

/// Whether the card shows view count and popularity. Recents show neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meta {
    Views(u64),
    Hidden,
}

impl Card {
    pub fn new(
        record: &VideoRecord,
        thumbnail: String,
        favorite: bool,
        meta: Meta,
        slideshow_max: usize,
        today: NaiveDate,
    ) -> Self {
        let slideshow = if record.images.len() > 1 {
            record.images.iter().take(slideshow_max).cloned().collect()
        } else {
            vec![]
        };

        let (views, fire) = match meta {
            Meta::Views(views) => (
                Some(format_view_count(views)),
                Some(fire_rating_tier(views).to_string()),
            ),
            Meta::Hidden => (None, None),
        };

        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            url: record.url.clone(),
            thumbnail,
            slideshow,
            favorite,
            views,
            fire,
            age: record
                .date
                .as_deref()
                .and_then(|date| relative_age_of(date, today)),
        }
    }
}
