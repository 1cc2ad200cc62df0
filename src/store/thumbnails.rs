use std::{collections::HashMap, sync::Arc};

use rand::{seq::IndexedRandom, Rng};
use tracing::warn;

use super::KeyValueStore;
use crate::{catalog::VideoRecord, error::StoreError};

pub const THUMBNAIL_KEY: &str = "videoImageMap";

/// Random image from `images`, or the fallback `thumbnail` when there are none.
pub fn pick_thumbnail<'a, R: Rng + ?Sized>(record: &'a VideoRecord, rng: &mut R) -> &'a str {
    record
        .images
        .choose(rng)
        .map(String::as_str)
        .unwrap_or(&record.thumbnail)
}

/// Remembers which thumbnail each video url got, so a card keeps its image across views.
#[derive(Debug)]
pub struct ThumbnailChoices<S> {
    store: Arc<S>,
}

impl<S: KeyValueStore> ThumbnailChoices<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    fn choices(&self) -> Result<HashMap<String, String>, StoreError> {
        let Some(raw) = self.store.get(THUMBNAIL_KEY)? else {
            return Ok(HashMap::new());
        };

        Ok(serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Ignoring unreadable thumbnail choices: {e}");
            HashMap::new()
        }))
    }

    /// Thumbnail for each of `records`, in order. Videos without a remembered choice get a
    /// random pick, and new picks are stored with a single write.
    pub fn choose_all<R: Rng + ?Sized>(
        &self,
        records: &[Arc<VideoRecord>],
        rng: &mut R,
    ) -> Result<Vec<String>, StoreError> {
        let mut choices = self.choices()?;
        let mut picked_new = false;

        let chosen = records
            .iter()
            .map(|record| {
                choices
                    .entry(record.url.clone())
                    .or_insert_with(|| {
                        picked_new = true;
                        pick_thumbnail(record, rng).to_owned()
                    })
                    .clone()
            })
            .collect();

        if picked_new {
            self.store
                .set(THUMBNAIL_KEY, &serde_json::to_string(&choices)?)?;
        }

        Ok(chosen)
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::store::MemoryStore;

    fn record(images: &[&str]) -> VideoRecord {
        VideoRecord {
            id: "clip".into(),
            title: "Clip".into(),
            url: "videos/clip.html".into(),
            images: images.iter().map(|image| image.to_string()).collect(),
            thumbnail: "thumbs/clip.jpg".into(),
            tags: vec![],
            description: None,
            date: None,
            embed: None,
            views: None,
        }
    }

    #[test]
    fn test_pick_falls_back_to_thumbnail() {
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(pick_thumbnail(&record(&[]), &mut rng), "thumbs/clip.jpg");
    }

    #[test]
    fn test_pick_uses_one_of_the_images() {
        let record = record(&["1.jpg", "2.jpg", "3.jpg"]);
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..20 {
            let picked = pick_thumbnail(&record, &mut rng);
            assert!(record.images.iter().any(|image| image == picked));
        }
    }

    #[test]
    fn test_choice_is_remembered() {
        let store = Arc::new(MemoryStore::default());
        let records = [Arc::new(record(&["1.jpg", "2.jpg", "3.jpg", "4.jpg"]))];
        let first = ThumbnailChoices::new(store.clone())
            .choose_all(&records, &mut StdRng::seed_from_u64(1))
            .unwrap();

        for seed in 2..20 {
            let again = ThumbnailChoices::new(store.clone())
                .choose_all(&records, &mut StdRng::seed_from_u64(seed))
                .unwrap();
            assert_eq!(again, first);
        }
    }

    #[test]
    fn test_choose_all_keeps_order_and_stores_every_pick() {
        let store = Arc::new(MemoryStore::default());
        let mut other = record(&[]);
        other.url = "videos/other.html".into();
        other.thumbnail = "thumbs/other.jpg".into();
        let records = [Arc::new(record(&["1.jpg"])), Arc::new(other)];

        let chosen = ThumbnailChoices::new(store.clone())
            .choose_all(&records, &mut StdRng::seed_from_u64(3))
            .unwrap();

        assert_eq!(chosen, vec!["1.jpg", "thumbs/other.jpg"]);
        let stored: HashMap<String, String> =
            serde_json::from_str(&store.get(THUMBNAIL_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored["videos/clip.html"], "1.jpg");
    }
}
