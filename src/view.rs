use std::{collections::HashMap, sync::Arc};

use chrono::NaiveDate;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, instrument};

use self::{
    card::{Card, Meta},
    pagination::Paginator,
    sampler::RandomSampler,
};
use crate::{
    catalog::{Catalog, VideoRecord},
    error::{InvalidConfiguration, StoreError},
    store::{
        favorites::FavoriteChange, thumbnails::pick_thumbnail, FavoritesSet, KeyValueStore,
        ThumbnailChoices,
    },
};

pub mod card;
pub mod format;
pub mod pagination;
pub mod sampler;

/// Range of the made-up view counts given to videos without a `views` field.
pub const PLACEHOLDER_VIEWS: std::ops::Range<u64> = 5_000..55_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    pub random_count: usize,
    pub recents_page_size: usize,
    pub favorites_page_size: usize,
    pub slideshow_max: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            random_count: 16,
            recents_page_size: 4,
            favorites_page_size: 8,
            slideshow_max: 4,
        }
    }
}

/// Search results keep the thumbnail they were first shown with, other blocks pick anew.
#[derive(Debug, Clone, Copy)]
enum Thumbnails {
    Remembered,
    Fresh,
}

/// One incrementally loaded list, ready to print.
#[derive(Debug, Serialize)]
pub struct Section {
    pub cards: Vec<Card>,
    pub has_more: bool,
    pub remaining: usize,
    pub page: usize,
}

/// State of one page view: the random pool, both "load more" cursors, and the
/// persisted favorites and thumbnail choices.
///
/// Build one per page view and drop it afterwards. Nothing is shared between instances
/// except what lives in the store.
#[derive(Debug)]
pub struct PageView<S, R> {
    catalog: Arc<Catalog>,
    config: ViewConfig,
    sampler: RandomSampler<R>,
    recents: Paginator,
    favorites_pager: Paginator,
    favorites: FavoritesSet<S>,
    thumbnails: ThumbnailChoices<S>,
    rng: R,
    placeholder_views: HashMap<String, u64>,
    today: NaiveDate,
}

impl<S, R> PageView<S, R>
where
    S: KeyValueStore,
    R: Rng + SeedableRng,
{
    pub fn new(
        catalog: Arc<Catalog>,
        store: Arc<S>,
        config: ViewConfig,
        mut rng: R,
        today: NaiveDate,
    ) -> Result<Self, InvalidConfiguration> {
        let recents = Paginator::new(config.recents_page_size)?;
        let favorites_pager = Paginator::new(config.favorites_page_size)?;
        let sampler = RandomSampler::new(catalog.clone(), R::from_rng(&mut rng));

        Ok(Self {
            catalog,
            config,
            sampler,
            recents,
            favorites_pager,
            favorites: FavoritesSet::new(store.clone()),
            thumbnails: ThumbnailChoices::new(store),
            rng,
            placeholder_views: HashMap::new(),
            today,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The random block, `random_count` videos not shown yet in this page view.
    pub fn random_block(&mut self, exclude: Option<&str>) -> Result<Vec<Card>, StoreError> {
        self.random(self.config.random_count, exclude)
    }

    #[instrument(skip(self))]
    pub fn random(
        &mut self,
        count: usize,
        exclude: Option<&str>,
    ) -> Result<Vec<Card>, StoreError> {
        let records = self.sampler.draw(count, exclude);
        debug!(drawn = records.len(), left_in_pool = self.sampler.remaining());

        self.cards(&records, true, Thumbnails::Fresh)
    }

    pub fn recents(&mut self) -> Result<Section, StoreError> {
        let full = self.catalog.recent(self.catalog.len());
        let page = self.recents.current_slice(&full);
        let (has_more, remaining) = (page.has_more, page.remaining);
        let cards = self.cards(page.items, false, Thumbnails::Fresh)?;

        Ok(Section {
            cards,
            has_more,
            remaining,
            page: self.recents.page(),
        })
    }

    pub fn load_more_recents(&mut self) {
        self.recents.advance(self.catalog.len());
    }

    /// Navigating to the favorites page starts again from its first page.
    pub fn open_favorites(&mut self) {
        self.favorites_pager.reset();
    }

    pub fn favorites(&mut self) -> Result<Section, StoreError> {
        let full = self.favorite_records()?;
        let page = self.favorites_pager.current_slice(&full);
        let (has_more, remaining) = (page.has_more, page.remaining);
        let cards = self.cards(page.items, true, Thumbnails::Fresh)?;

        Ok(Section {
            cards,
            has_more,
            remaining,
            page: self.favorites_pager.page(),
        })
    }

    pub fn load_more_favorites(&mut self) -> Result<(), StoreError> {
        let total = self.favorite_records()?.len();
        self.favorites_pager.advance(total);

        Ok(())
    }

    pub fn toggle_favorite(&mut self, id: &str) -> Result<bool, StoreError> {
        self.favorites.toggle(id)
    }

    pub fn is_favorite(&self, id: &str) -> Result<bool, StoreError> {
        self.favorites.contains(id)
    }

    pub fn subscribe_favorites(&self) -> broadcast::Receiver<FavoriteChange> {
        self.favorites.subscribe()
    }

    pub fn search(&mut self, query: &str) -> Result<Vec<Card>, StoreError> {
        let records = self.catalog.search(query);
        self.cards(&records, true, Thumbnails::Remembered)
    }

    /// Stored favorite ids that still exist in the catalog, newest first.
    fn favorite_records(&self) -> Result<Vec<Arc<VideoRecord>>, StoreError> {
        Ok(self
            .favorites
            .ids()?
            .iter()
            .filter_map(|id| self.catalog.find(id).cloned())
            .collect())
    }

    fn cards(
        &mut self,
        records: &[Arc<VideoRecord>],
        show_views: bool,
        thumbnails: Thumbnails,
    ) -> Result<Vec<Card>, StoreError> {
        let favorites = self.favorites.ids()?;
        let thumbnails = match thumbnails {
            Thumbnails::Remembered => self.thumbnails.choose_all(records, &mut self.rng)?,
            Thumbnails::Fresh => records
                .iter()
                .map(|record| pick_thumbnail(record, &mut self.rng).to_owned())
                .collect(),
        };

        Ok(records
            .iter()
            .zip(thumbnails)
            .map(|(record, thumbnail)| {
                let meta = if show_views {
                    Meta::Views(self.views_of(record))
                } else {
                    Meta::Hidden
                };

                Card::new(
                    record,
                    thumbnail,
                    favorites.contains(&record.id),
                    meta,
                    self.config.slideshow_max,
                    self.today,
                )
            })
            .collect())
    }

    fn views_of(&mut self, record: &VideoRecord) -> u64 {
        if let Some(views) = record.views {
            return views;
        }

        let rng = &mut self.rng;
        *self
            .placeholder_views
            .entry(record.id.clone())
            .or_insert_with(|| rng.random_range(PLACEHOLDER_VIEWS))
    }
}
