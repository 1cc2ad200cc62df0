use std::{collections::HashMap, path::Path, sync::Arc};

use tracing::{debug, info, instrument};

use crate::{error::CatalogError, util};

pub use self::record::VideoRecord;

pub mod record;

/// Every video of the site, in stored order.
///
/// Stored order is the recency order: the last entry is the newest one. Nothing re-sorts
/// by `date`, so whoever writes `videodata.json` must append new videos at the end.
#[derive(Debug, Default)]
pub struct Catalog {
    records: Vec<Arc<VideoRecord>>,
    positions: HashMap<String, usize>,
}

impl Catalog {
    /// Derives ids and checks the records. Ids must come out unique.
    pub fn new(records: Vec<VideoRecord>) -> Result<Self, CatalogError> {
        let mut positions = HashMap::with_capacity(records.len());
        let mut checked = Vec::with_capacity(records.len());

        for (index, mut record) in records.into_iter().enumerate() {
            if record.title.trim().is_empty() {
                return Err(CatalogError::InvalidRecord {
                    index,
                    reason: "empty title",
                });
            }

            record.id = record::derive_id(&record.url)
                .ok_or(CatalogError::InvalidRecord {
                    index,
                    reason: "url has no file name",
                })?
                .to_owned();

            if positions.insert(record.id.clone(), index).is_some() {
                return Err(CatalogError::DuplicateId(record.id));
            }

            checked.push(Arc::new(record));
        }

        Ok(Self {
            records: checked,
            positions,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let records: Vec<VideoRecord> = serde_json::from_str(text)?;
        Self::new(records)
    }

    /// Loads the catalog from a file path or an http(s) URL.
    #[instrument]
    pub async fn load(source: &str) -> Result<Self, CatalogError> {
        let text = match util::remote_url(source) {
            Some(url) => {
                info!("Fetch catalog...");
                util::fetch_text(url)
                    .await
                    .map_err(|source_error| CatalogError::Fetch {
                        url: source.to_owned(),
                        source: source_error,
                    })?
            }
            None => {
                info!("Read catalog...");
                tokio::fs::read_to_string(source)
                    .await
                    .map_err(|source_error| CatalogError::Read {
                        path: Path::new(source).to_path_buf(),
                        source: source_error,
                    })?
            }
        };

        let catalog = Self::from_json(&text)?;
        info!("Loaded {} videos", catalog.len());

        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Arc<VideoRecord>] {
        &self.records
    }

    pub fn get(&self, position: usize) -> Option<&Arc<VideoRecord>> {
        self.records.get(position)
    }

    pub fn find(&self, id: &str) -> Option<&Arc<VideoRecord>> {
        self.positions
            .get(id)
            .and_then(|&position| self.records.get(position))
    }

    /// The last `count` records, newest first.
    pub fn recent(&self, count: usize) -> Vec<Arc<VideoRecord>> {
        self.records.iter().rev().take(count).cloned().collect()
    }

    /// Case-insensitive substring search over title, tags and description, in catalog order.
    ///
    /// Surrounding whitespace is part of the query.
    pub fn search(&self, query: &str) -> Vec<Arc<VideoRecord>> {
        if query.trim().is_empty() {
            return vec![];
        }

        let lower_query = query.to_lowercase();
        let results: Vec<_> = self
            .records
            .iter()
            .filter(|record| record.matches(&lower_query))
            .cloned()
            .collect();
        debug!(query, hits = results.len(), "Searched catalog");

        results
    }
}
