use std::{collections::VecDeque, sync::Arc};

use rand::{seq::SliceRandom, Rng};
use tracing::trace;

use crate::catalog::{Catalog, VideoRecord};

/// Hands out random videos without repeating any until every video has been shown once.
///
/// The pool holds catalog positions in shuffled order and is consumed from the front.
/// Once empty it is refilled with a new permutation of the whole catalog, so a request
/// larger than what is left may repeat videos delivered earlier.
#[derive(Debug)]
pub struct RandomSampler<R> {
    catalog: Arc<Catalog>,
    pool: VecDeque<usize>,
    rng: R,
}

impl<R: Rng> RandomSampler<R> {
    pub fn new(catalog: Arc<Catalog>, rng: R) -> Self {
        let mut sampler = Self {
            catalog,
            pool: VecDeque::new(),
            rng,
        };
        sampler.refill();

        sampler
    }

    /// Number of videos left before the next reshuffle.
    pub fn remaining(&self) -> usize {
        self.pool.len()
    }

    /// Draws `count` videos, dropping `exclude` whenever it comes up.
    pub fn draw(&mut self, count: usize, exclude: Option<&str>) -> Vec<Arc<VideoRecord>> {
        // Without a single eligible video the refill below would spin forever.
        let excluded_present = exclude.is_some_and(|id| self.catalog.find(id).is_some());
        let eligible = self.catalog.len() - usize::from(excluded_present);
        if eligible == 0 {
            return vec![];
        }

        let mut results = Vec::with_capacity(count);

        while results.len() < count {
            if self.pool.is_empty() {
                trace!(drawn = results.len(), count, "Random pool exhausted, reshuffling");
                self.refill();
            }

            let Some(position) = self.pool.pop_front() else {
                break;
            };

            if let Some(record) = self.catalog.get(position) {
                if exclude != Some(record.id.as_str()) {
                    results.push(record.clone());
                }
            }
        }

        results
    }

    fn refill(&mut self) {
        let mut positions: Vec<usize> = (0..self.catalog.len()).collect();
        positions.shuffle(&mut self.rng);
        self.pool = positions.into();
    }
}
