use crate::error::InvalidConfiguration;

/// "Load more" paging over a list that is recomputed on every read.
///
/// Page `n` shows the first `n * page_size` items. The page never goes down except
/// through [`Paginator::reset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    page: usize,
    page_size: usize,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub has_more: bool,
    pub remaining: usize,
}

impl Paginator {
    pub fn new(page_size: usize) -> Result<Self, InvalidConfiguration> {
        if page_size == 0 {
            return Err(InvalidConfiguration::ZeroPageSize);
        }

        Ok(Self { page: 1, page_size })
    }

    pub fn page(&self) -> usize {
        self.page
    }

    fn shown(&self) -> usize {
        self.page.saturating_mul(self.page_size)
    }

    pub fn current_slice<'a, T>(&self, full: &'a [T]) -> Page<'a, T> {
        let shown = self.shown().min(full.len());

        Page {
            items: &full[..shown],
            has_more: full.len() > shown,
            remaining: full.len() - shown,
        }
    }

    /// Moves to the next page. Does nothing once a list of `total` items is fully shown.
    pub fn advance(&mut self, total: usize) {
        if total > self.shown() {
            self.page += 1;
        }
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }
}
