//! Paginated sources
//!
//! Search and reviews are the two listings that span several requests.
//! Each source turns one pagination round into one marketplace request.

use super::Scraper;
use crate::error::Result;
use crate::format::{format_all, FormatContext, Record};
use crate::pagination::{Page, PageSource};
use crate::request::{search_request, Operation};
use crate::schema::tables;
use crate::types::{EntityKind, Locale, SortOrder};
use async_trait::async_trait;

/// Search results: an HTML first page, then batch-execute continuations
pub(crate) struct SearchPages<'a> {
    pub(crate) scraper: &'a Scraper,
    pub(crate) query: String,
    pub(crate) locale: Locale,
    pub(crate) ctx: FormatContext,
}

#[async_trait]
impl PageSource for SearchPages<'_> {
    type Item = Record;

    async fn fetch_page(&mut self, token: Option<&str>, needed: usize) -> Result<Page<Record>> {
        let (op, layout) = match token {
            None => (
                search_request(Some(&self.query), None, None)?,
                &tables::SEARCH_PAGE,
            ),
            Some(token) => (
                search_request(None, Some(token), Some(needed))?,
                &tables::SEARCH_CONTINUATION,
            ),
        };

        // Continuations keep whatever locale the first page settled on
        let (page, locale) = self.scraper.fetch_page(&op, &self.locale, layout).await?;
        self.locale = locale;

        let items = format_all(EntityKind::SearchResult, &page.items, &self.ctx);
        Ok(Page::new(items, page.token))
    }
}

/// Review batches of at most `batch_size` each
pub(crate) struct ReviewPages<'a> {
    pub(crate) scraper: &'a Scraper,
    pub(crate) app_id: String,
    pub(crate) sort: SortOrder,
    pub(crate) locale: Locale,
    pub(crate) batch_size: usize,
    pub(crate) ctx: FormatContext,
}

#[async_trait]
impl PageSource for ReviewPages<'_> {
    type Item = Record;

    async fn fetch_page(&mut self, token: Option<&str>, needed: usize) -> Result<Page<Record>> {
        let op = Operation::Reviews {
            app_id: self.app_id.clone(),
            sort: self.sort,
            count: needed.min(self.batch_size),
            token: token.map(str::to_string),
        };

        let (page, _) = self.scraper.fetch_page(&op, &self.locale, &tables::REVIEWS).await?;
        let items = format_all(EntityKind::Review, &page.items, &self.ctx);
        Ok(Page::new(items, page.token))
    }
}
