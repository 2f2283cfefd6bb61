//! Pagination controller
//!
//! Drives a [`PageSource`] round by round until the state machine says the
//! run is over.

use super::types::{NextPage, Page, PaginationState};
use crate::error::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

/// Something that can fetch one page of a paginated listing
#[async_trait]
pub trait PageSource: Send {
    type Item: Send;

    /// Fetch the page after `token` (`None` for the first page), asking for
    /// `needed` more items
    async fn fetch_page(&mut self, token: Option<&str>, needed: usize)
        -> Result<Page<Self::Item>>;
}

/// Collect up to `target` items from `source`.
///
/// Rounds are strictly sequential, one fetch each. A target of zero makes
/// no fetch. Fetch errors abort the run; an early end (empty page, missing
/// or repeated token) returns what was collected.
pub async fn paginate<S: PageSource>(
    source: &mut S,
    target: usize,
) -> Result<PaginationState<S::Item>> {
    let mut state = PaginationState::new(target);
    if state.is_done() {
        return Ok(state);
    }

    let mut token: Option<String> = None;
    loop {
        let needed = state.needed();
        let page = source.fetch_page(token.as_deref(), needed).await?;
        debug!(
            "Round {}: {} items (token: {})",
            state.rounds + 1,
            page.items.len(),
            page.token.is_some()
        );

        match state.advance(page) {
            NextPage::Continue { token: next, .. } => token = Some(next),
            NextPage::Done(reason) => {
                if state.collected.len() < target {
                    warn!(
                        "Pagination ended early ({reason:?}): {}/{target} items after {} rounds",
                        state.collected.len(),
                        state.rounds
                    );
                }
                return Ok(state);
            }
        }
    }
}
