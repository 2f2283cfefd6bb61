//! Pagination types
//!
//! The state machine driven by the controller: one `advance` per fetched
//! page, yielding either the parameters of the next round or why the run
//! is over.

use std::collections::HashSet;

/// Why a pagination run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoneReason {
    /// `target_count` items were collected
    CountReached,
    /// A page yielded zero items
    Stalled,
    /// The source returned no continuation token
    Exhausted,
    /// The source returned a token already used in this run
    TokenRepeated,
}

/// Result of applying one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// Fetch another page with this token, asking for `needed` items
    Continue {
        /// Continuation token to send
        token: String,
        /// Items still missing
        needed: usize,
    },
    /// No more pages
    Done(DoneReason),
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue { .. })
    }
}

/// One fetched page: decoded items and the token for the next one
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub token: Option<String>,
}

impl<T> Page<T> {
    /// Create a page
    pub fn new(items: Vec<T>, token: Option<String>) -> Self {
        Self { items, token }
    }

    /// Page without items or token
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            token: None,
        }
    }
}

/// Tracks one pagination run
#[derive(Debug, Clone)]
pub struct PaginationState<T> {
    /// Items gathered so far, in page order
    pub collected: Vec<T>,
    /// Number of items the caller asked for
    pub target_count: usize,
    /// Token returned by the latest page
    pub token: Option<String>,
    /// The source has nothing more to give
    pub exhausted: bool,
    /// Pages applied so far
    pub rounds: usize,
    seen_tokens: HashSet<String>,
    done: Option<DoneReason>,
}

impl<T> PaginationState<T> {
    /// Create a new pagination state
    pub fn new(target_count: usize) -> Self {
        Self {
            collected: Vec::new(),
            target_count,
            token: None,
            exhausted: false,
            rounds: 0,
            seen_tokens: HashSet::new(),
            done: (target_count == 0).then_some(DoneReason::CountReached),
        }
    }

    /// Items still missing
    pub fn needed(&self) -> usize {
        self.target_count.saturating_sub(self.collected.len())
    }

    /// Why the run ended, if it has
    pub fn done_reason(&self) -> Option<DoneReason> {
        self.done
    }

    /// Check if the run has ended
    pub fn is_done(&self) -> bool {
        self.done.is_some()
    }

    /// Apply one fetched page and decide the next step
    pub fn advance(&mut self, page: Page<T>) -> NextPage {
        self.rounds += 1;
        let received = page.items.len();
        self.collected.extend(page.items);
        self.token = page.token;

        let next = if self.collected.len() >= self.target_count {
            self.collected.truncate(self.target_count);
            NextPage::Done(DoneReason::CountReached)
        } else if received == 0 {
            NextPage::Done(DoneReason::Stalled)
        } else {
            match &self.token {
                None => NextPage::Done(DoneReason::Exhausted),
                Some(token) if !self.seen_tokens.insert(token.clone()) => {
                    NextPage::Done(DoneReason::TokenRepeated)
                }
                Some(token) => NextPage::Continue {
                    token: token.clone(),
                    needed: self.needed(),
                },
            }
        };

        if let NextPage::Done(reason) = next {
            self.done = Some(reason);
            self.exhausted = self.token.is_none()
                || matches!(reason, DoneReason::Stalled | DoneReason::TokenRepeated);
        }
        next
    }

    /// Collected items
    pub fn into_items(self) -> Vec<T> {
        self.collected
    }
}
