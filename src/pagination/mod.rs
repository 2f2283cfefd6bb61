//! Pagination module
//!
//! Supports: opaque continuation tokens with a caller-requested item count
//!
//! # Overview
//!
//! `PaginationState` is the pure state machine: it accumulates items and
//! decides whether another round is needed. `paginate` drives any
//! `PageSource` through it. Termination relies on the count, an empty page,
//! a missing token and the repeated-token guard; there is no round cap.

mod controller;
mod types;

pub use controller::{paginate, PageSource};
pub use types::{DoneReason, NextPage, Page, PaginationState};
