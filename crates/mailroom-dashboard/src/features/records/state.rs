//! List view state.
//!
//! # Design
//! - The view (page, size, filter) is replaced only together with the rows it produced.
//! - Pages are 1-based.

use crate::features::records::kind::{Paging, RecordStatus};

/// Requested page, page size, and status filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewState {
    /// 1-based page number.
    pub page: u32,
    /// Rows per page.
    pub page_size: u32,
    /// Optional status filter.
    pub filter: Option<RecordStatus>,
}

impl ViewState {
    /// First page, unfiltered.
    #[must_use]
    pub const fn first(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size,
            filter: None,
        }
    }
}

/// Rows currently held by a controller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListState<R> {
    records: Vec<R>,
    total: usize,
    view: ViewState,
    loaded: bool,
}

impl<R> ListState<R> {
    /// Empty state for `view`.
    #[must_use]
    pub const fn new(view: ViewState) -> Self {
        Self {
            records: Vec::new(),
            total: 0,
            view,
            loaded: false,
        }
    }

    /// Replace rows, count, and view in one step.
    pub fn replace(&mut self, records: Vec<R>, view: ViewState) {
        self.total = records.len();
        self.records = records;
        self.view = view;
        self.loaded = true;
    }

    /// Every retained row.
    #[must_use]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Mutable access to retained rows.
    pub fn records_mut(&mut self) -> &mut [R] {
        &mut self.records
    }

    /// Displayed count.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// View that produced the rows.
    #[must_use]
    pub const fn view(&self) -> ViewState {
        self.view
    }

    /// Whether any load has succeeded.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Rows on the current page.
    #[must_use]
    pub fn visible(&self, paging: Paging) -> &[R] {
        match paging {
            Paging::Server => &self.records,
            Paging::Local { .. } => {
                let size = self.view.page_size as usize;
                let start = (self.view.page.saturating_sub(1) as usize).saturating_mul(size);
                let start = start.min(self.records.len());
                let end = start.saturating_add(size).min(self.records.len());
                &self.records[start..end]
            }
        }
    }
}
