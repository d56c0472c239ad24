use std::fmt::Display;

use serde::Serialize;

/// A request for one page of the listing API.
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Hash)]
pub struct PageRequest {
    /// The 1-based page number.
    page: u32,

    /// The number of packages to return per page.
    per_page: u16,
}

impl PageRequest {
    /// Creates a new `PageRequest` with the given page number and page size.
    pub fn new(page: u32, per_page: u16) -> Self {
        Self { page, per_page }
    }

    /// Retrieves the page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Retrieves the page size.
    pub fn per_page(&self) -> u16 {
        self.per_page
    }

    /// Creates a dummy `PageRequest` for testing purposes.
    #[cfg(test)]
    pub(crate) fn dummy() -> Self {
        Self {
            page: 1,
            per_page: 20,
        }
    }
}

impl Display for PageRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PageRequest: page={}, per_page={}",
            self.page, self.per_page
        )
    }
}
