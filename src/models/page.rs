use serde::{Deserialize, Serialize};

use crate::utils::error::{AppError, AppResult};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 1000;

/// `?page=&size=` query parameters. Pages are zero based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub size: u32,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageParams {
    pub fn new(page: u32, size: u32) -> AppResult<Self> {
        Self { page, size }.normalized()
    }

    /// Rejects an empty page size and clamps oversized ones to
    /// [`MAX_PAGE_SIZE`]; the clamped size is what the page reports.
    pub fn normalized(self) -> AppResult<Self> {
        if self.size == 0 {
            return Err(AppError::validation("Page size must be at least 1"));
        }
        Ok(Self {
            page: self.page,
            size: self.size.min(MAX_PAGE_SIZE),
        })
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

/// One page of results plus the metadata needed to walk the rest.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    #[serde(rename = "number")]
    pub page_number: u32,
    #[serde(rename = "size")]
    pub page_size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
    pub number_of_elements: usize,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, params: PageParams, total_elements: u64) -> Self {
        let size = u64::from(params.size.max(1));
        let total_pages = total_elements.div_ceil(size);
        let number_of_elements = content.len();

        Self {
            empty: content.is_empty(),
            content,
            page_number: params.page,
            page_size: params.size,
            total_elements,
            total_pages,
            number_of_elements,
            first: params.page == 0,
            last: u64::from(params.page) + 1 >= total_pages,
        }
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page_number: self.page_number,
            page_size: self.page_size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            number_of_elements: self.number_of_elements,
            first: self.first,
            last: self.last,
            empty: self.empty,
        }
    }
}
