use serde::Serialize;

use crate::errors::internal::ValidationError;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 1000;

/// Validated `page` / `pageSize` query parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: u64,
    pub page_size: u64,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageParams {
    pub fn parse(page: Option<&str>, page_size: Option<&str>) -> Result<Self, ValidationError> {
        let params = Self {
            page: parse_positive("page", page, DEFAULT_PAGE)?,
            page_size: parse_positive("pageSize", page_size, DEFAULT_PAGE_SIZE)?,
        };

        if params.page_size > MAX_PAGE_SIZE {
            return Err(ValidationError::new(
                "pageSize",
                format!("pageSize query parameter must not exceed {}", MAX_PAGE_SIZE),
            ));
        }
        if params.offset().is_none() {
            return Err(ValidationError::new("page", "page query parameter is out of range"));
        }

        Ok(params)
    }

    /// Rows skipped before this page; `None` when the database cannot bind it
    pub fn offset(&self) -> Option<u64> {
        (self.page - 1)
            .checked_mul(self.page_size)
            .filter(|offset| i64::try_from(*offset).is_ok())
    }

    pub fn meta(&self, total: u64) -> Meta {
        Meta {
            total,
            pages: total.div_ceil(self.page_size),
            page: self.page,
            page_size: self.page_size,
        }
    }
}

fn parse_positive(name: &str, raw: Option<&str>, default: u64) -> Result<u64, ValidationError> {
    let Some(raw) = raw else {
        return Ok(default);
    };

    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::new(name, format!("{} query parameter must be an integer", name)))?;

    if value < 1 {
        return Err(ValidationError::new(
            name,
            format!("{} query parameter must be a positive integer", name),
        ));
    }

    Ok(value as u64)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub total: u64,
    pub pages: u64,
    pub page: u64,
    pub page_size: u64,
}

/// Body of every paginated list response
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: Meta,
}
