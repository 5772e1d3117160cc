use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::common::entities::app_errors::CoreError;

pub const DEFAULT_PER_PAGE: i64 = 25;
pub const MAX_PER_PAGE: i64 = 100;

fn default_per() -> i64 {
    DEFAULT_PER_PAGE
}

fn max_per() -> i64 {
    MAX_PER_PAGE
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PaginationConfig {
    #[serde(default = "default_per")]
    #[validate(range(min = 1, message = "default_per must be >= 1"))]
    pub default_per: i64,

    #[serde(default = "max_per")]
    #[validate(range(min = 1, message = "max_per must be >= 1"))]
    pub max_per: i64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_per: DEFAULT_PER_PAGE,
            max_per: MAX_PER_PAGE,
        }
    }
}

impl PaginationConfig {
    pub fn new(default_per: i64, max_per: i64) -> Result<Self, CoreError> {
        let config = Self {
            default_per,
            max_per,
        };
        config.check()?;
        Ok(config)
    }

    /// Field validation plus `default_per <= max_per`.
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()
            .map_err(|e| CoreError::InvalidPagination(e.to_string()))?;
        if self.default_per > self.max_per {
            return Err(CoreError::InvalidPagination(
                "default_per must not exceed max_per".to_string(),
            ));
        }
        Ok(())
    }
}

/// `page`/`per` as requested; both optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageParams {
    pub page: Option<i64>,
    pub per: Option<i64>,
}

impl PageParams {
    pub fn new(page: Option<i64>, per: Option<i64>) -> Self {
        Self { page, per }
    }

    /// Pages start at 1; `per` is kept within `1..=max_per`.
    pub fn to_offset_limit(&self, config: &PaginationConfig) -> OffsetLimit {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self
            .per
            .unwrap_or(config.default_per)
            .clamp(1, config.max_per.max(1));

        OffsetLimit::new(page.saturating_sub(1).saturating_mul(limit), limit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OffsetLimit {
    pub offset: i64,
    pub limit: i64,
}

impl Default for OffsetLimit {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_PER_PAGE,
        }
    }
}

impl OffsetLimit {
    pub fn new(offset: i64, limit: i64) -> Self {
        Self { offset, limit }
    }
}
