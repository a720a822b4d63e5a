//! Session and engine configuration.

use crate::error::RouteError;

/// Identifies the order being edited. Supplied explicitly at session
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    company_key: String,
    order_id: u64,
}

impl SessionConfig {
    pub fn new(company_key: impl Into<String>, order_id: u64) -> Result<Self, RouteError> {
        let company_key = company_key.into().trim().to_string();
        if company_key.is_empty() {
            return Err(RouteError::Configuration("company key is empty".to_string()));
        }
        if order_id == 0 {
            return Err(RouteError::Configuration("order id must be positive".to_string()));
        }

        Ok(Self {
            company_key,
            order_id,
        })
    }

    pub fn company_key(&self) -> &str {
        &self.company_key
    }

    pub fn order_id(&self) -> u64 {
        self.order_id
    }
}

/// When a single-step move resolves its new segments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommitMode {
    /// Moves only change the sequence; the caller commits explicitly.
    #[default]
    Explicit,
    /// Every accepted `move_point` commits right away.
    Immediate,
}

#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    pub commit_mode: CommitMode,
    /// Simplify resolved geometry with this tolerance (degrees) before
    /// storing it. `None` keeps the provider's geometry as is.
    pub simplify_tolerance: Option<f64>,
}
