use super::datatype::{CategoryId, PropertyId, TenantId, UnitId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EstateError>;

#[derive(Debug, Error)]
pub enum EstateError {
    #[error("property {0} not found")]
    PropertyNotFound(PropertyId),
    #[error("unit category {0} not found")]
    CategoryNotFound(CategoryId),
    #[error("unit {0} not found")]
    UnitNotFound(UnitId),
    #[error("tenant {0} not found")]
    TenantNotFound(TenantId),
    #[error("no landlord registered")]
    NoLandlord,

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("cannot delete a category that contains units, remove all units from the category first")]
    CategoryNotEmpty(CategoryId),
    #[error("unit {0} is occupied")]
    UnitOccupied(UnitId),
    #[error("tenant {tenant} is not assigned to unit {unit}")]
    TenantNotInUnit { unit: UnitId, tenant: TenantId },

    #[error("invalid billing month `{0}`, expected YYYY-MM")]
    BadMonth(String),
    #[error("invalid unit range: {0}")]
    BadRange(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EstateError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::PropertyNotFound(_)
                | Self::CategoryNotFound(_)
                | Self::UnitNotFound(_)
                | Self::TenantNotFound(_)
        )
    }

    /// Refused because the current state of the estate forbids it.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::CategoryNotEmpty(_) | Self::UnitOccupied(_) | Self::TenantNotInUnit { .. }
        )
    }
}
