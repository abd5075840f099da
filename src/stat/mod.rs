pub mod bulk;
pub mod dashboard;
pub mod datatype;
pub mod error;
pub mod ledger;
pub mod month;
pub mod report;
pub mod sample_data;
pub mod snapshot;

pub use bulk::{ImportValidation, parse_tenant_import, unit_number_range};
pub use dashboard::{DashboardStats, PropertyStats, PropertySummary, TrendPoint, occupancy_rate};
pub use datatype::*;
pub use error::{EstateError, Result};
pub use ledger::{BulkOutcome, Estate, MonthPayments, PaymentHistory};
pub use month::{BillingMonth, expand_month_range, months_between_inclusive};
pub use report::{ArrearsItem, PropertyScope, RentRollItem, ReportWindow, VacancyItem};
pub use snapshot::{load_estate_json, save_estate_json};
