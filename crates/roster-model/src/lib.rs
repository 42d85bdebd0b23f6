pub mod audit;
pub mod compliance;
pub mod employee;
pub mod enums;
pub mod error;
pub mod filter;
pub mod ids;
pub mod item;
pub mod selection;

pub use audit::AuditLogEntry;
pub use compliance::ComplianceItem;
pub use employee::{Employee, PayGroup};
pub use enums::{AuditAction, AuditSeverity, ComplianceStatus, EmployeeStatus, PayFrequency};
pub use error::{ModelError, Result};
pub use filter::{PageSize, SortDirection, SortSpec, StatusFilter};
pub use ids::{ItemId, TenantId, UserId};
pub use item::{CollectionItem, Record, SortValue};
pub use selection::SelectionSet;
