//! Enumerations stored as snake_case strings in the remote tables.
//!
//! Each enum parses case-insensitively from its stored name or its display
//! label, so CLI arguments like `on_leave` and `On Leave` are both accepted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident => ($stored:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Name as stored in the data source.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $stored),+
                }
            }

            /// Human readable label.
            pub const fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| {
                        v.as_str().eq_ignore_ascii_case(normalized)
                            || v.label().eq_ignore_ascii_case(normalized)
                    })
                    .ok_or_else(|| ModelError::UnknownStatus {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

labelled_enum!(
    /// Employment status on the payroll roster.
    EmployeeStatus, "employee" {
        Active => ("active", "Active"),
        OnLeave => ("on_leave", "On Leave"),
        Inactive => ("inactive", "Inactive"),
        Terminated => ("terminated", "Terminated"),
    }
);

labelled_enum!(
    PayFrequency, "pay frequency" {
        Weekly => ("weekly", "Weekly"),
        Biweekly => ("biweekly", "Bi-weekly"),
        Semimonthly => ("semimonthly", "Semi-monthly"),
        Monthly => ("monthly", "Monthly"),
    }
);

labelled_enum!(
    /// What a user did, as recorded in the audit log.
    AuditAction, "audit action" {
        Create => ("create", "Create"),
        Update => ("update", "Update"),
        Delete => ("delete", "Delete"),
        Login => ("login", "Login"),
        Logout => ("logout", "Logout"),
        Export => ("export", "Export"),
        View => ("view", "View"),
    }
);

labelled_enum!(
    AuditSeverity, "audit severity" {
        Info => ("info", "Info"),
        Warning => ("warning", "Warning"),
        Critical => ("critical", "Critical"),
    }
);

labelled_enum!(
    /// Progress of a single compliance requirement for one employee.
    ComplianceStatus, "compliance" {
        Pending => ("pending", "Pending"),
        Completed => ("completed", "Completed"),
        Overdue => ("overdue", "Overdue"),
        Waived => ("waived", "Waived"),
    }
);
