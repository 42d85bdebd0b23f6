//! External collaborators of roster list screens.
//!
//! Three capabilities are defined as traits, each with an in-memory backend
//! for tests and a file-backed backend for local use:
//!
//! - [`DataSource`] - tenant-partitioned tables of JSON rows
//!   ([`MemorySource`], [`JsonDirSource`])
//! - [`ObjectStorage`] - file uploads ([`MemoryStorage`], [`DirStorage`])
//! - [`Mailer`] - outbound email ([`MemoryMailer`], [`OutboxMailer`])
//!
//! Every call takes an explicit [`TenantScope`] taken from the [`Session`].

pub mod error;
pub mod json_dir;
pub mod mail;
pub mod memory;
pub mod session;
pub mod source;
pub mod storage;
pub mod upload;

pub use error::{Result, SourceError, ValidationError};
pub use json_dir::JsonDirSource;
pub use mail::{EmailPayload, Mailer, MemoryMailer, MessageId, OutboxMailer};
pub use memory::{InjectedFailure, MemorySource};
pub use session::{Session, TenantScope};
pub use source::{
    DataSource, OrderBy, delete_record, fetch_records, insert_record, update_record,
};
pub use storage::{DirStorage, MemoryStorage, ObjectStorage, StoredObject};
pub use upload::{FileUpload, UploadField, UploadPolicy, upload_checked};
