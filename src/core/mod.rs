pub mod audit;
pub mod axioms;
pub mod crypto;
pub mod deontic;
pub mod ethics;
pub mod identity;
pub mod kernel;
pub mod oracle;
pub mod partition;
pub mod proof;
pub mod resolver;

pub use crate::domain::model::{AuditRecord, AuditReport, AuditRequest};
pub use crate::domain::ports::{AuditPipeline, ConfigProvider, Storage};
pub use crate::utils::error::Result;
