pub mod activity;
pub mod column_mapper;
pub mod csv_parser;
pub mod failure_report;
pub mod importer;
pub mod progress;
pub mod session;
pub mod throttle;

pub use crate::domain::model::{EmployeeRecord, ImportOutcome, ImportSummary};
pub use crate::domain::ports::{DelayStrategy, EmployeeGateway, NotificationSink, ProgressSink};
pub use crate::utils::error::Result;
