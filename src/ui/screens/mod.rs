pub mod report;

pub use report::{InsightsScreen, ReportScreen};
