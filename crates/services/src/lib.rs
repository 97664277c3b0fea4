#![forbid(unsafe_code)]

pub mod dashboard;
pub mod error;

pub use apprentice_core::Clock;

pub use dashboard::DashboardService;
pub use error::DashboardError;
