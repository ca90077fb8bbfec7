pub use crate::errors::DriverError;

pub mod cli;
pub mod client;
pub mod corpus;
pub mod dispatch;
pub mod endpoint;
pub mod errors;
pub mod executor;
pub mod report;
pub mod skip;
