pub mod cli;
pub mod config;
pub mod duck;
pub mod error;
pub mod input;
pub mod process;
pub mod schema;

pub use config::{Config, ProvisioningMode};
pub use error::{LinesqlError, Result};
