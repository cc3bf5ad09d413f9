pub mod bump;
pub mod config;
pub mod error;
pub mod git;
pub mod policy;
pub mod release;
pub mod ui;
pub mod version;
pub mod wizard;

pub use error::{ReleaseError, Result};
