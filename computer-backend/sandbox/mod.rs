pub mod client;
pub mod error;
pub mod toolbox;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use client::DaytonaClient;
pub use error::SandboxError;
pub use toolbox::ToolboxApi;
pub use types::*;
