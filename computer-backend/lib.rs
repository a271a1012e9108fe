pub mod computer;
pub mod config;
pub mod sandbox;

pub use computer::{Action, Computer, ComputerError, DaytonaComputer, EnvState, ScrollDirection};
pub use config::{AdapterConfig, DaytonaConfig, SettleDelays};
