//! Dining-rs - Симуляция обедающих философов на Rust без взаимоблокировок

pub mod core;
pub mod host;
pub mod error;

mod coordinator;
mod simulation;
pub use coordinator::{Coordinator, RequestHandle};
pub use simulation::{SimConfig, Simulation};
pub use error::DiningError;

pub mod prelude {
    pub use crate::core::{setup, EatEvent, EatPhase, Philosopher, Table};
    pub use crate::host::Host;
    pub use crate::Coordinator;
    pub use crate::DiningError;
    pub use crate::{SimConfig, Simulation};
}
