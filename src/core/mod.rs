//! Ядро симуляции: стол, палочки, философы

mod chopstick;
mod philosopher;
mod table;


pub use chopstick::Chopstick;
pub use philosopher::{EatEvent, EatPhase, Philosopher};
pub use table::{setup, Table};
