//! Стол: кольцо палочек и рассадка философов

use std::sync::Arc;
use tracing::debug;

use super::chopstick::Chopstick;
use super::philosopher::Philosopher;
use crate::DiningError;

/// Арена палочек с индексами 0..count-1, замкнутая в кольцо.
pub struct Table {
    chopsticks: Vec<Chopstick>,
}

impl Table {
    /// Накрывает стол на `count` мест. Стол из одного места вырожден:
    /// у философа нет пары соседних палочек.
    pub fn new(count: usize) -> Result<Self, DiningError> {
        if count < 2 {
            return Err(DiningError::ConfigError(format!(
                "за столом должно быть минимум 2 места, запрошено {}",
                count
            )));
        }

        let chopsticks = (0..count).map(Chopstick::new).collect();
        Ok(Self { chopsticks })
    }

    pub fn chopstick(&self, index: usize) -> &Chopstick {
        &self.chopsticks[index]
    }

    pub fn seats(&self) -> usize {
        self.chopsticks.len()
    }
}

/// Накрывает стол и рассаживает философов: философу i достаются палочки
/// i (левая) и (i + 1) % count (правая), так что каждую палочку делят
/// ровно два соседа.
pub fn setup(count: usize) -> Result<(Vec<Arc<Philosopher>>, Arc<Table>), DiningError> {
    let table = Arc::new(Table::new(count)?);
    let philosophers = (0..count)
        .map(|i| Arc::new(Philosopher::new(i, i, (i + 1) % count)))
        .collect();

    debug!("Стол накрыт: {} философов, {} палочек", count, count);
    Ok((philosophers, table))
}
