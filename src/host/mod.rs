//! Хост: ограничивает число одновременно едящих философов
//!
//! Настоящий блокирующий счетный семафор, а не опрос счетчика под
//! мьютексом в цикле. Емкость фиксируется при создании.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::debug;

use crate::DiningError;

#[derive(Debug, Default)]
struct Counters {
    current: AtomicUsize,
    peak: AtomicUsize,
    total: AtomicU64,
}

/// Место за столом. При Drop место возвращается хосту на любом пути
/// выхода, в том числе при ошибке во время еды.
pub struct Seat {
    counters: Arc<Counters>,
    _permit: OwnedSemaphorePermit,
}

impl Drop for Seat {
    fn drop(&mut self) {
        // счетчик уменьшается до возврата permit'а (поля падают после Drop)
        self.counters.current.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct Host {
    seats: Arc<Semaphore>,
    capacity: usize,
    counters: Arc<Counters>,
}

impl Host {
    /// Создает хоста с фиксированной емкостью (минимум 1 место).
    pub fn new(capacity: usize) -> Result<Self, DiningError> {
        if capacity < 1 {
            return Err(DiningError::ConfigError(format!(
                "емкость стола должна быть минимум 1, запрошено {}",
                capacity
            )));
        }

        Ok(Self {
            seats: Arc::new(Semaphore::new(capacity)),
            capacity,
            counters: Arc::new(Counters::default()),
        })
    }

    /// Ждет свободное место и усаживает вызывающего. Между admit и
    /// сбросом Seat за столом не больше `capacity` философов.
    pub async fn admit(&self) -> Result<Seat, DiningError> {
        let permit = self
            .seats
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| DiningError::HostError(e.to_string()))?;

        let current = self.counters.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.peak.fetch_max(current, Ordering::SeqCst);
        self.counters.total.fetch_add(1, Ordering::SeqCst);
        debug!("За столом {} из {}", current, self.capacity);

        Ok(Seat {
            counters: self.counters.clone(),
            _permit: permit,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Сколько мест свободно прямо сейчас
    pub fn available(&self) -> usize {
        self.seats.available_permits()
    }

    pub fn current_serving(&self) -> usize {
        self.counters.current.load(Ordering::SeqCst)
    }

    /// Максимум одновременно сидевших за все время работы хоста
    pub fn peak_serving(&self) -> usize {
        self.counters.peak.load(Ordering::SeqCst)
    }

    pub fn total_served(&self) -> u64 {
        self.counters.total.load(Ordering::SeqCst)
    }

    /// Статистика хоста
    pub fn get_stats(&self) -> serde_json::Value {
        serde_json::json!({
            "capacity": self.capacity,
            "available": self.available(),
            "current": self.current_serving(),
            "peak": self.peak_serving(),
            "total_served": self.total_served(),
        })
    }
}
