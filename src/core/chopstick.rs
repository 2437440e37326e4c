//! Палочка - единица эксклюзивного разделяемого ресурса

use tokio::sync::{Mutex, MutexGuard};

/// Одна палочка на столе. В каждый момент времени её держит не более
/// одного философа.
#[derive(Debug)]
pub struct Chopstick {
    id: usize,
    access: Mutex<()>,
}

impl Chopstick {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            access: Mutex::new(()),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Ждет, пока палочка освободится, и захватывает её. Сброс guard'а
    /// освобождает палочку на любом пути выхода.
    pub async fn acquire(&self) -> MutexGuard<'_, ()> {
        self.access.lock().await
    }
}
