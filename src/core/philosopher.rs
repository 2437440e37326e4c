//! Философ: актор, которому для еды нужны две соседние палочки

use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

use super::table::Table;
use crate::DiningError;

/// Фаза трассировочного события
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EatPhase {
    Started,
    Finished,
}

/// Событие начала/конца еды - для логов и проверок в тестах
#[derive(Debug, Clone, Copy)]
pub struct EatEvent {
    pub philosopher_id: usize,
    pub request_id: u64,
    pub phase: EatPhase,
}

/// Философ хранит только свой номер и индексы назначенных палочек,
/// ссылок в арену стола у него нет. Между запросами состояния не имеет.
pub struct Philosopher {
    id: usize,
    left: usize,
    right: usize,
}

impl Philosopher {
    pub fn new(id: usize, left: usize, right: usize) -> Self {
        Self { id, left, right }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn left(&self) -> usize {
        self.left
    }

    pub fn right(&self) -> usize {
        self.right
    }

    /// Захватывает обе палочки, ест `duration`, отпускает палочки.
    ///
    /// Палочки берутся в порядке возрастания глобального индекса, а не
    /// "левая, потом правая": при едином порядке захвата цикл ожидания
    /// невозможен и взаимоблокировки нет при любой емкости стола.
    pub async fn eat(
        &self,
        table: &Table,
        request_id: u64,
        duration: Duration,
        trace: Option<&mpsc::UnboundedSender<EatEvent>>,
    ) -> Result<(), DiningError> {
        let (first, second) = if self.left < self.right {
            (self.left, self.right)
        } else {
            (self.right, self.left)
        };

        let first_guard = table.chopstick(first).acquire().await;
        let second_guard = table.chopstick(second).acquire().await;

        self.emit(trace, request_id, EatPhase::Started);
        info!("Философ {} начал есть (запрос {})", self.id, request_id);

        tokio::time::sleep(duration).await;

        info!("Философ {} закончил есть (запрос {})", self.id, request_id);
        // Finished уходит до освобождения палочек
        self.emit(trace, request_id, EatPhase::Finished);

        drop(second_guard);
        drop(first_guard);

        Ok(())
    }

    fn emit(
        &self,
        trace: Option<&mpsc::UnboundedSender<EatEvent>>,
        request_id: u64,
        phase: EatPhase,
    ) {
        if let Some(tx) = trace {
            let _ = tx.send(EatEvent {
                philosopher_id: self.id,
                request_id,
                phase,
            });
        }
    }
}
