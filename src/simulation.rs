//! Фасад симуляции: конфигурация, прогон, статистика

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::coordinator::Coordinator;
use crate::core::{setup, Philosopher};
use crate::host::Host;
use crate::DiningError;

/// Конфигурация прогона. Все параметры задает вызывающий, из окружения
/// или файлов ядро ничего не читает.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Число философов (и палочек) за столом
    pub philosophers: usize,
    /// Сколько философов хост пускает есть одновременно
    pub table_limit: usize,
    /// Сколько порций съедает каждый философ
    pub servings: usize,
    /// Длительность одной порции
    pub eat_duration_ms: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            philosophers: 5,
            table_limit: 2,
            servings: 3,
            eat_duration_ms: 100,
        }
    }
}

pub struct Simulation {
    philosophers: Vec<Arc<Philosopher>>,
    coordinator: Coordinator,
    host: Arc<Host>,
    config: SimConfig,
}

impl Simulation {
    /// Проверяет конфигурацию и собирает стол, хоста и координатора.
    pub fn new(config: SimConfig) -> Result<Self, DiningError> {
        let (philosophers, table) = setup(config.philosophers)?;
        let host = Arc::new(Host::new(config.table_limit)?);
        let coordinator = Coordinator::new(
            table,
            host.clone(),
            Duration::from_millis(config.eat_duration_ms),
        );

        Ok(Self {
            philosophers,
            coordinator,
            host,
            config,
        })
    }

    pub fn coordinator(&mut self) -> &mut Coordinator {
        &mut self.coordinator
    }

    /// Подает `servings` запросов за каждого философа и ждет, пока все
    /// не доедят.
    pub async fn run(&self) -> Result<(), DiningError> {
        info!(
            "Запуск симуляции: {} философов, {} мест, {} порций каждому",
            self.config.philosophers, self.config.table_limit, self.config.servings
        );

        let mut handles = Vec::new();
        for ph in &self.philosophers {
            for serving in 0..self.config.servings {
                let request_id = (ph.id() * self.config.servings + serving) as u64;
                handles.push(self.coordinator.submit(ph.clone(), request_id));
            }
        }

        self.coordinator.wait_all(handles).await?;
        info!("Все поели!");
        Ok(())
    }

    /// Статистика прогона
    pub fn get_stats(&self) -> serde_json::Value {
        json!({
            "philosophers": self.config.philosophers,
            "servings_per_philosopher": self.config.servings,
            "requests_total": self.config.philosophers * self.config.servings,
            "host": self.host.get_stats(),
        })
    }
}
