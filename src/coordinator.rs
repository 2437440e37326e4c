//! Координатор: проводит запрос через хоста к философу и обратно

use std::sync::Arc;
use std::time::Duration;

use futures::future;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::core::{EatEvent, Philosopher, Table};
use crate::host::Host;
use crate::DiningError;

/// Дескриптор поданного запроса. Завершается ровно один раз; ошибка
/// шага еды доходит сюда, а не теряется.
pub struct RequestHandle {
    request_id: u64,
    task: JoinHandle<Result<(), DiningError>>,
}

impl RequestHandle {
    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    /// Ждет завершения запроса
    pub async fn wait(self) -> Result<(), DiningError> {
        self.task
            .await
            .map_err(|e| DiningError::RequestError(e.to_string()))?
    }
}

/// Жизненный цикл запроса: подан, ждет места у хоста, ест, вернул
/// место, завершен.
pub struct Coordinator {
    table: Arc<Table>,
    host: Arc<Host>,
    eat_duration: Duration,
    trace: Option<mpsc::UnboundedSender<EatEvent>>,
}

impl Coordinator {
    pub fn new(table: Arc<Table>, host: Arc<Host>, eat_duration: Duration) -> Self {
        Self {
            table,
            host,
            eat_duration,
            trace: None,
        }
    }

    /// Подписка на события начала/конца еды
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<EatEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.trace = Some(tx);
        rx
    }

    pub fn host(&self) -> &Arc<Host> {
        &self.host
    }

    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    /// Принимает запрос: место у хоста, еда, место обратно. Место
    /// возвращается на любом пути выхода.
    pub fn submit(&self, philosopher: Arc<Philosopher>, request_id: u64) -> RequestHandle {
        let table = self.table.clone();
        let host = self.host.clone();
        let duration = self.eat_duration;
        let trace = self.trace.clone();

        let task = tokio::spawn(async move {
            let seat = host.admit().await?;
            let result = philosopher
                .eat(&table, request_id, duration, trace.as_ref())
                .await;
            drop(seat);

            debug!("Запрос {} закрыт", request_id);
            result
        });

        RequestHandle { request_id, task }
    }

    /// Блокируется, пока не завершатся все поданные запросы. Порядок
    /// завершения не гарантируется.
    pub async fn wait_all(&self, handles: Vec<RequestHandle>) -> Result<(), DiningError> {
        let results = future::join_all(handles.into_iter().map(RequestHandle::wait)).await;
        results.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{setup, EatPhase};
    use tokio::time::timeout;

    fn collect_events(rx: &mut mpsc::UnboundedReceiver<EatEvent>) -> Vec<EatEvent> {
        let mut events = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            events.push(ev);
        }
        events
    }

    // Философы i и j делят палочку, если сидят рядом в кольце
    fn share_chopstick(i: usize, j: usize, count: usize) -> bool {
        (i + 1) % count == j || (j + 1) % count == i
    }

    // Прогоняет журнал событий: ни одной общей палочки у двух едящих
    // одновременно и не больше `capacity` едящих в любой момент
    fn check_trace(events: &[EatEvent], count: usize, capacity: usize) {
        let mut active: Vec<usize> = Vec::new();
        for ev in events {
            match ev.phase {
                EatPhase::Started => {
                    for &other in &active {
                        assert!(
                            !share_chopstick(ev.philosopher_id, other, count),
                            "философы {} и {} едят одной палочкой",
                            ev.philosopher_id,
                            other
                        );
                    }
                    active.push(ev.philosopher_id);
                    assert!(active.len() <= capacity, "за столом больше {} едящих", capacity);
                }
                EatPhase::Finished => {
                    let pos = active
                        .iter()
                        .position(|&id| id == ev.philosopher_id)
                        .expect("Finished без Started");
                    active.remove(pos);
                }
            }
        }
        assert!(active.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_scenario_five_philosophers_two_seats() {
        let (philosophers, table) = setup(5).unwrap();
        let host = Arc::new(Host::new(2).unwrap());
        let mut coordinator =
            Coordinator::new(table, host.clone(), Duration::from_millis(3));
        let mut rx = coordinator.subscribe();

        let mut handles = Vec::new();
        for ph in &philosophers {
            for serving in 0..3u64 {
                let request_id = ph.id() as u64 * 3 + serving;
                handles.push(coordinator.submit(ph.clone(), request_id));
            }
        }
        assert_eq!(handles.len(), 15);

        timeout(Duration::from_secs(10), coordinator.wait_all(handles))
            .await
            .expect("симуляция зависла")
            .unwrap();

        let events = collect_events(&mut rx);
        assert_eq!(events.len(), 30);
        check_trace(&events, 5, 2);

        // каждый философ доел все свои порции
        for ph in &philosophers {
            let finished = events
                .iter()
                .filter(|ev| {
                    ev.philosopher_id == ph.id() && ev.phase == EatPhase::Finished
                })
                .count();
            assert_eq!(finished, 3);
        }

        assert!(host.peak_serving() <= 2);
        assert_eq!(host.total_served(), 15);
        assert_eq!(host.current_serving(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_capacity_one_serializes_fully() {
        let (philosophers, table) = setup(2).unwrap();
        let host = Arc::new(Host::new(1).unwrap());
        let mut coordinator =
            Coordinator::new(table, host.clone(), Duration::from_millis(2));
        let mut rx = coordinator.subscribe();

        let mut handles = Vec::new();
        for ph in &philosophers {
            for serving in 0..2u64 {
                handles.push(coordinator.submit(ph.clone(), ph.id() as u64 * 2 + serving));
            }
        }

        timeout(Duration::from_secs(10), coordinator.wait_all(handles))
            .await
            .expect("симуляция зависла")
            .unwrap();

        // при емкости 1 следующий Started возможен только после
        // предыдущего Finished
        let events = collect_events(&mut rx);
        assert_eq!(events.len(), 8);
        for pair in events.chunks(2) {
            assert_eq!(pair[0].phase, EatPhase::Started);
            assert_eq!(pair[1].phase, EatPhase::Finished);
            assert_eq!(pair[0].philosopher_id, pair[1].philosopher_id);
        }
        assert_eq!(host.peak_serving(), 1);
    }

    // Емкость равна числу философов: от цикла ожидания спасает только
    // единый порядок захвата палочек
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_no_deadlock_at_full_capacity() {
        let (philosophers, table) = setup(5).unwrap();
        let host = Arc::new(Host::new(5).unwrap());
        let coordinator = Coordinator::new(table, host.clone(), Duration::from_millis(1));

        let mut handles = Vec::new();
        for ph in &philosophers {
            for serving in 0..4u64 {
                handles.push(coordinator.submit(ph.clone(), ph.id() as u64 * 4 + serving));
            }
        }

        timeout(Duration::from_secs(10), coordinator.wait_all(handles))
            .await
            .expect("взаимоблокировка")
            .unwrap();

        assert_eq!(host.total_served(), 20);
    }

    #[tokio::test]
    async fn test_handle_keeps_request_id() {
        let (philosophers, table) = setup(2).unwrap();
        let host = Arc::new(Host::new(1).unwrap());
        let coordinator = Coordinator::new(table, host, Duration::from_millis(1));

        let handle = coordinator.submit(philosophers[0].clone(), 42);
        assert_eq!(handle.request_id(), 42);
        handle.wait().await.unwrap();
    }
}
