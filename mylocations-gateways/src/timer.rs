use crate::event::{self, Event, EventSender};
use mylocations_core::gateways::timer::{TimerGateway, TimerId};
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};
use tokio::task::JoinHandle;

/// One-shot timers on the tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioTimer {
    tx: EventSender,
    last_id: Arc<AtomicU64>,
    pending: Arc<Mutex<HashMap<TimerId, JoinHandle<()>>>>,
}

impl TokioTimer {
    pub fn new(tx: EventSender) -> Self {
        Self {
            tx,
            last_id: Arc::new(AtomicU64::new(0)),
            pending: Default::default(),
        }
    }

    fn pending(&self) -> std::sync::MutexGuard<'_, HashMap<TimerId, JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(|err| err.into_inner())
    }
}

impl TimerGateway for TokioTimer {
    fn schedule(&self, after: Duration) -> TimerId {
        let id = TimerId::from_raw(self.last_id.fetch_add(1, Ordering::Relaxed) + 1);
        let tx = self.tx.clone();
        let pending = Arc::clone(&self.pending);
        let task = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            if let Ok(mut pending) = pending.lock() {
                pending.remove(&id);
            }
            log::debug!("Timer {} expired", id.to_raw());
            event::send(&tx, Event::TimedOut(id));
        });
        self.pending().insert(id, task);
        id
    }

    fn cancel(&self, id: TimerId) {
        if let Some(task) = self.pending().remove(&id) {
            task.abort();
        }
    }
}
