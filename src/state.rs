use std::sync::Arc;
use std::time::{Instant, SystemTime};

use crate::bandit::Scheduler;
use crate::config::SchedulerConfig;
use crate::services::transcribe::Transcriber;
use crate::store::ArmStore;

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    started_at_system: SystemTime,
    store: Arc<ArmStore>,
    scheduler: Arc<Scheduler>,
    transcriber: Arc<Transcriber>,
}

impl AppState {
    pub fn new(store: Arc<ArmStore>, config: SchedulerConfig, transcriber: Transcriber) -> Self {
        let scheduler = Arc::new(Scheduler::new(Arc::clone(&store), config));
        Self {
            started_at: Instant::now(),
            started_at_system: SystemTime::now(),
            store,
            scheduler,
            transcriber: Arc::new(transcriber),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn started_at_system(&self) -> SystemTime {
        self.started_at_system
    }

    pub fn store(&self) -> &ArmStore {
        &self.store
    }

    pub fn scheduler(&self) -> Arc<Scheduler> {
        Arc::clone(&self.scheduler)
    }

    pub fn transcriber(&self) -> Arc<Transcriber> {
        Arc::clone(&self.transcriber)
    }
}
