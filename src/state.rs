use chrono::{Local, NaiveDate};
use std::sync::Arc;

use crate::agenda::AgendaStore;
use crate::config::Settings;
use crate::pregnancy::Pregnancy;

/// Source of "today" for progress calculations.
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Shared state handed to every route handler.
///
/// Cheap to clone; the settings are immutable once loaded.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub pregnancy: Arc<Pregnancy>,
    pub agenda: AgendaStore,
    clock: Clock,
}

impl AppState {
    pub fn new(settings: Settings, agenda: AgendaStore) -> Self {
        let mut pregnancy = Pregnancy::new(settings.baby.conception_date);
        pregnancy.name = settings.baby.name.clone();

        Self {
            settings: Arc::new(settings),
            pregnancy: Arc::new(pregnancy),
            agenda,
            clock: Arc::new(|| Local::now().date_naive()),
        }
    }

    /// Replace the clock, e.g. to pin "today" in tests.
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }
}
