use crate::dashboard::overview::Overview;
use crate::dashboard::page::Page;
use crate::domain::{Actuator, Aviary, Batch, Device, Person, Reading, Sensor};
use crate::list::{ListController, ListOptions};
use crate::remote::{Fetch, PageRequest, Source, StatusSource};
use crate::session::Session;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, instrument};

/// Everything the dashboard reads from or writes to.
pub trait DashboardSource:
    Source<Sensor>
    + Source<Device>
    + Source<Aviary>
    + Source<Batch>
    + Source<Person>
    + Source<Actuator>
    + Fetch<Reading>
    + StatusSource
    + 'static
{
}

impl<T> DashboardSource for T where
    T: Source<Sensor>
        + Source<Device>
        + Source<Aviary>
        + Source<Batch>
        + Source<Person>
        + Source<Actuator>
        + Fetch<Reading>
        + StatusSource
        + 'static
{
}

/// One controller per resource page, sharing a source and a session.
pub struct Dashboard<S> {
    source: Arc<S>,
    session: Session,
    options: ListOptions,
    current: Page,
    overview: RwLock<Option<Overview>>,
    sensors: ListController<Sensor, S>,
    aviaries: ListController<Aviary, S>,
    devices: ListController<Device, S>,
    batches: ListController<Batch, S>,
    people: ListController<Person, S>,
    actuators: ListController<Actuator, S>,
    readings: ListController<Reading, S>,
}

impl<S: DashboardSource> Dashboard<S> {
    pub fn new(source: Arc<S>, session: Session, options: ListOptions) -> Self {
        Dashboard {
            sensors: ListController::new(Arc::clone(&source), session.clone(), options),
            aviaries: ListController::new(Arc::clone(&source), session.clone(), options),
            devices: ListController::new(Arc::clone(&source), session.clone(), options),
            batches: ListController::new(Arc::clone(&source), session.clone(), options),
            people: ListController::new(Arc::clone(&source), session.clone(), options),
            actuators: ListController::new(Arc::clone(&source), session.clone(), options),
            readings: ListController::new(Arc::clone(&source), session.clone(), options),
            source,
            session,
            options,
            current: Page::Overview,
            overview: RwLock::new(None),
        }
    }

    pub fn current(&self) -> Page {
        self.current
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn sensors(&self) -> &ListController<Sensor, S> {
        &self.sensors
    }

    pub fn aviaries(&self) -> &ListController<Aviary, S> {
        &self.aviaries
    }

    pub fn devices(&self) -> &ListController<Device, S> {
        &self.devices
    }

    pub fn batches(&self) -> &ListController<Batch, S> {
        &self.batches
    }

    pub fn people(&self) -> &ListController<Person, S> {
        &self.people
    }

    pub fn actuators(&self) -> &ListController<Actuator, S> {
        &self.actuators
    }

    pub fn readings(&self) -> &ListController<Reading, S> {
        &self.readings
    }

    /// Switches to `page`, loading its data the first time it is shown.
    #[instrument(skip(self))]
    pub async fn navigate(&mut self, page: Page) {
        info!("🧭 Opening {}", page.title());
        self.current = page;
        self.ensure_loaded(page).await;
    }

    /// Like [`Self::navigate`] for a route; unknown routes leave the current page.
    pub async fn navigate_to(&mut self, route: &str) -> Option<Page> {
        let page = Page::from_route(route)?;
        self.navigate(page).await;
        Some(page)
    }

    async fn ensure_loaded(&self, page: Page) {
        match page {
            Page::Overview => {
                if self.overview.read().await.is_none() {
                    self.refresh_overview().await;
                }
            }
            Page::Sensors => self.sensors.ensure_loaded().await,
            Page::Aviaries => self.aviaries.ensure_loaded().await,
            Page::Devices => self.devices.ensure_loaded().await,
            Page::Batches => self.batches.ensure_loaded().await,
            Page::People => self.people.ensure_loaded().await,
            Page::Actuators => self.actuators.ensure_loaded().await,
            Page::Readings => self.readings.ensure_loaded().await,
        }
    }

    pub async fn refresh_overview(&self) -> Overview {
        let overview = Overview::load(self.source.as_ref(), &self.session, PageRequest::first(self.options.page_size)).await;
        *self.overview.write().await = Some(overview.clone());
        overview
    }

    /// `None` until the overview has been loaded.
    pub async fn overview(&self) -> Option<Overview> {
        self.overview.read().await.clone()
    }

    /// Loads every page concurrently.
    #[instrument(skip(self))]
    pub async fn load_all(&self) {
        info!("🧭 Loading all pages...");
        futures::join!(
            self.refresh_overview(),
            self.sensors.load(),
            self.aviaries.load(),
            self.devices.load(),
            self.batches.load(),
            self.people.load(),
            self.actuators.load(),
            self.readings.load(),
        );
        info!("🧭 Loading all pages... OK");
    }

    /// Number of listed records per resource page.
    pub async fn summary(&self) -> Vec<(Page, usize)> {
        let (sensors, aviaries, devices, batches, people, actuators, readings) = futures::join!(
            self.sensors.records(),
            self.aviaries.records(),
            self.devices.records(),
            self.batches.records(),
            self.people.records(),
            self.actuators.records(),
            self.readings.records(),
        );

        vec![
            (Page::Sensors, sensors.len()),
            (Page::Aviaries, aviaries.len()),
            (Page::Devices, devices.len()),
            (Page::Batches, batches.len()),
            (Page::People, people.len()),
            (Page::Actuators, actuators.len()),
            (Page::Readings, readings.len()),
        ]
    }
}
