//! Shared test helpers for `georemind-core` integration tests.
//!
//! In-memory fakes for every port so monitor tests can focus on behaviour
//! instead of boilerplate.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use georemind_common::MockClock;
use georemind_core::{
    GeofenceMonitor, LocationHandler, LocationProvider, LocationSubscription, NotificationSink,
    PermissionProvider, ReminderSource,
};
use georemind_domain::utils::geo::offset_north;
use georemind_domain::{
    Coordinates, GeoRemindError, GeoReminder, LocationSample, NotificationRequest, Permission,
    PermissionStatus, Result as DomainResult, SamplingOptions,
};
use tokio::sync::Semaphore;

/// Reminder coordinates used across tests.
pub const HOME: Coordinates = Coordinates { latitude: 52.52, longitude: 13.405 };

pub fn reminder(id: &str, location: Option<Coordinates>) -> GeoReminder {
    GeoReminder {
        id: id.into(),
        title: format!("Reminder {id}"),
        category: "errands".into(),
        is_active: true,
        location,
    }
}

/// Sample `meters` due north of `origin`.
pub fn sample_at(origin: Coordinates, meters: f64) -> LocationSample {
    let point = offset_north(origin, meters);
    LocationSample::now(point.latitude, point.longitude)
}

/// Reminder source returning a configurable list or failure.
#[derive(Default)]
pub struct FakeReminderSource {
    reminders: Mutex<Vec<GeoReminder>>,
    failing: Mutex<bool>,
    fetches: Mutex<usize>,
    gate: Mutex<Option<Arc<Semaphore>>>,
}

impl FakeReminderSource {
    pub fn with(reminders: Vec<GeoReminder>) -> Arc<Self> {
        Arc::new(Self { reminders: Mutex::new(reminders), ..Self::default() })
    }

    pub fn set_reminders(&self, reminders: Vec<GeoReminder>) {
        *self.reminders.lock().unwrap() = reminders;
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    pub fn fetches(&self) -> usize {
        *self.fetches.lock().unwrap()
    }

    /// Park every later fetch until [`release_fetches`](Self::release_fetches).
    pub fn hold_fetches(&self) {
        *self.gate.lock().unwrap() = Some(Arc::new(Semaphore::new(0)));
    }

    pub fn release_fetches(&self, count: usize) {
        if let Some(gate) = self.gate.lock().unwrap().as_ref() {
            gate.add_permits(count);
        }
    }

    /// Wait until `count` fetches have started.
    pub async fn wait_for_fetches(&self, count: usize) {
        while self.fetches() < count {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl ReminderSource for FakeReminderSource {
    async fn fetch_reminders(&self) -> DomainResult<Vec<GeoReminder>> {
        *self.fetches.lock().unwrap() += 1;
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.acquire().await.expect("fetch gate closed").forget();
        }
        if *self.failing.lock().unwrap() {
            return Err(GeoRemindError::Network("HTTP 503 Service Unavailable".into()));
        }
        Ok(self.reminders.lock().unwrap().clone())
    }
}

/// Notification sink that records every request.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<NotificationRequest>>,
    failing: Mutex<bool>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    /// Requests received, including ones that were made to fail.
    pub fn sent(&self) -> Vec<NotificationRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl NotificationSink for RecordingNotifier {
    async fn notify(&self, request: NotificationRequest) -> DomainResult<()> {
        self.sent.lock().unwrap().push(request);
        if *self.failing.lock().unwrap() {
            return Err(GeoRemindError::Notification("notification service unavailable".into()));
        }
        Ok(())
    }
}

/// Permission provider with per-permission status.
pub struct FakePermissions {
    statuses: Mutex<[PermissionStatus; 3]>,
    grant_on_request: bool,
    requests: Mutex<Vec<Permission>>,
}

impl FakePermissions {
    pub fn granted() -> Arc<Self> {
        Arc::new(Self {
            statuses: Mutex::new([PermissionStatus::Granted; 3]),
            grant_on_request: true,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn denying(permission: Permission) -> Arc<Self> {
        let perms = Self {
            statuses: Mutex::new([PermissionStatus::Granted; 3]),
            grant_on_request: false,
            requests: Mutex::new(Vec::new()),
        };
        perms.set(permission, PermissionStatus::Denied);
        Arc::new(perms)
    }

    pub fn undetermined(grant_on_request: bool) -> Arc<Self> {
        Arc::new(Self {
            statuses: Mutex::new([PermissionStatus::Denied; 3]),
            grant_on_request,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn set(&self, permission: Permission, status: PermissionStatus) {
        self.statuses.lock().unwrap()[index(permission)] = status;
    }

    pub fn requested(&self) -> Vec<Permission> {
        self.requests.lock().unwrap().clone()
    }
}

fn index(permission: Permission) -> usize {
    match permission {
        Permission::ForegroundLocation => 0,
        Permission::BackgroundLocation => 1,
        Permission::Notifications => 2,
    }
}

#[async_trait]
impl PermissionProvider for FakePermissions {
    async fn check(&self, permission: Permission) -> DomainResult<PermissionStatus> {
        Ok(self.statuses.lock().unwrap()[index(permission)])
    }

    async fn request(&self, permission: Permission) -> DomainResult<PermissionStatus> {
        self.requests.lock().unwrap().push(permission);
        if self.grant_on_request {
            self.set(permission, PermissionStatus::Granted);
        }
        Ok(self.statuses.lock().unwrap()[index(permission)])
    }
}

/// Location provider whose samples are pushed by the test.
#[derive(Default)]
pub struct ManualLocationProvider {
    handler: Arc<Mutex<Option<Arc<dyn LocationHandler>>>>,
    subscriptions: Mutex<Vec<SamplingOptions>>,
    cancellations: Arc<Mutex<usize>>,
    failing: Mutex<bool>,
}

impl ManualLocationProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    pub fn subscriptions(&self) -> Vec<SamplingOptions> {
        self.subscriptions.lock().unwrap().clone()
    }

    pub fn cancellations(&self) -> usize {
        *self.cancellations.lock().unwrap()
    }

    pub fn is_subscribed(&self) -> bool {
        self.handler.lock().unwrap().is_some()
    }

    /// Deliver a sample to the registered handler. Returns `false` when no
    /// subscription is active.
    pub async fn emit(&self, sample: LocationSample) -> bool {
        let handler = self.handler.lock().unwrap().clone();
        match handler {
            Some(handler) => {
                handler.on_location(sample).await;
                true
            }
            None => false,
        }
    }
}

struct ManualSubscription {
    handler: Arc<Mutex<Option<Arc<dyn LocationHandler>>>>,
    cancellations: Arc<Mutex<usize>>,
    cancelled: bool,
}

#[async_trait]
impl LocationSubscription for ManualSubscription {
    async fn cancel(&mut self) -> DomainResult<()> {
        if !self.cancelled {
            self.cancelled = true;
            *self.handler.lock().unwrap() = None;
            *self.cancellations.lock().unwrap() += 1;
        }
        Ok(())
    }
}

#[async_trait]
impl LocationProvider for ManualLocationProvider {
    async fn subscribe(
        &self,
        options: SamplingOptions,
        handler: Arc<dyn LocationHandler>,
    ) -> DomainResult<Box<dyn LocationSubscription>> {
        if *self.failing.lock().unwrap() {
            return Err(GeoRemindError::Internal("location services unavailable".into()));
        }
        self.subscriptions.lock().unwrap().push(options);
        *self.handler.lock().unwrap() = Some(handler);
        Ok(Box::new(ManualSubscription {
            handler: Arc::clone(&self.handler),
            cancellations: Arc::clone(&self.cancellations),
            cancelled: false,
        }))
    }
}

/// Monitor wired to fakes and a mock clock.
pub struct Harness {
    pub monitor: GeofenceMonitor,
    pub reminders: Arc<FakeReminderSource>,
    pub notifier: Arc<RecordingNotifier>,
    pub permissions: Arc<FakePermissions>,
    pub location: Arc<ManualLocationProvider>,
    pub clock: MockClock,
}

impl Harness {
    pub fn new(reminders: Vec<GeoReminder>) -> Self {
        Self::with_permissions(reminders, FakePermissions::granted())
    }

    pub fn with_permissions(reminders: Vec<GeoReminder>, permissions: Arc<FakePermissions>) -> Self {
        let reminders = FakeReminderSource::with(reminders);
        let notifier = RecordingNotifier::new();
        let location = ManualLocationProvider::new();
        let clock = MockClock::new();

        let monitor = GeofenceMonitor::new(
            reminders.clone(),
            notifier.clone(),
            permissions.clone(),
            location.clone(),
        )
        .with_clock(Arc::new(clock.clone()));

        Self { monitor, reminders, notifier, permissions, location, clock }
    }

    /// Start the monitor, asserting success.
    pub async fn started(self) -> Self {
        assert!(self.monitor.start().await, "monitor should start");
        self
    }

    /// Push a sample `meters` north of [`HOME`] through the subscription.
    pub async fn tick_at(&self, meters: f64) {
        assert!(self.location.emit(sample_at(HOME, meters)).await, "no active subscription");
    }
}
