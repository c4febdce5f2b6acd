//! Geofence monitor - core business logic
//!
//! Owns the location subscription lifecycle and the triggered-reminder
//! state. Every tick re-fetches the reminder set, measures the distance to
//! each eligible reminder and notifies at most once per visit.
//!
//! Nothing in here panics or propagates errors out of a tick: a failing
//! reminder fetch skips the tick, a failing notification is logged, and
//! lifecycle failures surface as `false` from [`GeofenceMonitor::start`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use georemind_common::{Clock, SystemClock};
use georemind_domain::{
    haversine_distance_m, GeoRemindError, GeoReminder, GeofenceConfig, LocationSample,
    NotificationRequest, Permission, PermissionReport, PermissionStatus, Result, SamplingOptions,
};
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

use super::ports::{
    LocationHandler, LocationProvider, LocationSubscription, NotificationSink, PermissionProvider,
    ReminderSource,
};
use super::trigger_state::{Transition, TriggerTracker};

/// Summary of a single tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Reminder fetch failed or the sample was unusable; nothing changed.
    pub skipped: bool,
    pub eligible: usize,
    /// Ids notified in this tick.
    pub triggered: Vec<String>,
    pub rearmed: usize,
    pub expired: usize,
    pub notification_failures: usize,
}

impl TickReport {
    fn skipped() -> Self {
        Self { skipped: true, ..Self::default() }
    }
}

/// State shared between the monitor and the location callback.
struct MonitorCore {
    reminders: Arc<dyn ReminderSource>,
    notifier: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
    settings: GeofenceConfig,
    tracker: TriggerTracker,
}

impl MonitorCore {
    async fn process_sample(&self, sample: LocationSample) -> TickReport {
        let position = sample.coordinates();
        if !position.is_valid() {
            warn!(
                latitude = sample.latitude,
                longitude = sample.longitude,
                "Ignoring location sample with invalid coordinates"
            );
            return TickReport::skipped();
        }

        let epoch = self.tracker.epoch();

        let reminders = match self.reminders.fetch_reminders().await {
            Ok(reminders) => reminders,
            Err(err) => {
                warn!(error = %err, "Reminder fetch failed; skipping tick");
                return TickReport::skipped();
            }
        };

        let now = self.clock.now();
        let mut report = TickReport {
            expired: self.tracker.purge_expired(epoch, now),
            ..TickReport::default()
        };

        let mut due: Vec<(&GeoReminder, f64)> = Vec::new();
        for reminder in &reminders {
            let Some(target) = reminder.monitored_location() else {
                continue;
            };
            report.eligible += 1;

            let distance_m = haversine_distance_m(position, target);
            match self.tracker.evaluate(epoch, &reminder.id, distance_m, now, &self.settings) {
                Transition::Triggered => due.push((reminder, distance_m)),
                Transition::Rearmed => {
                    report.rearmed += 1;
                    debug!(reminder_id = %reminder.id, distance_m, "Reminder re-armed");
                }
                Transition::Stale => {
                    debug!("Monitor stopped during tick; discarding results");
                    return report;
                }
                Transition::Unchanged => {}
            }
        }

        let outcomes = join_all(due.iter().map(|&(reminder, distance_m)| {
            let request = NotificationRequest::for_reminder(reminder, distance_m);
            async move { (reminder.id.as_str(), distance_m, self.notifier.notify(request).await) }
        }))
        .await;

        for (reminder_id, distance_m, outcome) in outcomes {
            match outcome {
                Ok(()) => info!(reminder_id, distance_m, "Proximity notification sent"),
                Err(err) => {
                    report.notification_failures += 1;
                    error!(reminder_id, error = %err, "Failed to send proximity notification");
                }
            }
            report.triggered.push(reminder_id.to_owned());
        }

        debug!(
            eligible = report.eligible,
            triggered = report.triggered.len(),
            rearmed = report.rearmed,
            expired = report.expired,
            "Geofence tick complete"
        );
        report
    }
}

#[async_trait]
impl LocationHandler for MonitorCore {
    async fn on_location(&self, sample: LocationSample) {
        self.process_sample(sample).await;
    }
}

/// Background geofence monitor.
///
/// Construct once at application startup and share it; the triggered set
/// lives inside the instance and is never exposed.
pub struct GeofenceMonitor {
    core: Arc<MonitorCore>,
    permissions: Arc<dyn PermissionProvider>,
    location: Arc<dyn LocationProvider>,
    sampling: SamplingOptions,
    subscription: Mutex<Option<Box<dyn LocationSubscription>>>,
    running: AtomicBool,
}

impl GeofenceMonitor {
    /// Create a monitor with the default radii, cooldown and sampling options.
    pub fn new(
        reminders: Arc<dyn ReminderSource>,
        notifier: Arc<dyn NotificationSink>,
        permissions: Arc<dyn PermissionProvider>,
        location: Arc<dyn LocationProvider>,
    ) -> Self {
        Self {
            core: Arc::new(MonitorCore {
                reminders,
                notifier,
                clock: Arc::new(SystemClock),
                settings: GeofenceConfig::default(),
                tracker: TriggerTracker::new(),
            }),
            permissions,
            location,
            sampling: SamplingOptions::default(),
            subscription: Mutex::new(None),
            running: AtomicBool::new(false),
        }
    }

    /// Override the trigger/re-arm radii and cooldown.
    pub fn with_settings(self, settings: GeofenceConfig) -> Self {
        self.rebuild_core(|core| core.settings = settings)
    }

    /// Override the clock used for cooldown deadlines.
    pub fn with_clock(self, clock: Arc<dyn Clock>) -> Self {
        self.rebuild_core(|core| core.clock = clock)
    }

    /// Override the options passed to the location provider.
    pub fn with_sampling(mut self, sampling: SamplingOptions) -> Self {
        self.sampling = sampling;
        self
    }

    /// Builders run before `start`, so the fresh core starts with empty state.
    fn rebuild_core(mut self, update: impl FnOnce(&mut MonitorCore)) -> Self {
        let mut core = MonitorCore {
            reminders: Arc::clone(&self.core.reminders),
            notifier: Arc::clone(&self.core.notifier),
            clock: Arc::clone(&self.core.clock),
            settings: self.core.settings,
            tracker: TriggerTracker::new(),
        };
        update(&mut core);
        self.core = Arc::new(core);
        self
    }

    pub fn settings(&self) -> &GeofenceConfig {
        &self.core.settings
    }

    /// Start monitoring. Returns `false` when permissions are missing or the
    /// subscription cannot be registered.
    pub async fn start(&self) -> bool {
        match self.try_start().await {
            Ok(()) => true,
            Err(err @ GeoRemindError::PermissionDenied(_)) => {
                warn!(error = %err, "Geofence monitoring not started");
                false
            }
            Err(err) => {
                error!(error = %err, "Failed to start geofence monitoring");
                false
            }
        }
    }

    /// Start monitoring, returning the reason on failure.
    ///
    /// An already registered subscription is cancelled and replaced, and
    /// its triggered state is discarded.
    ///
    /// # Errors
    /// - `GeoRemindError::PermissionDenied` if any required permission is
    ///   missing; no tracking is started.
    /// - `GeoRemindError::Registration` if the provider rejects the
    ///   subscription.
    #[instrument(skip(self))]
    pub async fn try_start(&self) -> Result<()> {
        let mut slot = self.subscription.lock().await;

        let report = self.check_permissions().await;
        if !report.all_granted() {
            let missing: Vec<String> = report.missing().iter().map(ToString::to_string).collect();
            return Err(GeoRemindError::PermissionDenied(format!(
                "missing {}; enable them in Settings",
                missing.join(", ")
            )));
        }

        if let Some(mut existing) = slot.take() {
            info!("Replacing existing location subscription");
            self.running.store(false, Ordering::SeqCst);
            if let Err(err) = existing.cancel().await {
                warn!(error = %err, "Failed to cancel previous location subscription");
            }
            self.core.tracker.clear();
        }

        let handler: Arc<dyn LocationHandler> = self.core.clone();
        let subscription = self
            .location
            .subscribe(self.sampling.clone(), handler)
            .await
            .map_err(|err| match err {
                GeoRemindError::Registration(_) => err,
                other => GeoRemindError::Registration(other.to_string()),
            })?;

        *slot = Some(subscription);
        self.running.store(true, Ordering::SeqCst);
        info!(
            min_interval_secs = self.sampling.min_interval.as_secs(),
            min_displacement_m = self.sampling.min_displacement_m,
            accuracy = ?self.sampling.accuracy,
            "Geofence monitoring started"
        );
        Ok(())
    }

    /// Stop monitoring and forget all triggered state. No-op when stopped.
    #[instrument(skip(self))]
    pub async fn stop(&self) {
        let mut slot = self.subscription.lock().await;

        if let Some(mut subscription) = slot.take() {
            if let Err(err) = subscription.cancel().await {
                warn!(error = %err, "Failed to cancel location subscription");
            }
            info!("Geofence monitoring stopped");
        } else {
            debug!("Geofence monitoring already stopped");
        }

        self.running.store(false, Ordering::SeqCst);
        self.core.tracker.clear();
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Fire a diagnostic notification, bypassing geofence logic.
    ///
    /// # Errors
    /// Returns the sink's error so the caller can show it.
    pub async fn send_test_notification(&self) -> Result<()> {
        let result = self.core.notifier.notify(NotificationRequest::test()).await;
        match &result {
            Ok(()) => info!("Test notification sent"),
            Err(err) => error!(error = %err, "Failed to send test notification"),
        }
        result
    }

    /// Run one tick by hand with the given sample.
    pub async fn handle_location(&self, sample: LocationSample) -> TickReport {
        self.core.process_sample(sample).await
    }

    /// Query all permissions without prompting. Failed queries count as denied.
    pub async fn check_permissions(&self) -> PermissionReport {
        let mut report = PermissionReport::denied();
        for permission in Permission::ALL {
            let status = match self.permissions.check(permission).await {
                Ok(status) => status,
                Err(err) => {
                    warn!(%permission, error = %err, "Permission query failed");
                    PermissionStatus::Denied
                }
            };
            report.set(permission, status);
        }
        report
    }

    /// Request foreground location, then background location, then
    /// notifications.
    ///
    /// Background location is only requested once foreground location is
    /// granted.
    pub async fn request_permissions(&self) -> PermissionReport {
        let mut report = PermissionReport::denied();
        for permission in Permission::ALL {
            if permission == Permission::BackgroundLocation
                && !report.foreground_location.is_granted()
            {
                debug!("Skipping background location request without foreground access");
                continue;
            }
            let status = match self.permissions.request(permission).await {
                Ok(status) => status,
                Err(err) => {
                    warn!(%permission, error = %err, "Permission request failed");
                    PermissionStatus::Denied
                }
            };
            report.set(permission, status);
        }
        info!(all_granted = report.all_granted(), "Permission request round finished");
        report
    }

    /// Ids currently suppressed, for diagnostics.
    pub fn triggered_reminders(&self) -> Vec<String> {
        self.core.tracker.snapshot(self.core.clock.now())
    }
}
