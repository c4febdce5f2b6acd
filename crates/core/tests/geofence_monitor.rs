//! Behavioural tests for `GeofenceMonitor`: lifecycle, hysteresis and
//! failure handling.

mod support;

use std::time::Duration;

use georemind_common::testing::assert_within_percent;
use georemind_domain::{
    haversine_distance_m, Coordinates, GeofenceConfig, LocationAccuracy, NotificationKind,
    Permission, PermissionStatus,
};
use support::{reminder, sample_at, FakePermissions, Harness, HOME};

#[test]
fn harness_samples_land_at_requested_distance() {
    for meters in [50.0, 150.0, 250.0] {
        let sample = sample_at(HOME, meters);
        assert_within_percent(haversine_distance_m(HOME, sample.coordinates()), meters, 0.5);
    }
}

#[tokio::test]
async fn start_registers_balanced_30s_50m_subscription() {
    let h = Harness::new(vec![reminder("home", Some(HOME))]).started().await;

    assert!(h.monitor.is_running());
    let subscriptions = h.location.subscriptions();
    assert_eq!(subscriptions.len(), 1);
    assert_eq!(subscriptions[0].accuracy, LocationAccuracy::Balanced);
    assert_eq!(subscriptions[0].min_interval, Duration::from_secs(30));
    assert_eq!(subscriptions[0].min_displacement_m, 50.0);
}

#[tokio::test]
async fn start_fails_without_background_location() {
    let h = Harness::with_permissions(
        vec![reminder("home", Some(HOME))],
        FakePermissions::denying(Permission::BackgroundLocation),
    );

    assert!(!h.monitor.start().await);
    assert!(!h.monitor.is_running());
    assert!(h.location.subscriptions().is_empty());
}

#[tokio::test]
async fn start_fails_without_notification_permission() {
    let h = Harness::with_permissions(vec![], FakePermissions::denying(Permission::Notifications));

    let err = h.monitor.try_start().await.unwrap_err();

    assert!(matches!(err, georemind_domain::GeoRemindError::PermissionDenied(_)));
    assert!(err.to_string().contains("notifications"));
    assert!(!h.location.is_subscribed());
}

#[tokio::test]
async fn start_reports_registration_failure_as_false() {
    let h = Harness::new(vec![]);
    h.location.set_failing(true);

    assert!(!h.monitor.start().await);
    assert!(!h.monitor.is_running());

    let err = h.monitor.try_start().await.unwrap_err();
    assert!(matches!(err, georemind_domain::GeoRemindError::Registration(_)));
}

#[tokio::test]
async fn restarting_replaces_existing_subscription() {
    let h = Harness::new(vec![reminder("home", Some(HOME))]).started().await;
    h.tick_at(50.0).await;
    assert_eq!(h.monitor.triggered_reminders(), vec!["home".to_string()]);

    assert!(h.monitor.start().await);

    assert_eq!(h.location.subscriptions().len(), 2);
    assert_eq!(h.location.cancellations(), 1);
    assert!(h.monitor.is_running());
    assert!(h.monitor.triggered_reminders().is_empty());
}

#[tokio::test]
async fn stop_is_idempotent_and_unsubscribes() {
    let h = Harness::new(vec![]);
    h.monitor.stop().await;
    assert!(!h.monitor.is_running());

    let h = h.started().await;
    h.monitor.stop().await;
    h.monitor.stop().await;

    assert!(!h.monitor.is_running());
    assert!(!h.location.is_subscribed());
    assert_eq!(h.location.cancellations(), 1);
}

#[tokio::test]
async fn repeated_ticks_inside_radius_notify_once() {
    let h = Harness::new(vec![reminder("home", Some(HOME))]).started().await;

    for _ in 0..5 {
        h.tick_at(50.0).await;
        h.clock.advance(Duration::from_secs(30));
    }

    let sent = h.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].data.reminder_id.as_deref(), Some("home"));
    assert_eq!(sent[0].data.kind, NotificationKind::Location);
    assert_eq!(sent[0].data.category.as_deref(), Some("errands"));
}

#[tokio::test]
async fn leaving_and_returning_notifies_twice() {
    let h = Harness::new(vec![reminder("home", Some(HOME))]).started().await;

    h.tick_at(50.0).await;
    h.tick_at(250.0).await;
    h.tick_at(50.0).await;

    assert_eq!(h.notifier.count(), 2);
}

#[tokio::test]
async fn staying_past_cooldown_notifies_again() {
    let h = Harness::new(vec![reminder("home", Some(HOME))]).started().await;

    h.tick_at(50.0).await;
    for _ in 0..20 {
        h.clock.advance(Duration::from_secs(30));
        h.tick_at(50.0).await;
    }

    // 20 x 30 s = exactly the 10 minute cooldown.
    assert_eq!(h.notifier.count(), 2);
    let body = &h.notifier.sent()[1].body;
    assert!(body.contains("50 m"), "unexpected body: {body}");
}

#[tokio::test]
async fn oscillating_in_dead_zone_does_not_flap() {
    let h = Harness::new(vec![reminder("home", Some(HOME))]).started().await;
    h.tick_at(50.0).await;

    for distance in [120.0, 180.0, 120.0, 180.0, 150.0, 199.0] {
        h.clock.advance(Duration::from_secs(30));
        h.tick_at(distance).await;
    }

    assert_eq!(h.notifier.count(), 1);
    assert_eq!(h.monitor.triggered_reminders(), vec!["home".to_string()]);
}

#[tokio::test]
async fn approaching_through_dead_zone_only_fires_inside_radius() {
    let h = Harness::new(vec![reminder("home", Some(HOME))]).started().await;

    h.tick_at(180.0).await;
    h.tick_at(120.0).await;
    assert_eq!(h.notifier.count(), 0);

    h.tick_at(90.0).await;
    assert_eq!(h.notifier.count(), 1);
}

#[tokio::test]
async fn ineligible_reminders_never_trigger() {
    let mut inactive = reminder("inactive", Some(HOME));
    inactive.is_active = false;
    let unlocated = reminder("unlocated", None);
    let nan = reminder("nan", Some(Coordinates::new(f64::NAN, HOME.longitude)));
    let infinite = reminder("infinite", Some(Coordinates::new(HOME.latitude, f64::INFINITY)));

    let h = Harness::new(vec![inactive, unlocated, nan, infinite]).started().await;
    let report = h.monitor.handle_location(sample_at(HOME, 0.0)).await;

    assert_eq!(report.eligible, 0);
    assert_eq!(h.notifier.count(), 0);
    assert!(h.monitor.triggered_reminders().is_empty());
}

#[tokio::test]
async fn deactivated_reminder_stops_being_monitored_next_tick() {
    let h = Harness::new(vec![reminder("home", Some(HOME))]).started().await;
    h.tick_at(250.0).await;

    let mut deactivated = reminder("home", Some(HOME));
    deactivated.is_active = false;
    h.reminders.set_reminders(vec![deactivated]);
    h.tick_at(10.0).await;

    assert_eq!(h.notifier.count(), 0);
}

#[tokio::test]
async fn fetch_failure_skips_tick_without_state_change() {
    let h = Harness::new(vec![reminder("home", Some(HOME))]).started().await;
    h.tick_at(50.0).await;
    let before = h.monitor.triggered_reminders();

    h.reminders.set_failing(true);
    let report = h.monitor.handle_location(sample_at(HOME, 250.0)).await;

    assert!(report.skipped);
    assert_eq!(h.monitor.triggered_reminders(), before);
    assert_eq!(h.notifier.count(), 1);
    assert!(h.monitor.is_running());
    assert!(h.location.is_subscribed());

    h.reminders.set_failing(false);
    h.tick_at(50.0).await;
    assert_eq!(h.notifier.count(), 1, "still inside the same visit");
}

#[tokio::test]
async fn failed_notification_is_not_retried_within_visit() {
    let h = Harness::new(vec![reminder("home", Some(HOME))]).started().await;
    h.notifier.set_failing(true);

    let report = h.monitor.handle_location(sample_at(HOME, 50.0)).await;
    assert_eq!(report.notification_failures, 1);
    assert_eq!(report.triggered, vec!["home".to_string()]);

    h.notifier.set_failing(false);
    h.tick_at(50.0).await;

    assert_eq!(h.notifier.count(), 1);
    assert_eq!(h.monitor.triggered_reminders(), vec!["home".to_string()]);
}

#[tokio::test]
async fn stop_clears_state_so_restart_can_retrigger() {
    let h = Harness::new(vec![reminder("home", Some(HOME))]).started().await;
    h.tick_at(50.0).await;

    h.monitor.stop().await;
    assert!(h.monitor.triggered_reminders().is_empty());
    assert!(!h.location.emit(sample_at(HOME, 50.0)).await);

    assert!(h.monitor.start().await);
    h.tick_at(50.0).await;

    assert_eq!(h.notifier.count(), 2);
}

#[tokio::test]
async fn tick_in_flight_during_stop_is_discarded() {
    let h = Harness::new(vec![reminder("home", Some(HOME))]).started().await;
    h.reminders.hold_fetches();

    let tick = h.monitor.handle_location(sample_at(HOME, 50.0));
    let interrupt = async {
        h.reminders.wait_for_fetches(1).await;
        h.monitor.stop().await;
        h.reminders.release_fetches(1);
    };
    let (report, ()) = tokio::join!(tick, interrupt);

    assert!(report.triggered.is_empty());
    assert_eq!(h.notifier.count(), 0);
    assert!(h.monitor.triggered_reminders().is_empty());
    assert!(!h.monitor.is_running());
}

#[tokio::test]
async fn overlapping_ticks_notify_once() {
    let h = Harness::new(vec![reminder("home", Some(HOME))]).started().await;
    h.reminders.hold_fetches();

    let release = async {
        h.reminders.wait_for_fetches(2).await;
        h.reminders.release_fetches(2);
    };
    let (first, second, ()) = tokio::join!(
        h.monitor.handle_location(sample_at(HOME, 50.0)),
        h.monitor.handle_location(sample_at(HOME, 50.0)),
        release
    );

    assert_eq!(first.triggered.len() + second.triggered.len(), 1);
    assert_eq!(h.notifier.count(), 1);
    assert_eq!(h.monitor.triggered_reminders(), vec!["home".to_string()]);
}

#[tokio::test]
async fn multiple_reminders_are_tracked_independently() {
    let far = Coordinates::new(HOME.latitude + 0.01, HOME.longitude);
    let h =
        Harness::new(vec![reminder("home", Some(HOME)), reminder("far", Some(far))]).started().await;

    let report = h.monitor.handle_location(sample_at(HOME, 20.0)).await;

    assert_eq!(report.eligible, 2);
    assert_eq!(report.triggered, vec!["home".to_string()]);
    assert_eq!(h.monitor.triggered_reminders(), vec!["home".to_string()]);
}

#[tokio::test]
async fn invalid_sample_is_ignored() {
    let h = Harness::new(vec![reminder("home", Some(HOME))]).started().await;

    let report = h
        .monitor
        .handle_location(georemind_domain::LocationSample::now(f64::NAN, HOME.longitude))
        .await;

    assert!(report.skipped);
    assert_eq!(h.reminders.fetches(), 0);
}

#[tokio::test]
async fn custom_settings_change_radii() {
    let h = Harness::new(vec![reminder("home", Some(HOME))]);
    let monitor = h.monitor.with_settings(GeofenceConfig {
        trigger_radius_m: 300.0,
        rearm_radius_m: 600.0,
        cooldown_seconds: 60,
    });

    let report = monitor.handle_location(sample_at(HOME, 250.0)).await;

    assert_eq!(report.triggered, vec!["home".to_string()]);
    assert_eq!(monitor.settings().rearm_radius_m, 600.0);
}

#[tokio::test]
async fn test_notification_bypasses_geofence() {
    let h = Harness::new(vec![]);

    h.monitor.send_test_notification().await.unwrap();

    let sent = h.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].data.kind, NotificationKind::Test);
    assert!(!h.monitor.is_running());
}

#[tokio::test]
async fn test_notification_surfaces_sink_failure() {
    let h = Harness::new(vec![]);
    h.notifier.set_failing(true);

    assert!(h.monitor.send_test_notification().await.is_err());
}

#[tokio::test]
async fn request_permissions_asks_in_order() {
    let h = Harness::with_permissions(vec![], FakePermissions::undetermined(true));

    let report = h.monitor.request_permissions().await;

    assert!(report.all_granted());
    assert_eq!(
        h.permissions.requested(),
        vec![
            Permission::ForegroundLocation,
            Permission::BackgroundLocation,
            Permission::Notifications
        ]
    );
    assert!(h.monitor.start().await);
}

#[tokio::test]
async fn background_location_not_requested_without_foreground() {
    let h = Harness::with_permissions(vec![], FakePermissions::undetermined(false));

    let report = h.monitor.request_permissions().await;

    assert_eq!(report.foreground_location, PermissionStatus::Denied);
    assert_eq!(
        h.permissions.requested(),
        vec![Permission::ForegroundLocation, Permission::Notifications]
    );
    assert!(!h.monitor.start().await);
}
