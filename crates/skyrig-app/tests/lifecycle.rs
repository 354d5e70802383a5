use skyrig_app::{run_headless, AppConfig, LifecycleError, Phase};
use skyrig_core::{Backend, DeviceConfig, MemoryAssets, SampleCount};
use skyrig_gpu::{NullDeviceFactory, ResourceKind};
use skyrig_input::InputDevice;
use skyrig_platform::Resolution;
use skyrig_test::{CallLog, ProbeApp, ProbeOptions, TestHost};
use std::sync::Arc;

fn config() -> AppConfig {
    AppConfig::new("lifecycle test")
        .with_size(1280, 720)
        .with_device(DeviceConfig::default().with_backend(Backend::Null))
}

#[test]
fn full_session_leaves_nothing_alive() {
    let log = CallLog::new();
    let (mut lc, probe) = TestHost::new().lifecycle(ProbeApp::new(log.clone()), &config());

    lc.init().unwrap();
    lc.load().unwrap();
    lc.update(0.016).unwrap();
    lc.draw().unwrap();
    lc.unload().unwrap();
    lc.exit().unwrap();

    insta::assert_debug_snapshot!(log.take(), @r#"
    [
        "init null x1",
        "load 1280x720",
        "update",
        "draw 0",
        "unload",
        "exit",
    ]
    "#);
    assert_eq!(lc.phase(), Phase::Exited);
    assert_eq!(probe.live_count(), 0);
    let stats = probe.stats();
    assert_eq!(stats.devices_created, 1);
    assert_eq!(stats.devices_destroyed, 1);
    assert_eq!(stats.submits, 1);
    assert_eq!(stats.presents, 1);
}

#[test]
fn update_makes_no_renderer_calls() {
    let (mut lc, device) = TestHost::new().lifecycle(ProbeApp::new(CallLog::new()), &config());
    lc.init().unwrap();
    lc.load().unwrap();
    lc.update(0.016).unwrap();
    lc.draw().unwrap();

    let stats = device.stats();
    let records = device.live_records();
    let writes = device.write_order();
    let submission = device.last_submission();
    lc.update(0.016).unwrap();

    assert_eq!(device.stats(), stats);
    assert_eq!(device.live_records(), records);
    assert_eq!(device.write_order(), writes);
    assert_eq!(device.last_submission(), submission);
    assert_eq!(lc.app().updates(), 2);
    lc.shutdown().unwrap();
}

#[test]
fn draw_leaves_cpu_state_alone() {
    let (mut lc, device) = TestHost::new().lifecycle(ProbeApp::new(CallLog::new()), &config());
    lc.init().unwrap();
    lc.load().unwrap();
    lc.update(0.25).unwrap();

    let (updates, elapsed) = (lc.app().updates(), lc.app().elapsed());
    let submits = device.stats().submits;
    lc.draw().unwrap();

    assert_eq!(device.stats().submits, submits + 1);
    assert_eq!(lc.app().updates(), updates);
    assert_eq!(lc.app().elapsed().to_bits(), elapsed.to_bits());
    lc.shutdown().unwrap();
}

#[test]
fn load_requires_a_live_init() {
    let log = CallLog::new();
    let (mut lc, _probe) = TestHost::new().lifecycle(ProbeApp::new(log.clone()), &config());

    assert!(matches!(
        lc.load(),
        Err(LifecycleError::InvalidTransition { op: "load", .. })
    ));
    lc.init().unwrap();
    lc.exit().unwrap();
    assert!(lc.load().is_err());
    assert!(lc.init().is_err(), "exit is terminal");
    insta::assert_debug_snapshot!(log.take(), @r#"
    [
        "init null x1",
        "exit",
    ]
    "#);
}

#[test]
fn failed_init_keeps_uninitialized() {
    let log = CallLog::new();
    let options = ProbeOptions {
        fail_init: true,
        ..ProbeOptions::default()
    };
    let (mut lc, probe) =
        TestHost::new().lifecycle(ProbeApp::with_options(log, options), &config());

    assert!(matches!(lc.init(), Err(LifecycleError::Init(_))));
    assert_eq!(lc.phase(), Phase::Uninitialized);
    assert!(!lc.input().is_initialized());
    assert_eq!(probe.live_count(), 0);
}

#[test]
fn failed_load_rolls_back_to_init_state() {
    let log = CallLog::new();
    let options = ProbeOptions {
        fail_load: true,
        ..ProbeOptions::default()
    };
    let (mut lc, probe) =
        TestHost::new().lifecycle(ProbeApp::with_options(log, options), &config());

    lc.init().unwrap();
    let after_init = probe.live_count();
    assert_eq!(after_init, lc.app().init_resources());

    assert!(matches!(lc.load(), Err(LifecycleError::Load(_))));
    assert_eq!(lc.phase(), Phase::Initialized);
    assert_eq!(lc.app().load_resources(), 0);
    assert_eq!(probe.live_count(), after_init);
}

#[test]
fn allocation_failure_mid_load_rolls_back() {
    let (mut lc, probe) =
        TestHost::new().lifecycle(ProbeApp::new(CallLog::new()), &config());
    lc.init().unwrap();
    let after_init = probe.live_count();

    probe.fail_allocation(ResourceKind::Pipeline, 0);
    assert!(lc.load().is_err());
    assert_eq!(probe.live_count(), after_init);
    assert_eq!(probe.live_count_of(ResourceKind::SwapChain), 0);

    lc.load().unwrap();
    assert_eq!(lc.phase(), Phase::Loaded);
}

#[test]
fn reload_reproduces_the_resource_set() {
    let (mut lc, probe) =
        TestHost::new().lifecycle(ProbeApp::new(CallLog::new()), &config());
    lc.init().unwrap();
    lc.load().unwrap();
    let first = probe.live_records();

    lc.unload().unwrap();
    assert_eq!(probe.live_count(), lc.app().init_resources());
    lc.load().unwrap();
    assert_eq!(probe.live_records(), first);
}

#[test]
fn device_change_matches_cold_start() {
    let log = CallLog::new();
    let (mut lc, probe) = TestHost::new().lifecycle(ProbeApp::new(log.clone()), &config());
    lc.init().unwrap();
    lc.load().unwrap();
    lc.update(0.016).unwrap();
    lc.draw().unwrap();
    log.take();

    let msaa = DeviceConfig::default()
        .with_backend(Backend::Null)
        .with_sample_count(SampleCount::X4);
    lc.change_device(msaa).unwrap();
    insta::assert_debug_snapshot!(log.take(), @r#"
    [
        "unload",
        "exit",
        "init null x4",
        "load 1280x720",
    ]
    "#);
    assert_eq!(lc.phase(), Phase::Loaded);
    assert_eq!(lc.device_config().sample_count, SampleCount::X4);
    assert_eq!(probe.stats().devices_destroyed, 1);
    let changed = probe.live_records();

    let (mut cold, cold_probe) = TestHost::new().lifecycle(
        ProbeApp::new(CallLog::new()),
        &config().with_device(msaa),
    );
    cold.init().unwrap();
    cold.load().unwrap();
    assert_eq!(cold_probe.live_records(), changed);

    lc.update(0.016).unwrap();
    lc.draw().unwrap();
}

#[test]
fn device_change_of_initialized_app_does_not_load() {
    let log = CallLog::new();
    let (mut lc, _probe) = TestHost::new().lifecycle(ProbeApp::new(log.clone()), &config());
    lc.init().unwrap();
    log.take();

    lc.change_device(DeviceConfig::default().with_backend(Backend::Null).with_vsync(true))
        .unwrap();
    insta::assert_debug_snapshot!(log.take(), @r#"
    [
        "exit",
        "init null x1",
    ]
    "#);
    assert_eq!(lc.phase(), Phase::Initialized);
}

#[test]
fn device_change_failing_at_init_leaves_uninitialized() {
    let (mut lc, probe) =
        TestHost::new().lifecycle(ProbeApp::new(CallLog::new()), &config());
    lc.init().unwrap();
    lc.load().unwrap();

    probe.fail_next_device();
    let result = lc.change_device(DeviceConfig::default().with_backend(Backend::Null));
    assert!(matches!(result, Err(LifecycleError::Init(_))));
    assert_eq!(lc.phase(), Phase::Uninitialized);
    assert_eq!(probe.live_count(), 0);

    lc.init().unwrap();
    lc.load().unwrap();
}

#[test]
fn resolution_change_reloads_at_new_size() {
    let log = CallLog::new();
    let (mut lc, probe) = TestHost::new().lifecycle(ProbeApp::new(log.clone()), &config());
    lc.init().unwrap();
    lc.load().unwrap();
    log.take();

    lc.change_resolution(1920, 1080, false).unwrap();
    insta::assert_debug_snapshot!(log.take(), @r#"
    [
        "unload",
        "load 1920x1080",
    ]
    "#);
    assert_eq!(lc.window().size(), Resolution::new(1920, 1080));
    assert!(probe
        .live_records()
        .iter()
        .any(|r| r.label == "depth" && r.detail.starts_with("1920x1080")));

    lc.change_resolution(0, 0, false).unwrap();
    assert!(log.take().is_empty());
}

#[test]
fn input_swap_touches_nothing_else() {
    let log = CallLog::new();
    let (mut lc, probe) = TestHost::new().lifecycle(ProbeApp::new(log.clone()), &config());
    lc.init().unwrap();
    lc.load().unwrap();
    log.take();
    let records = probe.live_records();

    lc.swap_input_device(InputDevice::Gamepad).unwrap();
    assert!(log.take().is_empty());
    assert_eq!(lc.phase(), Phase::Loaded);
    assert_eq!(lc.input().device(), Some(InputDevice::Gamepad));
    assert_eq!(probe.live_records(), records);

    lc.update(0.016).unwrap();
    lc.draw().unwrap();
}

#[test]
fn draw_failure_is_fatal() {
    let options = ProbeOptions {
        fail_draw_at: Some(1),
        ..ProbeOptions::default()
    };
    let (mut lc, probe) = TestHost::new().lifecycle(
        ProbeApp::with_options(CallLog::new(), options),
        &config(),
    );
    lc.init().unwrap();
    lc.load().unwrap();
    lc.update(0.016).unwrap();
    lc.draw().unwrap();
    lc.update(0.016).unwrap();

    let err = lc.draw().unwrap_err();
    assert!(matches!(err, LifecycleError::Frame(_)));
    assert!(err.is_fatal());
    assert_eq!(lc.frame(), 1);

    lc.shutdown().unwrap();
    assert_eq!(probe.live_count(), 0);
}

#[test]
fn dropping_a_loaded_lifecycle_shuts_down() {
    let log = CallLog::new();
    let (mut lc, probe) = TestHost::new().lifecycle(ProbeApp::new(log.clone()), &config());
    lc.init().unwrap();
    lc.load().unwrap();
    drop(lc);

    assert_eq!(probe.live_count(), 0);
    assert_eq!(log.entries()[2..], ["unload", "exit"]);
}

#[test]
fn headless_run_survives_a_device_change() {
    let factory = NullDeviceFactory::new();
    let probe = factory.probe();
    let log = CallLog::new();

    let stats = run_headless(
        &config(),
        ProbeApp::new(log.clone()),
        Box::new(factory),
        Arc::new(MemoryAssets::new()),
        6,
        |frame, lc| {
            if frame == 3 {
                lc.change_device(
                    DeviceConfig::default()
                        .with_backend(Backend::Null)
                        .with_image_count(2),
                )?;
            }
            Ok(())
        },
    )
    .unwrap();

    assert_eq!(stats.frames, 6);
    assert_eq!(probe.stats().presents, 6);
    assert_eq!(probe.stats().devices_created, 2);
    assert_eq!(probe.live_count(), 0);
    let draws = log.entries().iter().filter(|e| e.starts_with("draw")).count();
    assert_eq!(draws, 6);
}
