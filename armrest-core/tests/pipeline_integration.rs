//! Integration tests for the sample loop
//!
//! Drives the full chain (auto-zero, filter, calibration, CoP, dead zone,
//! telemetry gate) against scripted samplers and a mock clock.

mod common;

use armrest_core::{
    errors::SamplerError,
    telemetry::IoSink,
    time::MockTimeSource,
    AutoZero, Channel, ConfigError, CycleOutcome, PipelineError, PlatformConfig, SampleLoop,
    TelemetryRecord, TELEMETRY_HEADER,
};

use common::{
    assert_close, baselines, loaded, ClosedPort, FailingSampler, NoDelay, RecordingSink,
    ScriptedSampler, REST_VOLTS,
};

/// Step the loop `cycles` times, advancing the clock by `step_ms` before each
fn drive(
    platform: &mut SampleLoop<ScriptedSampler, RecordingSink, &MockTimeSource>,
    clock: &MockTimeSource,
    step_ms: u64,
    cycles: usize,
) -> Vec<CycleOutcome> {
    (0..cycles)
        .map(|_| {
            clock.advance(step_ms);
            platform.step().unwrap()
        })
        .collect()
}

fn platform(
    sampler: ScriptedSampler,
    clock: &MockTimeSource,
) -> SampleLoop<ScriptedSampler, RecordingSink, &MockTimeSource> {
    let mut platform = SampleLoop::new(
        PlatformConfig::default(),
        baselines(),
        sampler,
        RecordingSink::default(),
        clock,
    )
    .unwrap();
    platform.start().unwrap();
    platform
}

#[test]
fn header_is_written_once_before_records() {
    let clock = MockTimeSource::new(0);
    let mut platform = platform(ScriptedSampler::constant(REST_VOLTS), &clock);
    drive(&mut platform, &clock, 10, 100);

    let sink = platform.sink();
    assert_eq!(sink.headers, vec![TELEMETRY_HEADER.to_string()]);
    assert_eq!(sink.records.len(), 20);
}

#[test]
fn telemetry_rate_does_not_depend_on_sampling_rate() {
    for step_ms in [1u64, 2, 5, 10, 25] {
        let clock = MockTimeSource::new(0);
        let mut platform = platform(ScriptedSampler::constant(REST_VOLTS), &clock);
        let cycles = (1000 / step_ms) as usize;
        drive(&mut platform, &clock, step_ms, cycles);

        assert_eq!(platform.cycles(), cycles as u64);
        let records = &platform.sink().records;
        assert_eq!(records.len(), 20, "step {} ms", step_ms);
        assert_eq!(records[0].timestamp, 50);
        assert!(records.windows(2).all(|w| w[1].timestamp - w[0].timestamp == 50));
    }
}

#[test]
fn platform_at_rest_reports_nothing() {
    let clock = MockTimeSource::new(0);
    let mut platform = platform(ScriptedSampler::constant(REST_VOLTS), &clock);
    let outcomes = drive(&mut platform, &clock, 5, 400);

    assert!(outcomes.iter().all(|o| o.state.total_force == 0.0 && !o.state.is_rested));
    for record in &platform.sink().records {
        assert_eq!(record.f_total, 0.0);
        assert!(!record.is_rested);
        assert!(!record.state_changed);
        assert!(!record.has_cop());
        assert!(record.to_string().ends_with(",0,0,nan,nan"));
    }
}

#[test]
fn left_only_load_settles_on_left_sensor() {
    let clock = MockTimeSource::new(0);
    let mut platform = platform(ScriptedSampler::constant(loaded(10.0, 0.0, 0.0)), &clock);
    let outcomes = drive(&mut platform, &clock, 5, 400);

    let last = platform.sink().records.last().copied().unwrap();
    assert_close(last.f_left, 59.1, 0.05);
    assert_eq!(last.f_right, 0.0);
    assert_eq!(last.f_vtc, 0.0);
    assert_close(last.f_total, 59.1, 0.05);
    assert!(last.is_rested);
    assert_eq!((last.cop_x, last.cop_y), (0.0, 0.0));

    // CoP sits ~8.1 cm from the center: outside the whole time
    assert!(outcomes.iter().all(|o| !o.state.in_dead_zone && !o.state.state_changed));
}

#[test]
fn dead_zone_entry_and_exit_are_flagged_once() {
    let clock = MockTimeSource::new(0);
    let left = loaded(10.0, 0.0, 0.0);
    let spread = loaded(10.0, 10.0, 10.0);
    let sampler = ScriptedSampler::constant(left)
        .then(left, 150)
        .then(spread, 200)
        .then(left, 200)
        .then(REST_VOLTS, 200)
        .then(spread, 200);
    let mut platform = platform(sampler, &clock);

    let settle_left = drive(&mut platform, &clock, 2, 151);
    assert!(settle_left.iter().all(|o| !o.state.state_changed));

    let spread_out = drive(&mut platform, &clock, 2, 200);
    let entries: Vec<_> = spread_out.iter().filter(|o| o.state.state_changed).collect();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].state.in_dead_zone);
    assert!(spread_out.last().unwrap().state.in_dead_zone);

    let back_left = drive(&mut platform, &clock, 2, 200);
    let exits: Vec<_> = back_left.iter().filter(|o| o.state.state_changed).collect();
    assert_eq!(exits.len(), 1);
    assert!(!exits[0].state.in_dead_zone);
    assert!(exits[0].state.is_rested);

    let unloaded = drive(&mut platform, &clock, 2, 200);
    assert!(unloaded.iter().all(|o| !o.state.state_changed));
    assert!(!unloaded.last().unwrap().state.is_rested);

    // Returning to the center after losing rest counts as a fresh entry
    let again = drive(&mut platform, &clock, 2, 200);
    assert_eq!(again.iter().filter(|o| o.state.state_changed).count(), 1);
}

#[test]
fn state_changes_between_records_are_not_latched() {
    let clock = MockTimeSource::new(0);
    let sampler = ScriptedSampler::constant(loaded(10.0, 0.0, 0.0))
        .then(loaded(10.0, 10.0, 10.0), 300);
    let mut platform = platform(sampler, &clock);
    let outcomes = drive(&mut platform, &clock, 1, 301);

    // Entry lands a few cycles into the ramp, well before the first record
    let entry = outcomes.iter().position(|o| o.state.state_changed).unwrap();
    assert!(outcomes[entry].state.in_dead_zone);
    assert!(!outcomes[entry].emitted);
    assert!(outcomes.iter().any(|o| o.state.state_changed && !o.emitted));
    assert!(outcomes[entry..].iter().any(|o| o.emitted && o.state.in_dead_zone));

    assert!(platform.sink().records.iter().all(|r| !r.state_changed));
    let changed_and_logged = outcomes
        .iter()
        .filter(|o| o.state.state_changed && o.emitted)
        .count();
    let logged_changes = platform
        .sink()
        .records
        .iter()
        .filter(|r| r.state_changed)
        .count();
    assert_eq!(logged_changes, changed_and_logged);
}

#[test]
fn auto_zero_feeds_the_loop() {
    let mut sampler = ScriptedSampler::constant(REST_VOLTS);
    let mut delay = NoDelay::default();
    let config = PlatformConfig::default();

    let baselines = AutoZero::from_config(&config).unwrap().run(&mut sampler, &mut delay).unwrap();
    assert_eq!(delay.total_ms, 2000);
    assert_eq!(sampler.reads, 600);
    for channel in Channel::ALL {
        assert_close(baselines.get(channel), REST_VOLTS[channel], 1e-4);
    }

    let clock = MockTimeSource::new(0);
    let mut platform =
        SampleLoop::new(config, baselines, sampler, RecordingSink::default(), &clock).unwrap();
    platform.start().unwrap();
    let outcomes = drive(&mut platform, &clock, 5, 100);
    assert!(outcomes.iter().all(|o| o.state.total_force == 0.0));
}

#[test]
fn io_sink_output_parses_back() {
    let clock = MockTimeSource::new(0);
    let mut platform = SampleLoop::new(
        PlatformConfig::default(),
        baselines(),
        ScriptedSampler::constant(loaded(10.0, 0.0, 0.0)),
        IoSink::new(Vec::new()),
        &clock,
    )
    .unwrap();
    platform.start().unwrap();
    for _ in 0..200 {
        clock.advance(5);
        platform.step().unwrap();
    }

    let (_, sink, _) = platform.into_parts();
    let text = String::from_utf8(sink.into_inner()).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some(TELEMETRY_HEADER));

    let records: Vec<TelemetryRecord> = lines.map(|l| l.parse().unwrap()).collect();
    assert_eq!(records.len(), 20);
    assert_eq!(records.last().map(|r| r.timestamp), Some(1000));
    assert!(records.last().unwrap().has_cop());
}

#[test]
fn sampler_failure_stops_the_loop() {
    let clock = MockTimeSource::new(0);
    let mut platform = SampleLoop::new(
        PlatformConfig::default(),
        baselines(),
        FailingSampler::new(Channel::Right, 3),
        RecordingSink::default(),
        &clock,
    )
    .unwrap();

    for _ in 0..3 {
        platform.step().unwrap();
    }
    assert_eq!(
        platform.step().unwrap_err(),
        PipelineError::Sampler(SamplerError { channel: Channel::Right, error: "adc timeout" })
    );
    assert_eq!(platform.cycles(), 3);

    match platform.run().unwrap_err() {
        PipelineError::Sampler(e) => assert_eq!(e.to_string(), "Sampling right failed: adc timeout"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn sink_failure_surfaces_on_first_record() {
    let clock = MockTimeSource::new(0);
    let mut platform = SampleLoop::new(
        PlatformConfig::default(),
        baselines(),
        ScriptedSampler::constant(REST_VOLTS),
        ClosedPort,
        &clock,
    )
    .unwrap();
    platform.start().unwrap();

    clock.advance(10);
    assert!(platform.step().is_ok());
    clock.advance(40);
    assert_eq!(platform.step().unwrap_err(), PipelineError::Sink("port closed"));
}

#[test]
fn invalid_configuration_is_rejected_up_front() {
    let clock = MockTimeSource::new(0);
    let result = SampleLoop::new(
        PlatformConfig::default().with_rest_threshold(0.0),
        baselines(),
        ScriptedSampler::constant(REST_VOLTS),
        RecordingSink::default(),
        &clock,
    );
    assert!(matches!(
        result.err(),
        Some(PipelineError::Config(ConfigError::NonPositiveThreshold { .. }))
    ));
}
