//! End-to-end tests across tracker, strategies, channel and oscillator bank
//!
//! These tests drive the public API only:
//! - Pose payloads in, parameter sets out (every strategy)
//! - Parameter sets through the channel into an offline engine
//! - Whole sessions rendered from synthetic gestures

use motion_synth::config::AppConfig;
use motion_synth::engine::{OfflineBackend, SynthEngine};
use motion_synth::fixtures::{synthesize, Gesture, GestureSpec, OfflineSession};
use motion_synth::mapping::StrategyKind;
use motion_synth::pipeline::MotionPipeline;
use motion_synth::tracking::{Landmark, PoseInput, TrackedJoint, POSE_LANDMARK_COUNT};

/// Both wrists at world height `y`, everything else at rest
fn wrists_at(timestamp: f64, y: f32) -> PoseInput {
    let mut world = vec![Landmark::new(0.0, -1.0, 0.0); POSE_LANDMARK_COUNT];
    world[TrackedJoint::LeftWrist.landmark_index()] = Landmark::new(0.2, y, 0.0);
    world[TrackedJoint::RightWrist.landmark_index()] = Landmark::new(-0.2, y, 0.0);
    let screen = vec![Landmark::new(0.5, 0.5, 0.0); POSE_LANDMARK_COUNT];
    PoseInput {
        timestamp,
        landmarks: Some(vec![screen]),
        world_landmarks: Some(vec![world]),
    }
}

fn raise_then_hold() -> [PoseInput; 3] {
    [wrists_at(0.0, -2.0), wrists_at(66.0, -0.5), wrists_at(100.0, -0.5)]
}

fn unsmoothed(strategy: StrategyKind) -> AppConfig {
    let mut config = AppConfig::default();
    config.tracking.smoothing_alpha = 1.0;
    config.mapping.strategy = strategy;
    config
}

#[test]
fn test_left_wrist_pitch_falls_and_loudness_follows_motion() {
    let mut pipeline = MotionPipeline::new(&unsmoothed(StrategyKind::LeftWrist)).unwrap();
    let sets: Vec<_> = raise_then_hold()
        .iter()
        .map(|pose| pipeline.process(pose).unwrap().as_slice()[0])
        .collect();

    let frequencies: Vec<f32> = sets.iter().map(|p| p.frequency).collect();
    let amplitudes: Vec<f32> = sets.iter().map(|p| p.amplitude).collect();
    assert_eq!(frequencies, vec![880.0, 220.0, 220.0]);
    assert_eq!(amplitudes[0], 0.0);
    assert!((amplitudes[1] - 1.0).abs() < 1e-6);
    assert_eq!(amplitudes[2], 0.0);
}

#[test]
fn test_envelope_strategies_swell_then_decay() {
    for strategy in [StrategyKind::Chord, StrategyKind::DualChord] {
        let mut pipeline = MotionPipeline::new(&unsmoothed(strategy)).unwrap();
        let totals: Vec<f32> = raise_then_hold()
            .iter()
            .map(|pose| pipeline.process(pose).unwrap().total_amplitude())
            .collect();

        assert_eq!(totals[0], 0.0, "{strategy}: no motion on first frame");
        assert!(totals[1] > 0.0, "{strategy}: motion swells the chord");
        assert!(totals[2] < totals[1], "{strategy}: stillness releases it");
    }
}

#[test]
fn test_every_strategy_emits_finite_bounded_sets() {
    let poses = synthesize(&GestureSpec::new(Gesture::ArmRaise).with_jitter(0.02, 3));
    for strategy in StrategyKind::ALL {
        let mut pipeline = MotionPipeline::new(&unsmoothed(strategy)).unwrap();
        let mut layout = None;
        for pose in &poses {
            let set = pipeline.process(pose).unwrap();
            assert!(set.is_finite(), "{strategy} emitted a non-finite value");
            assert!(set.iter().all(|p| (0.0..=1.0).contains(&p.amplitude)));
            assert!(set.iter().all(|p| p.frequency > 0.0));

            // the wave layout never changes within a session
            let len = *layout.get_or_insert(set.len());
            assert_eq!(set.len(), len);
        }
    }
}

#[test]
fn test_pipeline_drives_offline_engine() {
    let config = unsmoothed(StrategyKind::LeftWrist);
    let mut pipeline = MotionPipeline::new(&config).unwrap();
    let mut engine = SynthEngine::new(OfflineBackend::new(), config.synth.clone()).unwrap();
    pipeline.connect(engine.start().unwrap());

    for pose in raise_then_hold() {
        pipeline.process(&pose);
        engine.advance(12).unwrap();
    }

    let mut publisher = pipeline.disconnect();
    engine.shutdown(publisher.as_mut()).unwrap();

    let samples = engine.backend().samples();
    let peak = samples.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    assert!(peak > 0.2, "peak {peak}");
    assert!(samples.iter().all(|s| s.is_finite() && s.abs() <= 1.0));
    let tail = &samples[samples.len() - config.synth.buffer_size..];
    assert!(tail.iter().all(|s| s.abs() < 1e-3));
}

#[test]
fn test_sweep_plays_the_chord_field() {
    let mut config = AppConfig::default();
    config.mapping.strategy = StrategyKind::ChordField;
    let session = OfflineSession::new(config).unwrap();

    let poses = synthesize(&GestureSpec::new(Gesture::WristSweep).with_duration(4.0));
    let output = session.render(&poses).unwrap();
    assert!(output.report.peak > 0.0);
    assert!(output.report.ends_silent);

    let mapped = session.map(&poses).unwrap();
    assert_eq!(mapped.len(), poses.len());
    assert!(mapped.iter().any(|frame| frame.params.total_amplitude() > 0.0));
}
