//! End-to-end scenarios
//!
//! Each test drives a full session (scripted detector, recognizers,
//! interaction, animation) through the scenario runner and checks the
//! observable behavior: events, world state, and metrics.

#[cfg(test)]
mod tests {
    use std::f64::consts::{PI, TAU};

    use handworld_core::{GestureKind, Hand};
    use handworld_runtime::{FrameOutcome, RecognitionStatus, SessionConfig};
    use handworld_world::{
        Animation, ObjectKind, ObjectPatch, ObjectRequest, Position, Size, WorldObject,
        STATUS_DOT_ID,
    };

    use crate::{HandBuilder, ScenarioRunner, ScriptedDetector, ScriptedResponse, WristTrajectory};

    // ========================================================================
    // HELPERS
    // ========================================================================

    fn kinds(runner: &ScenarioRunner) -> Vec<GestureKind> {
        runner.events().iter().map(|e| e.kind).collect()
    }

    fn count(runner: &ScenarioRunner, kind: GestureKind) -> usize {
        runner.events().iter().filter(|e| e.kind == kind).count()
    }

    fn swipe_kinds(runner: &ScenarioRunner) -> Vec<GestureKind> {
        kinds(runner)
            .into_iter()
            .filter(|k| matches!(k, GestureKind::SwipeLeft | GestureKind::SwipeRight))
            .collect()
    }

    /// One hand per frame, wrist at each x (y fixed)
    fn wrist_path(xs: impl IntoIterator<Item = f64>) -> Vec<Vec<Hand>> {
        xs.into_iter()
            .map(|x| vec![HandBuilder::wrist_at(x, 0.6).build()])
            .collect()
    }

    fn ramp(from: f64, to: f64, steps: usize) -> impl Iterator<Item = f64> {
        (1..=steps).map(move |k| from + (to - from) * k as f64 / steps as f64)
    }

    fn add_rect(runner: &mut ScenarioRunner, x: f64, y: f64) -> String {
        runner
            .session_mut()
            .create_object(ObjectRequest::new(
                ObjectKind::Rect,
                Position::new(x, y),
                Size::new(0.2, 0.2),
            ))
            .unwrap()
    }

    fn pointing(x: f64, y: f64) -> HandBuilder {
        HandBuilder::pointing_at(x, y, 0.0)
    }

    // ========================================================================
    // RECOGNITION
    // ========================================================================

    #[test]
    fn test_pinch_fires_once_per_edge() {
        let open = pointing(0.5, 0.5).build();
        let closed = pointing(0.5, 0.5).pinched().build();
        let mut runner = ScenarioRunner::with_hands(vec![
            vec![open.clone()],
            vec![closed.clone()],
            vec![closed.clone()],
            vec![closed],
            vec![open.clone()],
            vec![open],
        ]);
        runner.start().unwrap();
        runner.run(6);

        assert_eq!(kinds(&runner), vec![GestureKind::PinchStart, GestureKind::PinchEnd]);
    }

    #[test]
    fn test_pinch_threshold_crossing() {
        let frames = [0.1, 0.07, 0.059, 0.03, 0.059, 0.061, 0.2]
            .into_iter()
            .map(|gap| vec![pointing(0.5, 0.5).with_pinch_gap(gap).build()]);
        let mut runner = ScenarioRunner::with_hands(frames);
        runner.start().unwrap();
        runner.run(7);

        let events = runner.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, GestureKind::PinchStart);
        assert_eq!(events[0].timestamp, 32.0);
        assert_eq!(events[1].kind, GestureKind::PinchEnd);
        assert_eq!(events[1].timestamp, 80.0);
    }

    #[test]
    fn test_swipe_thresholds() {
        let mut runner = ScenarioRunner::with_hands(WristTrajectory::swipe(0.2, 0.05, 300.0).hands())
            .frame_interval(50.0);
        runner.start().unwrap();
        runner.run(7);
        assert_eq!(swipe_kinds(&runner), vec![GestureKind::SwipeRight]);

        let mut slow = ScenarioRunner::with_hands(WristTrajectory::swipe(0.2, 0.05, 900.0).hands())
            .frame_interval(50.0);
        slow.start().unwrap();
        slow.run(19);
        assert!(swipe_kinds(&slow).is_empty());

        let mut short = ScenarioRunner::with_hands(WristTrajectory::swipe(0.1, 0.0, 300.0).hands())
            .frame_interval(50.0);
        short.start().unwrap();
        short.run(7);
        assert!(swipe_kinds(&short).is_empty());
    }

    #[test]
    fn test_swipe_left_with_jitter() {
        let trajectory = WristTrajectory::swipe(-0.2, 0.0, 300.0).with_jitter(42, 0.004);
        let mut runner = ScenarioRunner::with_hands(trajectory.hands()).frame_interval(50.0);
        runner.start().unwrap();
        runner.run(7);

        assert_eq!(swipe_kinds(&runner), vec![GestureKind::SwipeLeft]);
    }

    #[test]
    fn test_swipe_cooldown_suppresses_close_swipes() {
        // Qualifying swipes complete at 300 ms and 600 ms
        let xs: Vec<f64> = std::iter::once(0.4)
            .chain(ramp(0.4, 0.6, 6))
            .chain(ramp(0.6, 0.8, 6))
            .collect();
        let mut runner = ScenarioRunner::with_hands(wrist_path(xs)).frame_interval(50.0);
        runner.start().unwrap();
        runner.run(13);

        assert_eq!(swipe_kinds(&runner), vec![GestureKind::SwipeRight]);
    }

    #[test]
    fn test_swipe_cooldown_allows_spaced_swipes() {
        // Qualifying swipes complete at 300 ms and 800 ms
        let xs: Vec<f64> = std::iter::once(0.4)
            .chain(ramp(0.4, 0.6, 6))
            .chain([0.6; 4])
            .chain(ramp(0.6, 0.8, 6))
            .collect();
        let mut runner = ScenarioRunner::with_hands(wrist_path(xs)).frame_interval(50.0);
        runner.start().unwrap();
        runner.run(17);

        let swipes: Vec<f64> = runner
            .events()
            .iter()
            .filter(|e| e.kind == GestureKind::SwipeRight)
            .map(|e| e.timestamp)
            .collect();
        assert_eq!(swipes, vec![300.0, 800.0]);
    }

    #[test]
    fn test_empty_frames_emit_nothing() {
        let mut runner = ScenarioRunner::with_hands(vec![Vec::new(), Vec::new()]);
        runner.start().unwrap();
        let outcomes = runner.run(2);

        assert!(outcomes.iter().all(|o| o.report().map_or(false, |r| r.hands == 0)));
        assert!(runner.events().is_empty());
        assert!(runner.session().runtime_state().is_empty());
    }

    #[test]
    fn test_malformed_hand_is_skipped() {
        let mut runner = ScenarioRunner::with_hands(vec![
            vec![crate::truncated_hand(6)],
            vec![crate::truncated_hand(6)],
        ]);
        runner.start().unwrap();
        runner.run(2);

        assert!(runner.events().is_empty());
        assert!(runner.session().world().interaction().is_empty());
    }

    // ========================================================================
    // INTERACTION
    // ========================================================================

    #[test]
    fn test_hit_test_prefers_higher_z_index() {
        let mut runner = ScenarioRunner::with_hands(vec![vec![pointing(0.5, 0.5).build()]]);
        let high = add_rect(&mut runner, 0.5, 0.5);
        let low = add_rect(&mut runner, 0.5, 0.5);
        let world = runner.session_mut().world_mut();
        world
            .update_object(&high, ObjectPatch { z_index: Some(2), ..ObjectPatch::default() })
            .unwrap();
        world
            .update_object(&low, ObjectPatch { z_index: Some(1), ..ObjectPatch::default() })
            .unwrap();

        runner.start().unwrap();
        runner.run(1);
        assert_eq!(runner.session().world().interaction().selected(0), Some(high.as_str()));
    }

    #[test]
    fn test_grab_lifecycle() {
        let mut runner = ScenarioRunner::with_hands(vec![
            vec![pointing(0.5, 0.5).build()],
            vec![pointing(0.5, 0.5).pinched().build()],
            vec![pointing(0.55, 0.45).pinched().build()],
            vec![pointing(0.55, 0.45).build()],
            vec![pointing(0.75, 0.75).build()],
        ]);
        let id = add_rect(&mut runner, 0.5, 0.5);
        runner.start().unwrap();

        runner.run(2);
        let world = runner.session().world();
        assert_eq!(world.interaction().grabbed(0), Some(id.as_str()));
        assert_eq!(world.get(&id).unwrap().color.as_deref(), Some("#0a61f4"));

        runner.run(1);
        let object = runner.session().world().get(&id).unwrap();
        assert_eq!(object.position, Position::new(0.55, 0.45));

        runner.run(1);
        let world = runner.session().world();
        assert_eq!(world.interaction().grabbed(0), None);
        assert_eq!(world.interaction().selected(0), Some(id.as_str()));

        runner.run(1);
        let world = runner.session().world();
        assert_eq!(world.interaction().selected(0), None);
        let object = world.get(&id).unwrap();
        assert_eq!(object.position, Position::new(0.55, 0.45));
        assert_eq!(object.color.as_deref(), Some("#0a61f4"));
        assert_eq!(count(&runner, GestureKind::PinchStart), 1);
    }

    #[test]
    fn test_lost_hand_releases_grab_same_frame() {
        let left = pointing(0.25, 0.5);
        let right = pointing(0.75, 0.5);
        let mut runner = ScenarioRunner::with_hands(vec![
            vec![left.build(), right.build()],
            vec![left.build(), right.pinched().build()],
            vec![left.build()],
            vec![left.build(), right.translated(0.1, 0.1).build()],
        ]);
        add_rect(&mut runner, 0.25, 0.5);
        let grabbed = add_rect(&mut runner, 0.75, 0.5);
        runner.start().unwrap();

        runner.run(2);
        assert_eq!(
            runner.session().world().interaction().grabbed(1),
            Some(grabbed.as_str())
        );

        runner.run(1);
        let interaction = runner.session().world().interaction();
        assert_eq!(interaction.grabbed(1), None);
        assert_eq!(interaction.selected(1), None);
        assert!(interaction.selected(0).is_some());

        // The hand returns open: no grab, so the object stays put
        runner.run(1);
        let object = runner.session().world().get(&grabbed).unwrap();
        assert_eq!(object.position, Position::new(0.75, 0.5));
    }

    #[test]
    fn test_hand_index_reuse_is_literal() {
        // Hand 0 grabs; then hand 0 leaves and the other hand shifts into
        // index 0, inheriting the grab. The other hand stays pinched so the
        // shift doesn't read as a pinch-end.
        let grabber = pointing(0.25, 0.5);
        let other = pointing(0.7, 0.7).pinched();
        let mut runner = ScenarioRunner::with_hands(vec![
            vec![grabber.build(), other.build()],
            vec![grabber.pinched().build(), other.build()],
            vec![other.build()],
        ]);
        let id = add_rect(&mut runner, 0.25, 0.5);
        runner.start().unwrap();
        runner.run(3);

        let world = runner.session().world();
        assert_eq!(world.interaction().grabbed(0), Some(id.as_str()));
        assert_eq!(world.get(&id).unwrap().position, Position::new(0.7, 0.7));
    }

    #[test]
    fn test_swipe_resizes_hovered_object() {
        // The wrist swipes while the index tip stays over the object
        let hands: Vec<Vec<Hand>> = std::iter::once(0.4)
            .chain(ramp(0.4, 0.6, 6))
            .map(|x| vec![HandBuilder::wrist_at(x, 0.75).build()])
            .collect();
        let mut runner = ScenarioRunner::with_hands(hands).frame_interval(50.0);
        let id = runner
            .session_mut()
            .create_object(ObjectRequest::new(
                ObjectKind::Rect,
                Position::new(0.5, 0.5),
                Size::new(0.5, 0.5),
            ))
            .unwrap();
        runner.start().unwrap();
        runner.run(7);

        assert_eq!(count(&runner, GestureKind::SwipeRight), 1);
        let size = runner.session().world().get(&id).unwrap().size;
        assert!((size.width - 0.54).abs() < 1e-12);
        assert!((size.height - 0.54).abs() < 1e-12);
    }

    #[test]
    fn test_rejected_request_leaves_world_unchanged() {
        let mut runner = ScenarioRunner::with_hands(Vec::<Vec<Hand>>::new());
        let before = runner.session().snapshot();

        let result = runner.session_mut().create_object(ObjectRequest::new(
            ObjectKind::Model3d,
            Position::new(0.5, 0.5),
            Size::new(0.2, 0.2),
        ));
        assert!(result.is_err());
        assert_eq!(runner.session().snapshot(), before);
    }

    // ========================================================================
    // RUNTIME
    // ========================================================================

    #[test]
    fn test_latency_ema() {
        let mut runner = ScenarioRunner::with_responses([10.0, 20.0, 30.0].map(|latency| {
            ScriptedResponse::hands(Vec::new()).with_latency(latency)
        }))
        .frame_interval(100.0);
        runner.start().unwrap();

        let mut averages = Vec::new();
        for _ in 0..3 {
            runner.tick();
            averages.push(runner.session().latency().average_ms().unwrap());
        }

        assert_eq!(averages[0], 10.0);
        assert!((averages[1] - 11.0).abs() < 1e-9);
        assert!((averages[2] - 12.9).abs() < 1e-9);
        assert_eq!(runner.session().latency().last_ms(), Some(30.0));
    }

    #[test]
    fn test_in_flight_detection_drops_frames() {
        let hand = pointing(0.5, 0.5).build();
        let mut runner = ScenarioRunner::with_responses([
            ScriptedResponse::hands(vec![hand.clone()]).pending_for(2),
            ScriptedResponse::hands(vec![hand]),
        ]);
        runner.start().unwrap();

        let outcomes = runner.run(4);
        assert_eq!(outcomes[0], FrameOutcome::Dropped);
        assert_eq!(outcomes[1], FrameOutcome::Dropped);
        let report = outcomes[2].report().unwrap();
        assert_eq!(report.timestamp, 0.0);
        assert_eq!(report.latency_ms, 32.0);
        assert_eq!(outcomes[3].report().unwrap().timestamp, 48.0);

        assert_eq!(runner.detector_calls().begun, vec![0.0, 48.0]);
        assert_eq!(runner.session().stats().dropped_frames, 2);
    }

    #[test]
    fn test_detector_failure_freezes_recognition() {
        let mut runner = ScenarioRunner::with_responses([
            ScriptedResponse::hands(vec![pointing(0.5, 0.5).build()]),
            ScriptedResponse::failure("device lost"),
            ScriptedResponse::hands(vec![pointing(0.5, 0.5).pinched().build()]),
        ]);
        let id = add_rect(&mut runner, 0.5, 0.5);
        runner.start().unwrap();

        let outcomes = runner.run(4);
        assert_eq!(outcomes[1], FrameOutcome::DetectorFailed);
        assert_eq!(outcomes[2], FrameOutcome::AnimationOnly);
        assert_eq!(outcomes[3], FrameOutcome::AnimationOnly);

        let session = runner.session();
        assert_eq!(session.status(), RecognitionStatus::Disabled);
        assert_eq!(session.world().interaction().selected(0), Some(id.as_str()));
        assert_eq!(session.world().interaction().grabbed(0), None);
        assert_eq!(
            session.world().get(STATUS_DOT_ID).unwrap().color.as_deref(),
            Some("#ef4444")
        );
        assert_eq!(runner.detector_calls().begun.len(), 2);
        assert!(runner.scheduler().is_pending());
    }

    #[test]
    fn test_init_failure_still_animates() {
        let mut runner = ScenarioRunner::new(
            SessionConfig::default(),
            ScriptedDetector::from_hands(Vec::<Vec<Hand>>::new()).failing_init("no weights"),
        );
        assert!(runner.start().is_err());

        let outcomes = runner.run(3);
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|o| *o == FrameOutcome::AnimationOnly));
        assert!(runner.detector_calls().begun.is_empty());
        let dot = runner.session().world().get(STATUS_DOT_ID).unwrap();
        assert!(dot.rotation > 0.0);
    }

    #[test]
    fn test_teardown_stops_everything() {
        let mut runner = ScenarioRunner::with_hands(vec![vec![pointing(0.5, 0.5).build()]; 4]);
        add_rect(&mut runner, 0.5, 0.5);
        runner.start().unwrap();
        runner.run(2);
        assert!(!runner.session().runtime_state().is_empty());

        runner.session_mut().teardown();
        assert!(runner.tick().is_none());
        assert!(runner.session().runtime_state().is_empty());
        assert!(runner.session().world().interaction().is_empty());
        assert!(runner.detector_calls().closed);
        assert_eq!(runner.session_mut().on_frame(1000.0), FrameOutcome::Stopped);
    }

    #[test]
    fn test_event_log_keeps_recent_lines() {
        let mut config = SessionConfig::default();
        config.event_log_capacity = 3;
        let open = pointing(0.5, 0.5).build();
        let closed = pointing(0.5, 0.5).pinched().build();
        let frames: Vec<Vec<Hand>> = (0..10)
            .map(|i| vec![if i % 2 == 0 { open.clone() } else { closed.clone() }])
            .collect();
        let mut runner = ScenarioRunner::new(config, ScriptedDetector::from_hands(frames));
        runner.start().unwrap();
        runner.run(10);

        let log: Vec<&str> = runner.session().event_log().collect();
        assert_eq!(log.len(), 3);
        assert!(log[0].starts_with("pinch-start (hand 0) · pinchDistance="));
        assert!(log[1].starts_with("pinch-end (hand 0)"));
        assert_eq!(runner.session().stats().events_emitted, 9);
    }

    // ========================================================================
    // ANIMATION
    // ========================================================================

    #[test]
    fn test_idle_spin_skips_selected_objects() {
        let mut runner =
            ScenarioRunner::with_hands(vec![vec![pointing(0.25, 0.25).build()]; 5]);
        let world = runner.session_mut().world_mut();
        world.add_object(
            WorldObject::new("held", ObjectKind::Rect, Position::new(0.25, 0.25), Size::new(0.2, 0.2))
                .with_animation(Animation { enabled: None, spin_speed: Some(PI) }),
        );
        world.add_object(
            WorldObject::new("free", ObjectKind::Rect, Position::new(0.75, 0.75), Size::new(0.2, 0.2))
                .with_animation(Animation { enabled: None, spin_speed: Some(PI) }),
        );
        runner.start().unwrap();

        let mut previous = 0.0;
        for frame in 0..5 {
            runner.tick();
            let world = runner.session().world();
            assert_eq!(world.get("held").unwrap().rotation, 0.0);

            let rotation = world.get("free").unwrap().rotation;
            let expected = if frame == 0 { 0.0 } else { PI * 0.016 };
            assert!((rotation - previous - expected).abs() < 1e-9);
            assert!((0.0..TAU).contains(&rotation));
            previous = rotation;
        }
    }
}
