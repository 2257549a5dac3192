//! Integration tests for publish, dispatch, and the event journal.

use serde_json::json;

use playtrack_core::events::taxonomy;
use playtrack_plugin::RecordingState;

use crate::helpers::{self, Call, Fault, Spy};

#[test]
fn test_unknown_event_is_rejected_and_not_recorded() {
    let framework = helpers::isolated();
    let spy = Spy::named("Foo");
    framework.register_plugin(&spy.factory()).expect("registered");

    assert!(!framework.publish_event("not_a_player_event", json!([1])));
    assert!(framework.recorded_events().is_empty());
    assert!(helpers::events(&spy.log()).is_empty());
}

#[test]
fn test_journal_keeps_first_entries_up_to_capacity() {
    let cap = 3;
    let framework = helpers::isolated_with_capacity(cap);
    let spy = Spy::named("Foo");
    framework.register_plugin(&spy.factory()).expect("registered");

    let published = [
        taxonomy::VIDEO_PLAY_REQUESTED,
        taxonomy::VIDEO_PLAYING,
        taxonomy::VIDEO_PAUSE_REQUESTED,
        taxonomy::VIDEO_PAUSED,
        taxonomy::VIDEO_PLAYING,
    ];
    for (n, event) in published.iter().enumerate() {
        assert!(framework.publish_event(event, json!([n])));
        let expected = (n + 1).min(cap);
        assert_eq!(framework.recorded_events().len(), expected);
    }

    let recorded: Vec<String> = framework
        .recorded_events()
        .into_iter()
        .map(|e| e.event_name)
        .collect();
    assert_eq!(recorded, published[..cap].to_vec());
    assert_eq!(framework.recording_state(), RecordingState::Stopped);

    // Dispatch never depends on the journal.
    assert_eq!(helpers::events(&spy.log()).len(), published.len());

    framework.flush_recorded_events();
    framework.start_recording_events();
    assert!(framework.publish_event(taxonomy::VIDEO_REPLAY_REQUESTED, json!([])));
    assert_eq!(framework.recorded_events().len(), 1);
}

#[test]
fn test_failing_plugin_does_not_block_later_plugins() {
    for fault in [Fault::EventError, Fault::EventPanic] {
        let framework = helpers::isolated();
        let broken = Spy::named("Broken").fault(fault);
        let healthy = Spy::named("Healthy");
        framework.register_plugin(&broken.factory()).expect("broken");
        framework.register_plugin(&healthy.factory()).expect("healthy");

        assert!(framework.publish_event(taxonomy::VOLUME_CHANGED, json!([0.25])));
        assert!(framework.publish_event(taxonomy::VIDEO_PAUSED, json!([])));

        assert_eq!(
            helpers::events(&healthy.log()),
            vec![taxonomy::VOLUME_CHANGED, taxonomy::VIDEO_PAUSED]
        );
        assert_eq!(helpers::events(&broken.log()).len(), 2);
        assert_eq!(framework.plugin_count(), 2);
    }
}

#[test]
fn test_inactive_plugin_is_skipped_but_still_listed() {
    let framework = helpers::isolated();
    let spy = Spy::named("Foo");
    let id = framework.register_plugin(&spy.factory()).expect("registered");

    assert!(framework.make_plugin_inactive(&id));
    assert!(!framework.is_plugin_active(&id));
    framework.publish_event(taxonomy::VIDEO_PLAYING, json!([]));

    assert!(helpers::events(&spy.log()).is_empty());
    assert_eq!(framework.plugin_id_list(), vec![id.clone()]);

    assert!(framework.make_plugin_active(&id));
    framework.publish_event(taxonomy::VIDEO_PAUSED, json!([]));
    assert_eq!(helpers::events(&spy.log()), vec![taxonomy::VIDEO_PAUSED]);
}

#[test]
fn test_suspended_pipeline_drops_events() {
    let framework = helpers::isolated();
    let spy = Spy::named("Foo");
    framework.register_plugin(&spy.factory()).expect("registered");

    framework.stop_publishing_events();
    assert!(!framework.is_publishing());
    assert!(!framework.publish_event(taxonomy::VIDEO_PLAYING, json!([])));
    assert!(framework.recorded_events().is_empty());
    assert!(helpers::events(&spy.log()).is_empty());

    framework.resume_publishing_events();
    assert!(framework.publish_event(taxonomy::VIDEO_PLAYING, json!([])));
    assert_eq!(framework.recorded_events().len(), 1);
    assert_eq!(helpers::events(&spy.log()), vec![taxonomy::VIDEO_PLAYING]);
}

#[test]
fn test_plugin_can_publish_from_process_event() {
    let framework = helpers::isolated();
    let echo =
        Spy::named("Echo").echo(taxonomy::VIDEO_SEEK_REQUESTED, taxonomy::VIDEO_SEEK_COMPLETED);
    let watcher = Spy::named("Watcher");
    framework.register_plugin(&echo.factory()).expect("echo");
    framework.register_plugin(&watcher.factory()).expect("watcher");

    assert!(framework.publish_event(taxonomy::VIDEO_SEEK_REQUESTED, json!([42])));

    let recorded: Vec<String> = framework
        .recorded_events()
        .into_iter()
        .map(|e| e.event_name)
        .collect();
    assert_eq!(
        recorded,
        vec![taxonomy::VIDEO_SEEK_REQUESTED, taxonomy::VIDEO_SEEK_COMPLETED]
    );

    // The nested publish finishes before the outer one reaches the watcher.
    assert_eq!(
        helpers::events(&watcher.log()),
        vec![taxonomy::VIDEO_SEEK_COMPLETED, taxonomy::VIDEO_SEEK_REQUESTED]
    );
}

#[test]
fn test_params_reach_plugins_as_published() {
    let framework = helpers::isolated();
    let spy = Spy::named("Foo");
    framework.register_plugin(&spy.factory()).expect("registered");

    framework.publish_event(taxonomy::VIDEO_STREAM_POSITION_CHANGED, json!([12.5, 60]));
    framework.publish_event(taxonomy::VIDEO_PLAYING, json!({ "not": "an array" }));

    let calls = spy.log().lock().clone();
    assert_eq!(
        calls[1..],
        [
            Call::Event(
                taxonomy::VIDEO_STREAM_POSITION_CHANGED.to_string(),
                vec![json!(12.5), json!(60)]
            ),
            Call::Event(taxonomy::VIDEO_PLAYING.to_string(), Vec::new()),
        ]
    );
}
