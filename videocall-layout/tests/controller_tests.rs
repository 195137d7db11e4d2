/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 *
 * Unless you explicitly state otherwise, any contribution intentionally
 * submitted for inclusion in the work by you, as defined in the Apache-2.0
 * license, shall be dual licensed as above, without any additional terms or
 * conditions.
 */

//! Integration tests for the StreamLayoutController.
//!
//! These tests drive the controller the way a call screen does: push streams
//! and constraints, issue pin/fullscreen requests and observe the outputs.

use std::sync::{Arc, Mutex, OnceLock, Weak};
use std::time::Duration;
use videocall_layout::{
    LayoutKind, NoopMessageSink, PinError, StreamLayoutController, UserMessage, UserMessageSink,
};
use videocall_layout_types::{
    Callback, ConstraintOverrides, FeaturedState, StreamItem, StreamItemState,
    StreamLayoutConstraints, StreamLayoutSettings, StreamUi, UserInfo, VideoUi,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn camera(id: &str) -> StreamUi {
    StreamUi::new(id, UserInfo::new(format!("userId{id}"), format!("User {id}")))
        .with_video(VideoUi::camera(format!("video{id}")))
}

fn screen_share(id: &str) -> StreamUi {
    StreamUi::new(id, UserInfo::new(format!("userId{id}"), format!("User {id}")))
        .with_video(VideoUi::screen_share(format!("screen{id}")))
}

fn cameras(ids: &[&str]) -> Vec<StreamUi> {
    ids.iter().map(|id| camera(id)).collect()
}

fn ids(items: &[StreamItem]) -> Vec<&str> {
    items.iter().map(|item| item.id()).collect()
}

/// Group call controller with room for two pins and three thumbnails.
fn create_controller(messages: Arc<dyn UserMessageSink>) -> StreamLayoutController {
    init_logger();
    let controller =
        StreamLayoutController::new(messages).with_overrides(ConstraintOverrides::default());
    controller.apply_settings(StreamLayoutSettings {
        is_group_call: true,
        ..Default::default()
    });
    controller.apply_constraints(StreamLayoutConstraints::new(8, 2, 3));
    controller
}

fn create_default_controller() -> StreamLayoutController {
    create_controller(Arc::new(NoopMessageSink))
}

fn recording_sink() -> (Arc<Callback<UserMessage>>, Arc<Mutex<Vec<UserMessage>>>) {
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = {
        let received = received.clone();
        Callback::from(move |message: UserMessage| received.lock().unwrap().push(message))
    };
    (Arc::new(sink), received)
}

#[test]
fn test_controller_starts_in_auto_mode() {
    let controller = create_default_controller();
    assert_eq!(controller.current_mode(), LayoutKind::Auto);
    assert!(*controller.is_in_auto_mode().borrow());
    assert!(controller.current_stream_items().is_empty());
}

#[test]
fn test_auto_mode_renders_mosaic_for_group_call() {
    let controller = create_default_controller();
    controller.apply_streams(cameras(&["1", "2", "3"]));
    let items = controller.current_stream_items();
    assert_eq!(ids(&items), vec!["1", "2", "3"]);
    assert!(items.iter().all(|item| !item.is_featured()));
}

#[test]
fn test_pin_limit() {
    let controller = create_default_controller();
    controller.apply_streams(cameras(&["1", "2", "3", "4"]));

    assert!(controller.pin_stream("1", false, false));
    assert!(controller.pin_stream("2", false, false));
    assert!(
        !controller.pin_stream("3", false, false),
        "Third pin should be rejected with a limit of two"
    );
    assert_eq!(
        controller.try_pin_stream("3", false, false),
        Err(PinError::LimitReached { limit: 2 })
    );
    assert_eq!(controller.pinned_stream_ids(), vec!["1", "2"]);
    assert!(*controller.is_pinned_stream_limit_reached().borrow());

    let items = controller.current_stream_items();
    assert_eq!(ids(&items), vec!["1", "2", "3", "4"]);
    assert!(items[0].is_pinned());
    assert!(items[1].is_pinned());
    assert_eq!(items[2].state(), Some(StreamItemState::Standard));
}

#[test]
fn test_forced_pin_at_limit_evicts_oldest() {
    let controller = create_default_controller();
    controller.apply_streams(cameras(&["1", "2", "3"]));
    assert!(controller.pin_stream("1", false, false));
    assert!(controller.pin_stream("2", false, false));
    assert!(controller.pin_stream("3", false, true));
    assert_eq!(controller.pinned_stream_ids(), vec!["2", "3"]);
}

#[test]
fn test_rejected_pin_still_switches_to_manual() {
    let controller = create_default_controller();
    controller.apply_streams(cameras(&["1", "2"]));
    assert!(!controller.pin_stream("9", false, false));
    assert_eq!(controller.current_mode(), LayoutKind::Manual);
    assert!(!*controller.is_in_auto_mode().borrow());
    assert_eq!(ids(&controller.current_stream_items()), vec!["1", "2"]);
}

#[test]
fn test_fullscreen_precedence_and_restore() {
    let controller = create_default_controller();
    controller.apply_streams(cameras(&["1", "2", "3"]));
    assert!(controller.pin_stream("1", false, false));
    let pinned_items = controller.current_stream_items();

    controller.set_fullscreen_stream("2");
    let items = controller.current_stream_items();
    assert_eq!(items.len(), 1, "Fullscreen renders a single item");
    assert_eq!(items[0].id(), "2");
    assert_eq!(
        items[0].state(),
        Some(StreamItemState::Featured(FeaturedState::Fullscreen))
    );

    controller.clear_fullscreen_stream();
    assert_eq!(controller.current_stream_items(), pinned_items);
    assert_eq!(controller.current_mode(), LayoutKind::Manual);
}

#[test]
fn test_clearing_fullscreen_restores_auto_mode() {
    let controller = create_default_controller();
    controller.apply_streams(cameras(&["1", "2", "3"]));
    let auto_items = controller.current_stream_items();

    controller.set_fullscreen_stream("3");
    assert_eq!(controller.current_mode(), LayoutKind::Manual);
    controller.set_fullscreen_stream("1");
    assert_eq!(ids(&controller.current_stream_items()), vec!["1"]);

    controller.clear_fullscreen_stream();
    assert_eq!(controller.current_mode(), LayoutKind::Auto);
    assert!(*controller.is_in_auto_mode().borrow());
    assert_eq!(controller.current_stream_items(), auto_items);
}

#[test]
fn test_pins_made_during_fullscreen_are_shown_after_clearing() {
    let controller = create_default_controller();
    controller.apply_streams(cameras(&["1", "2", "3", "4"]));

    controller.set_fullscreen_stream("3");
    assert!(controller.pin_stream("1", false, false));
    assert!(controller.pin_stream("2", false, false));
    assert_eq!(ids(&controller.current_stream_items()), vec!["3"]);
    assert!(
        !*controller.is_pinned_stream_limit_reached().borrow(),
        "Pins hidden behind the fullscreen stream are not on screen"
    );

    controller.clear_fullscreen_stream();
    assert_eq!(controller.current_mode(), LayoutKind::Manual);
    let items = controller.current_stream_items();
    assert_eq!(ids(&items), vec!["1", "2", "3", "4"]);
    assert!(items[0].is_pinned());
    assert!(items[1].is_pinned());
    assert!(*controller.is_pinned_stream_limit_reached().borrow());
    assert_eq!(
        controller.try_pin_stream("4", false, false),
        Err(PinError::LimitReached { limit: 2 })
    );
}

#[test]
fn test_limit_flag_follows_shown_items_after_fullscreen_from_auto() {
    let controller = create_default_controller();
    controller.apply_streams(cameras(&["1", "2", "3"]));

    controller.set_fullscreen_stream("2");
    controller.clear_fullscreen_stream();

    assert_eq!(controller.current_mode(), LayoutKind::Auto);
    assert!(controller.pinned_stream_ids().is_empty());
    assert!(controller
        .current_stream_items()
        .iter()
        .all(|item| !item.is_pinned()));
    assert!(!*controller.is_pinned_stream_limit_reached().borrow());
}

#[test]
fn test_limit_flag_is_false_in_auto_mode() {
    let controller = create_default_controller();
    controller.apply_streams(cameras(&["1", "2", "3"]));
    assert!(controller.pin_stream("1", false, false));
    assert!(controller.pin_stream("2", false, false));
    assert!(*controller.is_pinned_stream_limit_reached().borrow());

    controller.switch_to_auto_mode();
    assert!(!*controller.is_pinned_stream_limit_reached().borrow());
}

#[test]
fn test_stream_removal_cleans_pins() {
    let controller = create_default_controller();
    controller.apply_streams(cameras(&["1"]));
    assert!(controller.pin_stream("1", false, false));
    assert_eq!(ids(&controller.current_stream_items()), vec!["1"]);

    controller.apply_streams(Vec::new());
    assert!(controller.current_stream_items().is_empty());
    assert!(controller.pinned_stream_ids().is_empty());

    controller.apply_streams(cameras(&["1", "2"]));
    assert!(
        controller.current_stream_items().iter().all(|item| !item.is_pinned()),
        "A returning stream must not come back pinned"
    );
}

#[test]
fn test_stream_removal_cleans_fullscreen() {
    let controller = create_default_controller();
    controller.apply_streams(cameras(&["1", "2"]));
    controller.set_fullscreen_stream("1");

    controller.apply_streams(cameras(&["2"]));
    assert_eq!(controller.fullscreen_stream_id(), None);
    assert_eq!(ids(&controller.current_stream_items()), vec!["2"]);
}

#[test]
fn test_mode_switch_resets_pins() {
    let controller = create_default_controller();
    controller.apply_streams(cameras(&["1", "2"]));
    assert!(controller.pin_stream("1", false, false));

    controller.switch_to_auto_mode();
    assert_eq!(controller.current_mode(), LayoutKind::Auto);
    controller.switch_to_manual_mode();
    assert_eq!(controller.current_mode(), LayoutKind::Manual);

    assert!(controller.pinned_stream_ids().is_empty());
    assert!(controller
        .current_stream_items()
        .iter()
        .all(|item| !item.is_featured()));
    assert!(!*controller.is_pinned_stream_limit_reached().borrow());
}

#[test]
fn test_unpin_keeps_mode() {
    let controller = create_default_controller();
    controller.apply_streams(cameras(&["1", "2"]));

    controller.unpin_stream("1");
    assert_eq!(controller.current_mode(), LayoutKind::Auto);

    assert!(controller.pin_stream("1", false, false));
    assert!(controller.pin_stream("2", false, false));
    controller.unpin_stream("1");
    assert_eq!(controller.current_mode(), LayoutKind::Manual);
    assert_eq!(controller.pinned_stream_ids(), vec!["2"]);

    controller.clear_pinned_streams();
    assert_eq!(controller.current_mode(), LayoutKind::Manual);
    assert!(controller.pinned_stream_ids().is_empty());
}

#[test]
fn test_screen_share_suggestion_sent_once() {
    let (sink, received) = recording_sink();
    let controller = create_controller(sink);
    controller.switch_to_manual_mode();

    controller.apply_streams(vec![camera("1"), screen_share("2")]);
    controller.apply_streams(vec![camera("1"), screen_share("2")]);
    controller.apply_streams(vec![camera("1"), screen_share("2"), camera("3")]);
    assert_eq!(
        *received.lock().unwrap(),
        vec![UserMessage::PinScreenShare {
            stream_id: "2".to_string(),
            username: "User 2".to_string(),
        }]
    );

    controller.apply_streams(vec![camera("1"), screen_share("2"), screen_share("4")]);
    let received = received.lock().unwrap();
    assert_eq!(received.len(), 2);
    assert_eq!(
        received[1],
        UserMessage::PinScreenShare {
            stream_id: "4".to_string(),
            username: "User 4".to_string(),
        }
    );
}

#[test]
fn test_no_screen_share_suggestion_in_auto_mode() {
    let (sink, received) = recording_sink();
    let controller = create_controller(sink);

    controller.apply_streams(vec![camera("1"), screen_share("2")]);
    assert!(received.lock().unwrap().is_empty());

    // Already known when manual mode starts.
    controller.switch_to_manual_mode();
    controller.apply_streams(vec![camera("1"), screen_share("2")]);
    assert!(received.lock().unwrap().is_empty());
}

#[test]
fn test_local_screen_share_is_not_suggested() {
    let (sink, received) = recording_sink();
    let controller = create_controller(sink);
    controller.switch_to_manual_mode();
    controller.apply_streams(vec![camera("1"), screen_share("2").mine()]);
    assert!(received.lock().unwrap().is_empty());
}

#[test]
fn test_sink_can_pin_suggested_screen_share() {
    init_logger();
    let controller_cell: Arc<OnceLock<Weak<StreamLayoutController>>> = Arc::new(OnceLock::new());
    let sink: Callback<UserMessage> = {
        let controller_cell = controller_cell.clone();
        Callback::from(move |message: UserMessage| {
            let UserMessage::PinScreenShare { stream_id, .. } = message;
            if let Some(controller) = controller_cell.get().and_then(Weak::upgrade) {
                controller.pin_stream(&stream_id, true, true);
            }
        })
    };
    let controller = Arc::new(create_controller(Arc::new(sink)));
    controller_cell
        .set(Arc::downgrade(&controller))
        .expect("cell set twice");

    controller.apply_streams(cameras(&["1", "2"]));
    assert!(controller.pin_stream("1", false, false));
    assert!(controller.pin_stream("2", false, false));

    let mut streams = cameras(&["1", "2"]);
    streams.push(screen_share("3"));
    controller.apply_streams(streams);

    assert_eq!(controller.pinned_stream_ids(), vec!["3", "1"]);
    let items = controller.current_stream_items();
    assert_eq!(items[0].id(), "3");
    assert!(items[0].is_pinned());
}

#[test]
fn test_constraint_overrides_replace_thresholds() {
    init_logger();
    let controller = StreamLayoutController::new(Arc::new(NoopMessageSink)).with_overrides(
        ConstraintOverrides {
            mosaic_stream_threshold: Some(2),
            ..Default::default()
        },
    );
    controller.apply_settings(StreamLayoutSettings {
        is_group_call: true,
        ..Default::default()
    });
    controller.apply_constraints(StreamLayoutConstraints::new(8, 2, 3));
    assert_eq!(controller.constraints(), StreamLayoutConstraints::new(2, 2, 3));

    controller.apply_streams(cameras(&["1", "2", "3"]));
    assert_eq!(ids(&controller.current_stream_items()), vec!["1", "more_streams"]);
}

#[test]
fn test_pip_constraints_hide_overflow() {
    let controller = create_default_controller();
    controller.apply_constraints(StreamLayoutConstraints::pip());
    controller.apply_streams(cameras(&["1", "2", "3"]));
    let items = controller.current_stream_items();
    assert_eq!(ids(&items), vec!["1", "hidden_streams"]);
    assert!(matches!(items[1], StreamItem::HiddenStreams { ref users } if users.len() == 2));
}

#[test]
fn test_negative_thresholds_degrade_gracefully() {
    let controller = create_default_controller();
    controller.apply_constraints(StreamLayoutConstraints::new(-3, -1, -2));
    controller.apply_streams(cameras(&["1", "2"]));
    assert!(controller.current_stream_items().is_empty());
    assert_eq!(
        controller.try_pin_stream("1", false, false),
        Err(PinError::PinningDisabled)
    );
    assert!(controller.current_stream_items().is_empty());
}

#[test]
fn test_controller_is_shareable_across_threads() {
    let controller = Arc::new(create_default_controller());
    controller.apply_streams(cameras(&["1", "2", "3", "4"]));

    let handles: Vec<_> = ["1", "2", "3", "4"]
        .into_iter()
        .map(|id| {
            let controller = controller.clone();
            std::thread::spawn(move || controller.pin_stream(id, false, false))
        })
        .collect();
    let pinned = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .filter(|pinned| *pinned)
        .count();

    assert_eq!(pinned, 2, "Exactly two pins fit under concurrent requests");
    assert_eq!(controller.pinned_stream_ids().len(), 2);
}

#[tokio::test]
async fn test_stream_items_receiver_wakes_on_change() {
    let controller = create_default_controller();
    let mut items = controller.stream_items();
    items.borrow_and_update();

    controller.apply_streams(cameras(&["1", "2"]));
    tokio::time::timeout(Duration::from_secs(1), items.changed())
        .await
        .expect("stream items did not change")
        .expect("controller dropped");
    assert_eq!(items.borrow_and_update().len(), 2);

    controller.apply_streams(cameras(&["1", "2"]));
    assert!(
        !items.has_changed().unwrap(),
        "Identical input must not notify observers"
    );
}

#[tokio::test]
async fn test_limit_reached_receiver() {
    let controller = create_default_controller();
    controller.apply_streams(cameras(&["1", "2", "3"]));
    let mut limit_reached = controller.is_pinned_stream_limit_reached();
    assert!(!*limit_reached.borrow_and_update());

    assert!(controller.pin_stream("1", false, false));
    assert!(!limit_reached.has_changed().unwrap());
    assert!(controller.pin_stream("2", false, false));
    limit_reached.changed().await.unwrap();
    assert!(*limit_reached.borrow_and_update());

    controller.unpin_stream("2");
    limit_reached.changed().await.unwrap();
    assert!(!*limit_reached.borrow());
}

#[tokio::test]
async fn test_auto_mode_receiver() {
    let controller = create_default_controller();
    let mut auto_mode = controller.is_in_auto_mode();
    assert!(*auto_mode.borrow_and_update());

    controller.switch_to_manual_mode();
    auto_mode.changed().await.unwrap();
    assert!(!*auto_mode.borrow_and_update());

    controller.switch_to_auto_mode();
    auto_mode.changed().await.unwrap();
    assert!(*auto_mode.borrow());
}
