// SPDX-License-Identifier: MPL-2.0

//! Integration tests driving a viewfinder from a simulated scan source

use cosmic::iced::Size;
use std::sync::Arc;
use std::time::Duration;
use viewfinder::reader::SimulationSettings;
use viewfinder::viewfinder::reset_after;
use viewfinder::{
    CameraDimensions, HighlightState, ReaderEvent, ScanSource, SimulatedReader, ViewfinderBuilder,
    ViewfinderError, ViewfinderView,
};

fn fast_reader() -> Arc<SimulatedReader> {
    Arc::new(SimulatedReader::new(SimulationSettings {
        dimensions: Some(CameraDimensions::new(1280, 720)),
        format_detect_delay: Duration::ZERO,
        result_interval: Some(Duration::from_millis(10)),
        supports_video_orientation: true,
    }))
}

#[tokio::test]
async fn test_events_flow_from_reader_to_viewfinder() {
    let reader = fast_reader();
    let mut view = ViewfinderView::new();
    view.setup_components(ViewfinderBuilder::new(reader.clone()).show_torch_button(true))
        .unwrap();
    view.set_bounds(Size::new(360.0, 640.0));

    let events = view.lifecycle_events().expect("reader registers a channel");
    reader.start_scanning();

    let mut tickets = Vec::new();
    {
        let mut events = events.lock().await;
        while tickets.len() < 2 {
            let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
                .await
                .expect("reader stalled")
                .expect("channel closed");
            if let Some(ticket) = view.handle_event(event).unwrap() {
                tickets.push(ticket);
            }
        }
    }

    // Preview was aspect-filled into the container once the capture format arrived
    let frame = view.preview_frame().expect("preview fitted");
    assert!((frame.height - 640.0).abs() < 0.1);
    assert!((frame.width - 1137.78).abs() < 0.1);
    assert_eq!(reader.preview_frame(), Some(frame));

    // Second simulated result is rejected
    assert_eq!(view.highlight_state(), HighlightState::Wrong);

    // Only the newest ticket reverts the highlight
    let first = reset_after(tickets[0]).await;
    assert!(!view.reset_border(first));
    let second = reset_after(tickets[1]).await;
    assert!(view.reset_border(second));
    assert_eq!(view.highlight_state(), HighlightState::Normal);

    view.cancel().unwrap();
    assert!(!reader.is_running());
}

#[tokio::test]
async fn test_stop_is_reported_after_cancel() {
    let reader = Arc::new(SimulatedReader::new(SimulationSettings {
        result_interval: None,
        format_detect_delay: Duration::ZERO,
        ..Default::default()
    }));
    let mut view = ViewfinderView::new();
    view.setup_components(ViewfinderBuilder::new(reader.clone()))
        .unwrap();

    let events = view.lifecycle_events().unwrap();
    reader.start_scanning();
    view.cancel().unwrap();

    let mut events = events.lock().await;
    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    assert_eq!(seen.first(), Some(&ReaderEvent::DidStartScanning));
    assert_eq!(seen.last(), Some(&ReaderEvent::DidStopScanning));
}

#[test]
fn test_detached_viewfinder_stops_listening() {
    let reader = fast_reader();
    let mut view = ViewfinderView::new();
    view.setup_components(ViewfinderBuilder::new(reader.clone()))
        .unwrap();
    assert!(reader.has_listener());

    view.detach();
    assert!(!reader.has_listener());
    assert_eq!(view.toggle_torch(), Err(ViewfinderError::ReaderGone));
}

#[test]
fn test_missing_format_is_reported() {
    let mut view = ViewfinderView::new();
    view.setup_components(ViewfinderBuilder::default()).unwrap();
    view.set_bounds(Size::new(200.0, 200.0));

    let result = view.handle_event(ReaderEvent::CameraInputDimensions(None));
    assert!(matches!(result, Err(ViewfinderError::Unsupported(_))));
    assert!(view.preview_frame().is_none());
}
