// SPDX-License-Identifier: MPL-2.0

//! Simulated scan source
//!
//! Reports a fixed capture format and alternates valid/invalid scan results
//! from a background thread, the way a real capture thread would. Used by
//! the demo application and by tests. Everything the viewfinder pushes into
//! it is recorded so it can be inspected.

use super::{LifecycleSender, PreviewConnection, ReaderEvent, ScanResult, ScanSource};
use crate::constants::simulation;
use crate::geometry::{CameraDimensions, NormalizedRect};
use crate::orientation::VideoOrientation;
use cosmic::iced::Rectangle;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Timing and format of the simulated capture session
#[derive(Debug, Clone)]
pub struct SimulationSettings {
    /// Reported capture format; `None` simulates a failed format detection
    pub dimensions: Option<CameraDimensions>,
    /// Delay between session start and the format report
    pub format_detect_delay: Duration,
    /// Interval between scan results; `None` disables results
    pub result_interval: Option<Duration>,
    /// Whether the preview connection can rotate
    pub supports_video_orientation: bool,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        let (width, height) = simulation::DEFAULT_RESOLUTION;
        Self {
            dimensions: Some(CameraDimensions::new(width, height)),
            format_detect_delay: simulation::FORMAT_DETECT_DELAY,
            result_interval: Some(simulation::RESULT_INTERVAL),
            supports_video_orientation: true,
        }
    }
}

/// Values pushed into the reader by its consumer
#[derive(Debug, Default)]
struct SimulatedState {
    video_orientation: VideoOrientation,
    rect_of_interest: Option<NormalizedRect>,
    preview_frame: Option<Rectangle>,
    torch_on: bool,
    device_index: usize,
    capture_thread: Option<JoinHandle<()>>,
}

/// Scan source backed by a timer thread instead of a camera
pub struct SimulatedReader {
    settings: SimulationSettings,
    running: Arc<AtomicBool>,
    listener: Arc<Mutex<Option<LifecycleSender>>>,
    state: Mutex<SimulatedState>,
}

impl SimulatedReader {
    pub fn new(settings: SimulationSettings) -> Self {
        Self {
            settings,
            running: Arc::new(AtomicBool::new(false)),
            listener: Arc::new(Mutex::new(None)),
            state: Mutex::new(SimulatedState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, SimulatedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether a lifecycle listener is registered
    pub fn has_listener(&self) -> bool {
        self.listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Last region of interest pushed by the consumer
    pub fn rect_of_interest(&self) -> Option<NormalizedRect> {
        self.state().rect_of_interest
    }

    /// Last preview frame pushed by the consumer
    pub fn preview_frame(&self) -> Option<Rectangle> {
        self.state().preview_frame
    }

    /// Current video orientation of the preview connection
    pub fn video_orientation(&self) -> VideoOrientation {
        self.state().video_orientation
    }

    pub fn torch_on(&self) -> bool {
        self.state().torch_on
    }

    /// Index of the simulated capture device (toggles between 0 and 1)
    pub fn device_index(&self) -> usize {
        self.state().device_index
    }
}

impl Default for SimulatedReader {
    fn default() -> Self {
        Self::new(SimulationSettings::default())
    }
}

impl ScanSource for SimulatedReader {
    fn start_scanning(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            debug!("Simulated reader already running");
            return;
        }

        info!(dimensions = ?self.settings.dimensions, "Starting simulated capture session");

        let running = Arc::clone(&self.running);
        let listener = Arc::clone(&self.listener);
        let settings = self.settings.clone();
        let handle = thread::spawn(move || capture_loop(settings, running, listener));

        self.state().capture_thread = Some(handle);
    }

    /// Joins the capture thread on the calling thread
    ///
    /// The loop checks the stop flag every `POLL_INTERVAL`, so this blocks the
    /// caller (the UI loop in the demo) for at most that long.
    fn stop_scanning(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }

        info!("Stopping simulated capture session");
        let handle = self.state().capture_thread.take();
        if let Some(handle) = handle
            && handle.join().is_err()
        {
            warn!("Simulated capture thread panicked");
        }
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn set_lifecycle_listener(&self, listener: Option<LifecycleSender>) {
        debug!(registered = listener.is_some(), "Lifecycle listener changed");
        *self.listener.lock().unwrap_or_else(PoisonError::into_inner) = listener;
    }

    fn preview_connection(&self) -> Option<PreviewConnection> {
        Some(PreviewConnection {
            supports_video_orientation: self.settings.supports_video_orientation,
            video_orientation: self.state().video_orientation,
        })
    }

    fn set_video_orientation(&self, orientation: VideoOrientation) {
        self.state().video_orientation = orientation;
    }

    fn set_rect_of_interest(&self, rect: NormalizedRect) {
        self.state().rect_of_interest = Some(rect);
    }

    fn set_preview_frame(&self, frame: Rectangle) {
        self.state().preview_frame = Some(frame);
    }

    fn switch_device_input(&self) {
        let mut state = self.state();
        state.device_index = (state.device_index + 1) % 2;
        info!(device = state.device_index, "Switched simulated capture device");
    }

    fn toggle_torch(&self) {
        let mut state = self.state();
        state.torch_on = !state.torch_on;
        info!(torch_on = state.torch_on, "Toggled simulated torch");
    }
}

/// Stops and joins a running capture thread, see `stop_scanning`
impl Drop for SimulatedReader {
    fn drop(&mut self) {
        self.stop_scanning();
    }
}

fn emit(listener: &Mutex<Option<LifecycleSender>>, event: ReaderEvent) {
    let guard = listener.lock().unwrap_or_else(PoisonError::into_inner);
    match guard.as_ref() {
        // A closed receiver only means the viewfinder went away
        Some(sender) => {
            let _ = sender.send(event);
        }
        None => debug!(?event, "No lifecycle listener, dropping event"),
    }
}

/// Sleep in small steps so a stop request is honored promptly
///
/// Returns false if the session was stopped while sleeping.
fn sleep_while_running(running: &AtomicBool, duration: Duration) -> bool {
    let mut remaining = duration;
    while !remaining.is_zero() {
        if !running.load(Ordering::SeqCst) {
            return false;
        }
        let step = remaining.min(simulation::POLL_INTERVAL);
        thread::sleep(step);
        remaining -= step;
    }
    running.load(Ordering::SeqCst)
}

fn capture_loop(
    settings: SimulationSettings,
    running: Arc<AtomicBool>,
    listener: Arc<Mutex<Option<LifecycleSender>>>,
) {
    emit(&listener, ReaderEvent::DidStartScanning);

    if sleep_while_running(&running, settings.format_detect_delay) {
        emit(
            &listener,
            ReaderEvent::CameraInputDimensions(settings.dimensions),
        );

        let mut count = 0u64;
        while let Some(interval) = settings.result_interval {
            if !sleep_while_running(&running, interval) {
                break;
            }
            count += 1;
            // Every other result fails validation
            let result = ScanResult {
                value: format!("SIMULATED-{:04}", count),
                valid: count % 2 == 1,
            };
            debug!(value = %result.value, valid = result.valid, "Simulated scan result");
            emit(&listener, ReaderEvent::ScanCompleted(result));
        }

        // Results disabled: idle until stopped
        while sleep_while_running(&running, simulation::POLL_INTERVAL) {}
    }

    emit(&listener, ReaderEvent::DidStopScanning);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    fn fast_settings() -> SimulationSettings {
        SimulationSettings {
            dimensions: Some(CameraDimensions::new(640, 480)),
            format_detect_delay: Duration::ZERO,
            result_interval: Some(Duration::from_millis(5)),
            supports_video_orientation: true,
        }
    }

    #[test]
    fn test_session_reports_lifecycle_in_order() {
        let reader = SimulatedReader::new(fast_settings());
        let (tx, mut rx) = unbounded_channel();
        reader.set_lifecycle_listener(Some(tx));

        reader.start_scanning();
        assert!(reader.is_running());

        assert_eq!(rx.blocking_recv(), Some(ReaderEvent::DidStartScanning));
        assert_eq!(
            rx.blocking_recv(),
            Some(ReaderEvent::CameraInputDimensions(Some(
                CameraDimensions::new(640, 480)
            )))
        );
        match rx.blocking_recv() {
            Some(ReaderEvent::ScanCompleted(result)) => {
                assert!(result.valid);
                assert_eq!(result.value, "SIMULATED-0001");
            }
            other => panic!("Expected scan result, got {:?}", other),
        }
        match rx.blocking_recv() {
            Some(ReaderEvent::ScanCompleted(result)) => assert!(!result.valid),
            other => panic!("Expected scan result, got {:?}", other),
        }

        reader.stop_scanning();
        assert!(!reader.is_running());

        // Drain until the stop notification
        let mut saw_stop = false;
        while let Ok(event) = rx.try_recv() {
            if event == ReaderEvent::DidStopScanning {
                saw_stop = true;
            }
        }
        assert!(saw_stop);
    }

    #[test]
    fn test_failed_format_detection_reports_none() {
        let reader = SimulatedReader::new(SimulationSettings {
            dimensions: None,
            result_interval: None,
            ..fast_settings()
        });
        let (tx, mut rx) = unbounded_channel();
        reader.set_lifecycle_listener(Some(tx));
        reader.start_scanning();

        assert_eq!(rx.blocking_recv(), Some(ReaderEvent::DidStartScanning));
        assert_eq!(
            rx.blocking_recv(),
            Some(ReaderEvent::CameraInputDimensions(None))
        );
        reader.stop_scanning();
    }

    #[test]
    fn test_records_consumer_updates() {
        let reader = SimulatedReader::default();
        reader.set_rect_of_interest(NormalizedRect::ZERO);
        reader.set_video_orientation(VideoOrientation::LandscapeLeft);
        reader.toggle_torch();
        reader.switch_device_input();

        assert_eq!(reader.rect_of_interest(), Some(NormalizedRect::ZERO));
        assert_eq!(reader.video_orientation(), VideoOrientation::LandscapeLeft);
        assert!(reader.torch_on());
        assert_eq!(reader.device_index(), 1);
        assert_eq!(
            reader.preview_connection().map(|c| c.video_orientation),
            Some(VideoOrientation::LandscapeLeft)
        );
    }
}
