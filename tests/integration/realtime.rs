//! Realtime integration tests
//!
//! The driver runs on its own thread, paced by sleeps, while the test
//! thread starts and stops automation concurrently.

use crate::helpers::*;
use cadenza::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

struct AudioThread {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl AudioThread {
    fn spawn(mut driver: RenderDriver) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();
        let handle = thread::spawn(move || {
            while flag.load(Ordering::Acquire) {
                driver
                    .process(256, Some(HostTime::now()))
                    .expect("Render cycle failed");
                thread::sleep(Duration::from_millis(1));
            }
        });
        Self {
            running,
            handle: Some(handle),
        }
    }
}

impl Drop for AudioThread {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            handle.join().expect("Audio thread panicked");
        }
    }
}

#[test]
fn test_automation_reaches_running_driver() {
    let engine = test_engine();
    let _audio = AudioThread::spawn(engine.take_driver().unwrap());

    assert!(wait_for(2000, || engine
        .render_clock()
        .last_render_sample_time()
        .is_some()));

    let mut gain = AutomatedParameter::new(engine.clone(), GAIN);
    gain.automate(&[AutomationEvent::jump(0.9, 0.0)], TimeAnchor::Unspecified)
        .unwrap();

    assert!(wait_for(2000, || value(&engine, GAIN) == 0.9));
}

#[test]
fn test_host_time_anchor_on_running_driver() {
    let engine = test_engine();
    let _audio = AudioThread::spawn(engine.take_driver().unwrap());

    assert!(wait_for(2000, || engine.render_clock().host_time().is_some()));

    let mut gain = AutomatedParameter::new(engine.clone(), GAIN);
    let start = HostTime(HostTime::now().ticks() + 20_000_000);
    gain.automate(
        &[AutomationEvent::jump(0.4, 0.0)],
        TimeAnchor::HostTime(start),
    )
    .unwrap();

    assert!(gain.is_automating());
    assert!(wait_for(2000, || value(&engine, GAIN) == 0.4));
}

#[test]
fn test_churn_while_rendering() {
    let engine = test_engine();
    let _audio = AudioThread::spawn(engine.take_driver().unwrap());

    let mut gain = AutomatedParameter::new(engine.clone(), GAIN);
    for i in 0..200 {
        let target = (i % 10) as f32 / 10.0;
        gain.ramp(target, 0.001, 0.0).unwrap();
        if i % 3 == 0 {
            gain.stop_automation();
        }
        assert!(engine.observer_count() <= 1);
    }

    gain.stop_automation();
    assert_eq!(engine.observer_count(), 0);

    gain.ramp(0.5, 0.0, 0.0).unwrap();
    assert!(wait_for(2000, || value(&engine, GAIN) == 0.5));
}
