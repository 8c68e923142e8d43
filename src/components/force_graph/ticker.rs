//! Repeating frame schedules.
//!
//! A frame callback returns `true` to be called again on the next frame and
//! `false` to end the schedule.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

/// One scheduled frame.
pub type FrameCallback = Box<dyn FnMut() -> bool>;

/// Drives a [`FrameCallback`] once per display frame.
pub trait Ticker {
	/// Replace any current schedule with `frame`.
	fn start(&mut self, frame: FrameCallback);
	/// Cancel the schedule. No callback fires after this returns.
	fn stop(&mut self);
	/// True while a callback is scheduled.
	fn is_running(&self) -> bool;
}

#[derive(Default)]
struct ManualSchedule {
	frame: Option<FrameCallback>,
	generation: u64,
}

/// Frames are delivered only when the host calls [`ManualTicker::advance`].
/// Clones share one schedule.
#[derive(Clone, Default)]
pub struct ManualTicker {
	inner: Rc<RefCell<ManualSchedule>>,
}

impl ManualTicker {
	/// Deliver one frame. Returns whether a callback ran.
	pub fn advance(&self) -> bool {
		let (mut frame, generation) = {
			let mut inner = self.inner.borrow_mut();
			match inner.frame.take() {
				Some(frame) => (frame, inner.generation),
				None => return false,
			}
		};

		let again = frame();

		let mut inner = self.inner.borrow_mut();
		if again && inner.generation == generation && inner.frame.is_none() {
			inner.frame = Some(frame);
		}
		true
	}

	/// Deliver up to `frames` frames, returning how many callbacks ran.
	pub fn advance_by(&self, frames: usize) -> usize {
		(0..frames).take_while(|_| self.advance()).count()
	}
}

impl Ticker for ManualTicker {
	fn start(&mut self, frame: FrameCallback) {
		let mut inner = self.inner.borrow_mut();
		inner.generation += 1;
		inner.frame = Some(frame);
	}

	fn stop(&mut self) {
		let mut inner = self.inner.borrow_mut();
		inner.generation += 1;
		inner.frame = None;
	}

	fn is_running(&self) -> bool {
		self.inner.borrow().frame.is_some()
	}
}

#[derive(Default)]
struct FrameLoop {
	closure: Option<Closure<dyn FnMut()>>,
	request_id: Option<i32>,
	running: bool,
}

fn request_frame(closure: &Closure<dyn FnMut()>) -> Option<i32> {
	let window = web_sys::window()?;
	match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
		Ok(id) => Some(id),
		Err(err) => {
			log::warn!("requestAnimationFrame failed: {err:?}");
			None
		}
	}
}

/// Browser schedule on `requestAnimationFrame`.
#[derive(Default)]
pub struct AnimationFrameTicker {
	inner: Rc<RefCell<FrameLoop>>,
}

impl Ticker for AnimationFrameTicker {
	fn start(&mut self, mut frame: FrameCallback) {
		self.stop();

		let inner = Rc::clone(&self.inner);
		let closure = Closure::<dyn FnMut()>::new(move || {
			inner.borrow_mut().request_id = None;
			let again = frame();
			let mut frame_loop = inner.borrow_mut();
			if !(again && frame_loop.running) {
				frame_loop.running = false;
				return;
			}
			let next = frame_loop.closure.as_ref().and_then(request_frame);
			frame_loop.running = next.is_some();
			frame_loop.request_id = next;
		});

		let mut frame_loop = self.inner.borrow_mut();
		frame_loop.request_id = request_frame(&closure);
		frame_loop.running = frame_loop.request_id.is_some();
		frame_loop.closure = Some(closure);
	}

	fn stop(&mut self) {
		let mut frame_loop = self.inner.borrow_mut();
		if let Some(id) = frame_loop.request_id.take() {
			if let Some(window) = web_sys::window() {
				let _ = window.cancel_animation_frame(id);
			}
		}
		frame_loop.running = false;
		// Dropping the closure also breaks its reference cycle with `inner`.
		frame_loop.closure = None;
	}

	fn is_running(&self) -> bool {
		self.inner.borrow().running
	}
}

impl Drop for AnimationFrameTicker {
	fn drop(&mut self) {
		self.stop();
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;

	use super::*;

	#[test]
	fn test_runs_until_callback_declines() {
		let mut ticker = ManualTicker::default();
		let calls = Rc::new(Cell::new(0));
		let counter = Rc::clone(&calls);
		ticker.start(Box::new(move || {
			counter.set(counter.get() + 1);
			counter.get() < 3
		}));

		assert!(ticker.is_running());
		assert_eq!(ticker.advance_by(10), 3);
		assert_eq!(calls.get(), 3);
		assert!(!ticker.is_running());
		assert!(!ticker.advance());
	}

	#[test]
	fn test_stop_cancels_pending_frames() {
		let mut ticker = ManualTicker::default();
		let calls = Rc::new(Cell::new(0));
		let counter = Rc::clone(&calls);
		ticker.start(Box::new(move || {
			counter.set(counter.get() + 1);
			true
		}));

		ticker.advance_by(2);
		ticker.stop();
		assert_eq!(ticker.advance_by(5), 0);
		assert_eq!(calls.get(), 2);
	}

	#[test]
	fn test_restart_replaces_schedule() {
		let mut ticker = ManualTicker::default();
		let first = Rc::new(Cell::new(0));
		let second = Rc::new(Cell::new(0));
		let (a, b) = (Rc::clone(&first), Rc::clone(&second));
		ticker.start(Box::new(move || {
			a.set(a.get() + 1);
			true
		}));
		ticker.advance();
		ticker.start(Box::new(move || {
			b.set(b.get() + 1);
			true
		}));
		ticker.advance_by(4);
		assert_eq!((first.get(), second.get()), (1, 4));
	}

	#[test]
	fn test_clones_share_schedule() {
		let mut ticker = ManualTicker::default();
		let driver = ticker.clone();
		ticker.start(Box::new(|| true));
		assert!(driver.advance());
		ticker.stop();
		assert!(!driver.advance());
	}
}
