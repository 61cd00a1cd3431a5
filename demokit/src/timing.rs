use std::collections::VecDeque;
use std::time::{Duration, Instant};


const FRAMERATE_WINDOW: usize = 60;


/// Timing of frames that actually drew. Idle iterations are not counted.
#[derive(Debug, Clone, Default)]
pub struct FrameTiming {
	start: Option<Instant>,
	last: Option<Instant>,
	delta: Duration,
	recent: VecDeque<Duration>,
}

impl FrameTiming {
	pub fn new() -> FrameTiming {
		FrameTiming::default()
	}

	/// Records the end of a frame.
	pub fn tick(&mut self, now: Instant) {
		self.start.get_or_insert(now);

		if let Some(last) = self.last {
			self.delta = now.saturating_duration_since(last);

			if self.recent.len() == FRAMERATE_WINDOW {
				self.recent.pop_front();
			}

			self.recent.push_back(self.delta);
		}

		self.last = Some(now);
	}

	/// Seconds between the first and the latest timed frame.
	pub fn time(&self) -> f64 {
		match (self.start, self.last) {
			(Some(start), Some(last)) => last.saturating_duration_since(start).as_secs_f64(),
			_ => 0.0,
		}
	}

	pub fn delta(&self) -> Duration {
		self.delta
	}

	/// Frames per second averaged over the last 60 frames. Zero until two frames have been timed.
	pub fn framerate(&self) -> f32 {
		let total: Duration = self.recent.iter().sum();

		if total.is_zero() {
			return 0.0
		}

		self.recent.len() as f32 / total.as_secs_f32()
	}

	pub fn average_frame_ms(&self) -> f32 {
		let framerate = self.framerate();

		if framerate > 0.0 {
			1000.0 / framerate
		} else {
			0.0
		}
	}
}



#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn untimed_is_zero() {
		let timing = FrameTiming::new();
		assert_eq!(timing.time(), 0.0);
		assert_eq!(timing.framerate(), 0.0);
		assert_eq!(timing.average_frame_ms(), 0.0);
	}

	#[test]
	fn steady_frames_average_out() {
		let mut timing = FrameTiming::new();
		let start = Instant::now();

		for frame in 0..11 {
			timing.tick(start + Duration::from_millis(frame * 20));
		}

		assert!((timing.framerate() - 50.0).abs() < 0.01);
		assert!((timing.average_frame_ms() - 20.0).abs() < 0.01);
		assert!((timing.time() - 0.2).abs() < 1e-9);
		assert_eq!(timing.delta(), Duration::from_millis(20));
	}

	#[test]
	fn only_recent_frames_count() {
		let mut timing = FrameTiming::new();
		let mut now = Instant::now();
		timing.tick(now);

		// One slow frame, then a full window of fast ones pushes it out.
		now += Duration::from_secs(1);
		timing.tick(now);

		for _ in 0..FRAMERATE_WINDOW {
			now += Duration::from_millis(10);
			timing.tick(now);
		}

		assert!((timing.framerate() - 100.0).abs() < 0.01);
	}
}
