use crate::FrameHost;

use std::cell::Cell;


/// Something the [`FrameHost`] draws once per frame for as long as it reports itself active.
///
/// Renderables are owned by the host from the moment they are registered. The host drops a
/// renderable during the first sweep that finds it inactive, without drawing it again, so one that
/// deactivates itself inside [`draw`](Renderable::draw) is still drawn that frame and gone the next.
///
/// `draw` receives the host itself. Besides reaching the UI context and fonts, this lets a
/// renderable call [`FrameHost::close`] to end the run loop, or register more renderables which
/// start drawing from the next frame. Closing the host from a leaf is an intentional escape hatch
/// for demos with an in-window quit affordance; it does not deactivate the renderable that asked.
pub trait Renderable {
	fn draw(&mut self, host: &mut FrameHost);

	fn activity(&self) -> &Activity;

	/// Must be free of side effects, the host queries it once per sweep.
	fn is_active(&self) -> bool {
		self.activity().is_active()
	}

	/// Asks to be removed. There is no way back.
	fn deactivate(&mut self) {
		self.activity().deactivate();
	}
}


/// One-way activity flag, starts active. Once cleared it stays cleared.
#[derive(Debug)]
pub struct Activity {
	active: Cell<bool>,
}

impl Activity {
	pub fn new() -> Activity {
		Activity { active: Cell::new(true) }
	}

	pub fn is_active(&self) -> bool {
		self.active.get()
	}

	pub fn deactivate(&self) {
		self.active.set(false);
	}
}



#[cfg(test)]
mod test {
	use super::*;

	struct Leaf {
		activity: Activity,
	}

	impl Renderable for Leaf {
		fn draw(&mut self, _: &mut FrameHost) {}
		fn activity(&self) -> &Activity { &self.activity }
	}

	#[test]
	fn activity_only_goes_one_way() {
		let activity = Activity::new();
		assert!(activity.is_active());

		activity.deactivate();
		assert!(!activity.is_active());

		activity.deactivate();
		assert!(!activity.is_active());
	}

	#[test]
	fn deactivated_renderable_stays_inactive() {
		let mut leaf = Leaf { activity: Activity::new() };
		assert!(leaf.is_active());

		leaf.deactivate();
		assert!(!leaf.is_active());

		let view: &dyn Renderable = &leaf;
		view.activity().deactivate();
		assert!(!view.is_active());
		assert!(!leaf.activity().is_active());
	}
}
