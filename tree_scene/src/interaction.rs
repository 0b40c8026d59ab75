//! Interaction state — the single context object shared by the detection
//! and render loops.
//!
//! There is no global.  The detection side owns the only `&mut` and the
//! render side receives `&`, so the single-writer / single-reader contract is
//! held by the borrow checker rather than a lock.  Should detection ever move
//! to its own thread, this value must go behind a `Mutex` (or be sent as
//! snapshots); it is `Copy` to make snapshotting trivial.

use glam::Vec2;

use crate::object::ObjectId;

/// Arrangement the animation is currently heading for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Tree,
    Scatter,
    Focus,
}

impl Mode {
    pub fn name(self) -> &'static str {
        match self {
            Mode::Tree    => "TREE",
            Mode::Scatter => "SCATTER",
            Mode::Focus   => "FOCUS",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InteractionState {
    mode:         Mode,
    focus_target: Option<ObjectId>,
    pointer:      Vec2,
}

impl InteractionState {
    pub fn new() -> Self { Self::default() }

    pub fn mode(&self)         -> Mode             { self.mode }
    pub fn focus_target(&self) -> Option<ObjectId> { self.focus_target }
    pub fn pointer(&self)      -> Vec2             { self.pointer }

    /// Switch to `Tree` or `Scatter`.  Any focus target is dropped.
    ///
    /// Passing `Mode::Focus` keeps the current target; use
    /// [`enter_focus`](Self::enter_focus) to assign one.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        if mode != Mode::Focus {
            self.focus_target = None;
        }
    }

    /// Enter `Focus`.  A target that is already assigned wins over `target`.
    pub fn enter_focus(&mut self, target: Option<ObjectId>) {
        self.mode = Mode::Focus;
        if self.focus_target.is_none() {
            self.focus_target = target;
        }
    }

    pub fn set_pointer(&mut self, pointer: Vec2) {
        self.pointer = pointer;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_tree_without_target() {
        let s = InteractionState::new();
        assert_eq!(s.mode(), Mode::Tree);
        assert_eq!(s.focus_target(), None);
        assert_eq!(s.pointer(), Vec2::ZERO);
    }

    #[test]
    fn leaving_focus_clears_target() {
        let mut s = InteractionState::new();
        s.enter_focus(Some(ObjectId(3)));
        assert_eq!(s.focus_target(), Some(ObjectId(3)));
        s.set_mode(Mode::Scatter);
        assert_eq!(s.focus_target(), None);
    }

    #[test]
    fn focus_target_is_sticky() {
        let mut s = InteractionState::new();
        s.enter_focus(Some(ObjectId(1)));
        s.enter_focus(Some(ObjectId(2)));
        assert_eq!(s.focus_target(), Some(ObjectId(1)));
    }

    #[test]
    fn pointer_survives_mode_changes() {
        let mut s = InteractionState::new();
        s.set_pointer(Vec2::new(0.4, -0.2));
        s.set_mode(Mode::Scatter);
        s.set_mode(Mode::Tree);
        assert_eq!(s.pointer(), Vec2::new(0.4, -0.2));
    }
}
