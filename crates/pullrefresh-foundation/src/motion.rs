use pullrefresh_ui_graphics::Point;
use smallvec::{smallvec, SmallVec};

pub type PointerId = u64;

/// Masked action of a motion event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionAction {
    /// First pointer went down; starts a gesture.
    Down,
    Move,
    /// An additional pointer went down at `action_index`.
    PointerDown,
    /// A non-final pointer went up at `action_index`.
    PointerUp,
    /// Last pointer went up; ends the gesture.
    Up,
    /// Gesture aborted by the system or by a parent taking it over.
    Cancel,
}

/// Position of one pointer within a motion event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub id: PointerId,
    pub position: Point,
}

impl PointerSample {
    pub fn new(id: PointerId, x: f32, y: f32) -> Self {
        Self {
            id,
            position: Point::new(x, y),
        }
    }
}

/// Multi-pointer motion event in the receiving view's coordinates.
///
/// Mirrors the platform event: pointers are addressed by index for a single
/// event and by id across the events of a gesture.
#[derive(Clone, Debug, PartialEq)]
pub struct MotionEvent {
    pub action: MotionAction,
    /// Index of the pointer that changed for `PointerDown`/`PointerUp`.
    pub action_index: usize,
    pub pointers: SmallVec<[PointerSample; 2]>,
    pub event_time_millis: u64,
}

impl MotionEvent {
    pub fn new(action: MotionAction, pointers: SmallVec<[PointerSample; 2]>) -> Self {
        Self {
            action,
            action_index: 0,
            pointers,
            event_time_millis: 0,
        }
    }

    /// Single-pointer down event.
    pub fn down(id: PointerId, x: f32, y: f32) -> Self {
        Self::new(MotionAction::Down, smallvec![PointerSample::new(id, x, y)])
    }

    /// Single-pointer move event.
    pub fn move_to(id: PointerId, x: f32, y: f32) -> Self {
        Self::new(MotionAction::Move, smallvec![PointerSample::new(id, x, y)])
    }

    /// Single-pointer up event.
    pub fn up(id: PointerId, x: f32, y: f32) -> Self {
        Self::new(MotionAction::Up, smallvec![PointerSample::new(id, x, y)])
    }

    /// Cancel event carrying no pointers, as synthesized when a gesture is
    /// torn down programmatically.
    pub fn cancel(event_time_millis: u64) -> Self {
        Self {
            action: MotionAction::Cancel,
            action_index: 0,
            pointers: SmallVec::new(),
            event_time_millis,
        }
    }

    pub fn with_action_index(mut self, index: usize) -> Self {
        self.action_index = index;
        self
    }

    pub fn with_time(mut self, event_time_millis: u64) -> Self {
        self.event_time_millis = event_time_millis;
        self
    }

    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    pub fn pointer_id(&self, index: usize) -> Option<PointerId> {
        self.pointers.get(index).map(|sample| sample.id)
    }

    pub fn find_pointer_index(&self, id: PointerId) -> Option<usize> {
        self.pointers.iter().position(|sample| sample.id == id)
    }

    pub fn y(&self, index: usize) -> Option<f32> {
        self.pointers.get(index).map(|sample| sample.position.y)
    }

    /// Id of the pointer that triggered a `PointerDown`/`PointerUp`.
    pub fn action_pointer_id(&self) -> Option<PointerId> {
        self.pointer_id(self.action_index)
    }
}

#[cfg(test)]
#[path = "tests/motion_tests.rs"]
mod tests;
