use pullrefresh_ui_layout::ViewHandle;

/// Caller-supplied answer to "can the target still scroll towards its top?".
///
/// Needed when the coordinator's direct child is not itself scrollable, for
/// example a plain container wrapping a list.
pub type TargetScrollUpChecker = Box<dyn Fn() -> bool>;

/// Whether a pull gesture should be left to the target because it is not yet
/// scrolled to its top edge.
///
/// The checker, when present, wins over asking the view. Without either, the
/// target is treated as being at its top.
pub fn can_target_scroll_up(
    target: Option<&ViewHandle>,
    checker: Option<&TargetScrollUpChecker>,
) -> bool {
    if let Some(checker) = checker {
        return checker();
    }
    target.is_some_and(|view| view.borrow().can_scroll_vertically(-1))
}
