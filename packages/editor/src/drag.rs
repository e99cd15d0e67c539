//! # Drag-Reorder Controller
//!
//! Turns pointer drag events into a single reorder on drop.
//!
//! ```text
//! Idle --start_drag(i)--> Dragging --drop(j)----> Dropped{i, j} --> Idle
//!                            |  ^
//!                  drag_over(j) |
//!                            +--+--cancel()----> Cancelled     --> Idle
//! ```
//!
//! The controller never touches the document itself; `drop` hands back the
//! reorder for the caller to apply. Events that arrive with no drag in
//! progress are ignored.

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        dragged_index: usize,
        /// Last candidate target reported by `drag_over`
        over_index: Option<usize>,
    },
}

/// Result of ending (or failing to end) a drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// Apply `reorder_block(from, to)`
    Dropped { from: usize, to: usize },

    /// Drag abandoned, nothing to apply
    Cancelled,

    /// Event arrived while idle
    Ignored,
}

#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    /// Drives the drag overlay
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn dragged_index(&self) -> Option<usize> {
        match self.state {
            DragState::Dragging { dragged_index, .. } => Some(dragged_index),
            DragState::Idle => None,
        }
    }

    /// Candidate drop target, for highlighting
    pub fn over_index(&self) -> Option<usize> {
        match self.state {
            DragState::Dragging { over_index, .. } => over_index,
            DragState::Idle => None,
        }
    }

    /// Begin dragging the block at `index`
    ///
    /// A new start while dragging replaces the previous drag.
    pub fn start_drag(&mut self, index: usize) {
        if let DragState::Dragging { dragged_index, .. } = self.state {
            tracing::debug!(previous = dragged_index, index, "drag restarted");
        }
        self.state = DragState::Dragging {
            dragged_index: index,
            over_index: None,
        };
    }

    /// Record a candidate target; returns false when idle
    pub fn drag_over(&mut self, target: usize) -> bool {
        match &mut self.state {
            DragState::Dragging { over_index, .. } => {
                *over_index = Some(target);
                true
            }
            DragState::Idle => false,
        }
    }

    pub fn drop(&mut self, target: usize) -> DragOutcome {
        match std::mem::take(&mut self.state) {
            DragState::Dragging { dragged_index, .. } => DragOutcome::Dropped {
                from: dragged_index,
                to: target,
            },
            DragState::Idle => {
                tracing::debug!(target, "drop ignored: no active drag");
                DragOutcome::Ignored
            }
        }
    }

    pub fn cancel(&mut self) -> DragOutcome {
        match std::mem::take(&mut self.state) {
            DragState::Dragging { .. } => DragOutcome::Cancelled,
            DragState::Idle => DragOutcome::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_drag_cycle() {
        let mut drag = DragController::new();
        assert!(!drag.is_dragging());

        drag.start_drag(0);
        assert!(drag.is_dragging());
        assert_eq!(drag.dragged_index(), Some(0));

        assert!(drag.drag_over(1));
        assert!(drag.drag_over(2));
        assert_eq!(drag.over_index(), Some(2));

        assert_eq!(drag.drop(2), DragOutcome::Dropped { from: 0, to: 2 });
        assert_eq!(drag.state(), DragState::Idle);
    }

    #[test]
    fn test_cancel_returns_to_idle() {
        let mut drag = DragController::new();
        drag.start_drag(3);

        assert_eq!(drag.cancel(), DragOutcome::Cancelled);
        assert_eq!(drag.state(), DragState::Idle);
        assert_eq!(drag.dragged_index(), None);
    }

    #[test]
    fn test_events_while_idle_are_ignored() {
        let mut drag = DragController::new();

        assert!(!drag.drag_over(1));
        assert_eq!(drag.drop(1), DragOutcome::Ignored);
        assert_eq!(drag.cancel(), DragOutcome::Ignored);
        assert_eq!(drag.state(), DragState::Idle);
    }

    #[test]
    fn test_restart_replaces_drag() {
        let mut drag = DragController::new();
        drag.start_drag(0);
        drag.drag_over(4);
        drag.start_drag(2);

        assert_eq!(drag.over_index(), None);
        assert_eq!(drag.drop(0), DragOutcome::Dropped { from: 2, to: 0 });
    }
}
