//! Error types for scene graph operations.
//!
//! Every failure is either a caller bug ([`ErrorKind::InvalidArgument`]) or a
//! protocol violation ([`ErrorKind::IllegalState`]). Redundant or blocked
//! mutations are not errors; they are silent no-ops.

use crate::component::ComponentId;
use slint::SharedString;
use thiserror::Error;

/// Broad classification of a [`SceneError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    IllegalState,
}

/// Errors raised by scene graph operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("{side} space cannot be negative (got {value})")]
    NegativeSpace { side: &'static str, value: f64 },

    #[error("{what} cannot be negative (got {value})")]
    NegativeValue { what: &'static str, value: f64 },

    #[error("panel scale must be positive (got {0})")]
    NonPositiveScale(f64),

    #[error("{child:?} cannot be added to {container:?}: it is the container itself or one of its ancestors")]
    ParentCycle {
        child: ComponentId,
        container: ComponentId,
    },

    #[error("{0:?} is a root component and cannot be given a parent")]
    RootReparent(ComponentId),

    #[error("handle {handle:?} can only be attached to an adjustable component, not {container:?}")]
    NotAdjustable {
        handle: ComponentId,
        container: ComponentId,
    },

    #[error("{0:?} is not a container")]
    NotAContainer(ComponentId),

    #[error("{0:?} cannot be the endpoint of a connection")]
    NotConnectable(ComponentId),

    #[error("{0:?} is not a connection")]
    NotAConnection(ComponentId),

    #[error("{0:?} cannot take focus while it is not focusable")]
    NotFocusable(ComponentId),

    #[error("{0:?} cannot start dragging while dragging is disabled")]
    DraggingDisabled(ComponentId),

    #[error("real-time dragging of {0:?} cannot be toggled while a drag is in progress")]
    DragInProgress(ComponentId),

    #[error("tool '{0}' is not the active tool of this panel")]
    ToolNotActive(SharedString),

    #[error("{0:?} has a parent; only root components can be attached to a panel")]
    PanelOnNonRoot(ComponentId),
}

impl SceneError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SceneError::NegativeSpace { .. }
            | SceneError::NegativeValue { .. }
            | SceneError::NonPositiveScale(_)
            | SceneError::ParentCycle { .. }
            | SceneError::NotAdjustable { .. }
            | SceneError::NotAContainer(_)
            | SceneError::NotConnectable(_)
            | SceneError::NotAConnection(_) => ErrorKind::InvalidArgument,
            SceneError::RootReparent(_)
            | SceneError::NotFocusable(_)
            | SceneError::DraggingDisabled(_)
            | SceneError::DragInProgress(_)
            | SceneError::ToolNotActive(_)
            | SceneError::PanelOnNonRoot(_) => ErrorKind::IllegalState,
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        self.kind() == ErrorKind::InvalidArgument
    }

    pub fn is_illegal_state(&self) -> bool {
        self.kind() == ErrorKind::IllegalState
    }
}

/// Convenience result type for scene graph operations.
pub type Result<T, E = SceneError> = std::result::Result<T, E>;
