//! # Slint Scene Graph
//!
//! A retained-mode 2D scene graph for diagram-style editors built on Slint:
//! nested, connectable, draggable and resizable components that stay
//! geometrically consistent under mutation.
//!
//! ## Features
//!
//! - **Arena Scene** - Components and panels live in a [`Scene`] and are addressed by id
//! - **Lazy Validation** - Invalidation propagates up to ancestors and attached connections;
//!   validation lays out bottom-up and recomputes connection lines
//! - **Pluggable Layouts** - [`FitToChildrenLayout`], [`RootFillLayout`] or your own [`ContainerLayout`]
//! - **Z-Ordered Input** - Topmost component gets first refusal on every event
//! - **Drag & Resize** - Real-time or shadow dragging and eight-way resize handles, grid-aware
//! - **Observable** - Property changes, container, connection and root notifications
//! - **Host Agnostic Painting** - Paint through the [`DrawSurface`] trait
//! - **Overview** - A minimap of the whole panel that scrolls the viewport
//!
//! ## Quick Start
//!
//! ```
//! use slint_scene_graph::{Rect, RootLayer, Scene};
//!
//! let mut scene = Scene::new();
//! let panel = scene.create_panel();
//! let layer = scene.panel(panel).layer(RootLayer::Component);
//!
//! let a = scene.create_connected(Rect::new(10.0, 10.0, 40.0, 20.0));
//! let b = scene.create_connected(Rect::new(100.0, 10.0, 40.0, 20.0));
//! scene.add_component(layer, a)?;
//! scene.add_component(layer, b)?;
//!
//! let edge = scene.create_connection(Some(a), Some(b))?;
//! let connections = scene.panel(panel).layer(RootLayer::Connection);
//! scene.add_component(connections, edge)?;
//! scene.validate(connections);
//! assert!(scene.component(edge).connection().and_then(|c| c.line()).is_some());
//! # Ok::<(), slint_scene_graph::SceneError>(())
//! ```
//!
//! Wire a window to a panel with [`SceneController`].

pub mod component;
pub mod config;
pub mod connected;
pub mod connection;
pub mod container;
pub mod controller;
pub mod cursor;
pub mod dispatch;
pub mod draggable;
pub mod error;
pub mod event;
pub mod geometry;
pub mod grid;
pub mod handle;
pub mod layout;
pub mod listeners;
pub mod overview;
pub mod paint;
pub mod painter;
pub mod panel;
pub mod property;
pub mod scene;
pub mod spacer;
pub mod surface;
pub mod tool;
pub mod tooltip;

pub use component::{Component, ComponentId, ComponentKind, Flag, ResizePolicy};
pub use config::SceneConfig;
pub use connection::ConnectionState;
pub use controller::SceneController;
pub use cursor::Cursor;
pub use error::{ErrorKind, Result, SceneError};
pub use event::{
    ConnectedEvent, ConnectedEventKind, ContainerEvent, ContainerEventKind, KeyEvent, KeyEventKind,
    MouseEvent, MouseEventKind, MouseMotionEvent, MouseMotionKind, MouseWheelEvent, RootEvent,
    RootEventKind, ValidationEvent, ValidationEventKind,
};
pub use geometry::{Geometry, Line, Point, Rect, Shape, Size};
pub use grid::GridSnap;
pub use handle::Coordinate;
pub use layout::{ContainerLayout, FitToChildrenLayout, RootFillLayout};
pub use listeners::{
    ConnectedHandler, ConnectedListener, ContainerHandler, ContainerListener, KeyHandler,
    KeyListener, ListenerFamily, ListenerList, MouseHandler, MouseListener, MouseMotionHandler,
    MouseMotionListener, MouseWheelListener, RootHandler, RootListener, ValidationHandler,
    ValidationListener,
};
pub use overview::Overview;
pub use painter::{ComponentBorder, ComponentPainter, ConnectionPainter, DefaultComponentPainter, LineBorder};
pub use panel::{ComponentPanel, ComponentPanelState, PanelId, PanelRole, RootLayer};
pub use property::{
    names, ComponentModel, PropertyChangeEvent, PropertyChangeListener, PropertyChangeSupport,
    PropertySource, PropertyValue,
};
pub use scene::Scene;
pub use spacer::Spacer;
pub use surface::{DrawOp, DrawSurface, RecordingSurface, Stroke};
pub use tool::{ComponentPanelTool, DefaultPanelTool};
pub use tooltip::{ToolTip, ToolTipManager, ToolTipRenderer};
