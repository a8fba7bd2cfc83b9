//! Construction defaults for scenes and panels.

use crate::geometry::Size;
use std::time::Duration;

/// Defaults applied to panels, handles, connections and tooltip managers
/// created by a [`Scene`](crate::Scene).
///
/// ```
/// use slint_scene_graph::{Scene, SceneConfig};
///
/// let config = SceneConfig::default().with_grid_spacing(8.0).with_snap_to_grid(false);
/// let scene = Scene::with_config(config);
/// assert_eq!(scene.config().horizontal_grid_spacing, 8.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    /// Distance between horizontal grid lines (default: 16.0)
    pub horizontal_grid_spacing: f64,
    /// Distance between vertical grid lines (default: 16.0)
    pub vertical_grid_spacing: f64,
    /// Whether drags, resizes and arrow keys snap to the grid (default: true)
    pub snap_to_grid: bool,
    /// Initial panel scale (default: 1.0)
    pub scale: f64,
    /// Delay before a requested tooltip appears (default: 1000ms)
    pub tooltip_initial_delay: Duration,
    /// Time a tooltip stays visible (default: 5000ms)
    pub tooltip_dismiss_delay: Duration,
    /// Window after a hide during which the next tooltip shows immediately (default: 500ms)
    pub tooltip_reshow_delay: Duration,
    /// Size of newly created resize handles (default: 6x6)
    pub handle_size: Size,
    /// Stroke width of newly created connections (default: 1.0)
    pub connection_width: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            horizontal_grid_spacing: 16.0,
            vertical_grid_spacing: 16.0,
            snap_to_grid: true,
            scale: 1.0,
            tooltip_initial_delay: Duration::from_millis(1000),
            tooltip_dismiss_delay: Duration::from_millis(5000),
            tooltip_reshow_delay: Duration::from_millis(500),
            handle_size: Size::new(6.0, 6.0),
            connection_width: 1.0,
        }
    }
}

impl SceneConfig {
    /// Use the same spacing for both grid axes.
    pub fn with_grid_spacing(mut self, spacing: f64) -> Self {
        self.horizontal_grid_spacing = spacing;
        self.vertical_grid_spacing = spacing;
        self
    }

    pub fn with_snap_to_grid(mut self, enabled: bool) -> Self {
        self.snap_to_grid = enabled;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_tooltip_delays(mut self, initial: Duration, dismiss: Duration, reshow: Duration) -> Self {
        self.tooltip_initial_delay = initial;
        self.tooltip_dismiss_delay = dismiss;
        self.tooltip_reshow_delay = reshow;
        self
    }

    pub fn with_handle_size(mut self, size: Size) -> Self {
        self.handle_size = size;
        self
    }

    pub fn with_connection_width(mut self, width: f64) -> Self {
        self.connection_width = width;
        self
    }
}
