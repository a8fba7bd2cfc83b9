//! Tooltips and the delay state machine that shows and dismisses them.
//!
//! The manager owns no timer. The host advances it with [`ToolTipManager::tick`]
//! (see `SceneController::start_tooltip_timer`), which keeps it deterministic
//! under test.

use crate::component::ComponentId;
use crate::config::SceneConfig;
use crate::geometry::Point;
use crate::scene::Scene;
use crate::spacer::Spacer;
use slint::{Brush, Color, SharedString};
use std::rc::Rc;
use std::time::Duration;

/// Text shown near the pointer while it rests over a component.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolTip {
    pub text: SharedString,
    pub visible: bool,
    /// Horizontal distance from the pointer (default: 0)
    pub x_offset: f64,
    /// Vertical distance from the pointer (default: 24)
    pub y_offset: f64,
    pub padding: Spacer,
    pub background: Brush,
    pub foreground: Brush,
}

impl ToolTip {
    pub fn new(text: impl Into<SharedString>) -> Self {
        Self {
            text: text.into(),
            visible: true,
            x_offset: 0.0,
            y_offset: 24.0,
            padding: Spacer::EMPTY,
            background: Brush::SolidColor(Color::from_rgb_u8(255, 255, 225)),
            foreground: Brush::SolidColor(Color::from_rgb_u8(0, 0, 0)),
        }
    }
}

/// Host-side presentation of tooltips.
pub trait ToolTipRenderer {
    /// Show `tooltip` at `location` (panel space, offsets already applied).
    fn show_tooltip(&self, tooltip: &ToolTip, location: Point);
    fn hide_tooltip(&self, tooltip: &ToolTip);
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Pending(Duration),
    Showing(Duration),
}

/// Show/dismiss/reshow timing for one panel.
///
/// A requested tooltip appears after the initial delay, or at once while the
/// reshow window opened by the last hide is still running. A visible tooltip
/// is dismissed after the dismiss delay.
pub struct ToolTipManager {
    initial_delay: Duration,
    dismiss_delay: Duration,
    reshow_delay: Duration,
    renderer: Option<Rc<dyn ToolTipRenderer>>,
    current: Option<(ToolTip, Point)>,
    phase: Phase,
    reshow_window: Option<Duration>,
}

impl ToolTipManager {
    pub fn new(initial_delay: Duration, dismiss_delay: Duration, reshow_delay: Duration) -> Self {
        Self {
            initial_delay,
            dismiss_delay,
            reshow_delay,
            renderer: None,
            current: None,
            phase: Phase::Idle,
            reshow_window: None,
        }
    }

    pub(crate) fn from_config(config: &SceneConfig) -> Self {
        Self::new(
            config.tooltip_initial_delay,
            config.tooltip_dismiss_delay,
            config.tooltip_reshow_delay,
        )
    }

    pub fn set_renderer(&mut self, renderer: Option<Rc<dyn ToolTipRenderer>>) {
        self.renderer = renderer;
    }

    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    pub fn set_initial_delay(&mut self, delay: Duration) {
        self.initial_delay = delay;
    }

    pub fn dismiss_delay(&self) -> Duration {
        self.dismiss_delay
    }

    pub fn set_dismiss_delay(&mut self, delay: Duration) {
        self.dismiss_delay = delay;
    }

    pub fn reshow_delay(&self) -> Duration {
        self.reshow_delay
    }

    pub fn set_reshow_delay(&mut self, delay: Duration) {
        self.reshow_delay = delay;
    }

    pub fn is_showing(&self) -> bool {
        matches!(self.phase, Phase::Showing(_))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, Phase::Pending(_))
    }

    pub fn current(&self) -> Option<&ToolTip> {
        self.current.as_ref().map(|(tooltip, _)| tooltip)
    }

    /// Request `tooltip` at `location`, replacing any current request.
    pub fn show_tooltip(&mut self, tooltip: ToolTip, location: Point) {
        if !tooltip.visible {
            return;
        }
        if self.is_showing() {
            self.render_hide();
        }
        self.current = Some((tooltip, location));
        if self.reshow_window.is_some() {
            self.reshow_window = Some(self.reshow_delay);
            self.render_show();
        } else {
            self.phase = Phase::Pending(Duration::ZERO);
        }
    }

    /// Hide the current tooltip and open the reshow window.
    pub fn hide_tooltip(&mut self) {
        if self.current.is_none() {
            return;
        }
        if self.is_showing() {
            self.render_hide();
        }
        self.current = None;
        self.phase = Phase::Idle;
        self.reshow_window = Some(self.reshow_delay);
    }

    /// Advance the clock by `elapsed`.
    pub fn tick(&mut self, elapsed: Duration) {
        if let Some(remaining) = self.reshow_window {
            self.reshow_window = remaining.checked_sub(elapsed).filter(|r| !r.is_zero());
        }
        match self.phase {
            Phase::Idle => {}
            Phase::Pending(waited) => {
                let waited = waited + elapsed;
                if waited >= self.initial_delay {
                    self.render_show();
                } else {
                    self.phase = Phase::Pending(waited);
                }
            }
            Phase::Showing(shown) => {
                let shown = shown + elapsed;
                if shown >= self.dismiss_delay {
                    self.hide_tooltip();
                } else {
                    self.phase = Phase::Showing(shown);
                }
            }
        }
    }

    fn render_show(&mut self) {
        self.phase = Phase::Showing(Duration::ZERO);
        if let (Some(renderer), Some((tooltip, location))) = (&self.renderer, &self.current) {
            let at = location.translate(tooltip.x_offset, tooltip.y_offset);
            renderer.show_tooltip(tooltip, at);
        }
    }

    fn render_hide(&mut self) {
        if let (Some(renderer), Some((tooltip, _))) = (&self.renderer, &self.current) {
            renderer.hide_tooltip(tooltip);
        }
    }
}

impl Scene {
    /// Request the component's tooltip at `pointer` (its parent space).
    pub(crate) fn request_tooltip(&mut self, id: ComponentId, pointer: Point) {
        let Some(tooltip) = self.component(id).tooltip().cloned() else {
            return;
        };
        let Some(panel) = self.component_panel(id) else {
            return;
        };
        let origin = self.panel_offset(id);
        self.panel_mut(panel)
            .tooltips
            .show_tooltip(tooltip, pointer.translate(origin.x, origin.y));
    }

    pub(crate) fn dismiss_tooltip(&mut self, id: ComponentId) {
        if let Some(panel) = self.component_panel(id) {
            self.panel_mut(panel).tooltips.hide_tooltip();
        }
    }
}
