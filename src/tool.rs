//! Panel tools: exclusive interaction modes installed on a panel.

use crate::cursor::Cursor;
use crate::error::{Result, SceneError};
use crate::panel::ComponentPanel;
use crate::property::{names, PropertyChangeSupport, PropertySource};
use slint::SharedString;
use std::cell::Cell;

/// An interaction mode a panel can switch into, such as "connect" or "zoom".
///
/// A panel has at most one active tool; install one with
/// [`Scene::set_active_tool`](crate::Scene::set_active_tool).
pub trait ComponentPanelTool {
    fn id(&self) -> SharedString;
    fn is_active(&self) -> bool;
    /// Called once the tool is installed on `panel`.
    fn activate(&self, panel: &mut ComponentPanel) -> Result<()>;
    /// Called while the tool is still installed, before it is replaced.
    fn deactivate(&self, panel: &mut ComponentPanel) -> Result<()>;
}

/// A tool that only swaps the panel cursor while active.
///
/// Build richer tools by wrapping it and adding listeners on activation.
pub struct DefaultPanelTool {
    id: SharedString,
    name: SharedString,
    short_description: SharedString,
    cursor: Option<Cursor>,
    enabled: Cell<bool>,
    active: Cell<bool>,
    saved_cursor: Cell<Option<Cursor>>,
    properties: PropertyChangeSupport,
}

impl DefaultPanelTool {
    /// A tool with `id` for lookups and a display `name`.
    pub fn new(id: impl Into<SharedString>, name: impl Into<SharedString>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            short_description: SharedString::default(),
            cursor: None,
            enabled: Cell::new(true),
            active: Cell::new(false),
            saved_cursor: Cell::new(None),
            properties: PropertyChangeSupport::new(),
        }
    }

    pub fn with_cursor(mut self, cursor: Cursor) -> Self {
        self.cursor = Some(cursor);
        self
    }

    pub fn with_short_description(mut self, description: impl Into<SharedString>) -> Self {
        self.short_description = description.into();
        self
    }

    pub fn name(&self) -> &SharedString {
        &self.name
    }

    pub fn short_description(&self) -> &SharedString {
        &self.short_description
    }

    pub fn cursor(&self) -> Option<Cursor> {
        self.cursor
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    pub fn set_enabled(&self, enabled: bool) {
        if self.enabled.replace(enabled) != enabled {
            self.fire(names::ENABLED, !enabled, enabled);
        }
    }

    pub fn properties(&self) -> &PropertyChangeSupport {
        &self.properties
    }

    fn fire(&self, name: &'static str, old: bool, new: bool) {
        self.properties
            .fire(PropertySource::Tool(self.id.clone()), name, old, new);
    }

    fn set_active(&self, active: bool) {
        if self.active.replace(active) != active {
            self.fire(names::ACTIVE, !active, active);
        }
    }
}

impl ComponentPanelTool for DefaultPanelTool {
    fn id(&self) -> SharedString {
        self.id.clone()
    }

    fn is_active(&self) -> bool {
        self.active.get()
    }

    fn activate(&self, panel: &mut ComponentPanel) -> Result<()> {
        if self.is_active() {
            return Ok(());
        }
        if let Some(cursor) = self.cursor {
            self.saved_cursor.set(Some(panel.cursor()));
            panel.set_cursor(cursor);
        }
        self.set_active(true);
        Ok(())
    }

    fn deactivate(&self, panel: &mut ComponentPanel) -> Result<()> {
        let installed = panel
            .active_tool()
            .map_or(false, |tool| tool.id() == self.id);
        if !installed || !self.is_active() {
            log::warn!("tool '{}' is not the active tool", self.id);
            return Err(SceneError::ToolNotActive(self.id.clone()));
        }
        if let Some(cursor) = self.saved_cursor.take() {
            panel.set_cursor(cursor);
        }
        self.set_active(false);
        Ok(())
    }
}
