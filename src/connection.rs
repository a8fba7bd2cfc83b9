//! Connections: line edges derived from the centers of two endpoints.

use crate::component::ComponentId;
use crate::error::{Result, SceneError};
use crate::geometry::{Geometry, Line, Rect};
use crate::property::names;
use crate::scene::Scene;

/// Endpoint and line state of a connection component.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionState {
    pub(crate) source: Option<ComponentId>,
    pub(crate) destination: Option<ComponentId>,
    pub(crate) line: Option<Line>,
    pub(crate) width: f64,
    pub(crate) directed: bool,
}

impl ConnectionState {
    pub(crate) fn new(width: f64) -> Self {
        Self {
            source: None,
            destination: None,
            line: None,
            width,
            directed: false,
        }
    }

    pub fn source(&self) -> Option<ComponentId> {
        self.source
    }

    pub fn destination(&self) -> Option<ComponentId> {
        self.destination
    }

    /// The line between the endpoint centers, in the connection's parent
    /// space. `None` until the connection has been validated with both
    /// endpoints set.
    pub fn line(&self) -> Option<Line> {
        self.line
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// The line's bounding box grown by the stroke width on every side, so a
    /// horizontal or vertical line still has area.
    pub fn bounds(&self) -> Rect {
        self.line
            .map_or(Rect::default(), |line| line.bounds().expand(self.width))
    }

    /// True if the point lies within the stroke width of the segment.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.line
            .map_or(false, |line| line.distance_to(x, y) <= self.width)
    }
}

#[derive(Clone, Copy)]
enum End {
    Source,
    Destination,
}

impl Scene {
    fn connection_state(&self, connection: ComponentId) -> Result<&ConnectionState> {
        self.component(connection)
            .connection()
            .ok_or(SceneError::NotAConnection(connection))
    }

    pub fn set_source_component(&mut self, connection: ComponentId, source: Option<ComponentId>) -> Result<()> {
        self.set_end(connection, source, End::Source)
    }

    pub fn set_destination_component(
        &mut self,
        connection: ComponentId,
        destination: Option<ComponentId>,
    ) -> Result<()> {
        self.set_end(connection, destination, End::Destination)
    }

    /// Reassign one end. The new value is stored before the endpoint lists
    /// are updated, so the list operations see a consistent connection and
    /// do not call back into this setter.
    fn set_end(&mut self, connection: ComponentId, endpoint: Option<ComponentId>, end: End) -> Result<()> {
        let state = self.connection_state(connection)?;
        let old = match end {
            End::Source => state.source,
            End::Destination => state.destination,
        };
        if let Some(endpoint) = endpoint {
            if !self.component(endpoint).is_connected() {
                log::warn!("{endpoint:?} cannot be an endpoint of {connection:?}");
                return Err(SceneError::NotConnectable(endpoint));
            }
        }
        if old == endpoint {
            return Ok(());
        }

        if let Some(state) = self.node_mut(connection).connection.as_mut() {
            match end {
                End::Source => state.source = endpoint,
                End::Destination => state.destination = endpoint,
            }
        }

        if let Some(old) = old {
            match end {
                End::Source => self.remove_outbound_connection(old, connection)?,
                End::Destination => self.remove_inbound_connection(old, connection)?,
            };
        }
        if let Some(endpoint) = endpoint {
            match end {
                End::Source => self.add_outbound_connection(endpoint, connection)?,
                End::Destination => self.add_inbound_connection(endpoint, connection)?,
            }
        }

        let name = match end {
            End::Source => names::SOURCE_COMPONENT,
            End::Destination => names::DESTINATION_COMPONENT,
        };
        self.fire_property(connection, name, old, endpoint);
        self.revalidate(connection);
        self.repaint(connection);
        Ok(())
    }

    pub fn set_directed(&mut self, connection: ComponentId, directed: bool) -> Result<()> {
        let old = self.connection_state(connection)?.directed;
        if old == directed {
            return Ok(());
        }
        if let Some(state) = self.node_mut(connection).connection.as_mut() {
            state.directed = directed;
        }
        self.fire_property(connection, names::DIRECTED, old, directed);
        self.repaint(connection);
        Ok(())
    }

    pub fn set_connection_width(&mut self, connection: ComponentId, width: f64) -> Result<()> {
        let old = self.connection_state(connection)?.width;
        if width < 0.0 || width.is_nan() {
            log::warn!("rejecting connection width {width} for {connection:?}");
            return Err(SceneError::NegativeValue {
                what: "connection width",
                value: width,
            });
        }
        if old == width {
            return Ok(());
        }
        self.repaint(connection);
        if let Some(state) = self.node_mut(connection).connection.as_mut() {
            state.width = width;
        }
        self.fire_property(connection, names::CONNECTION_WIDTH, old, width);
        self.revalidate(connection);
        self.repaint(connection);
        Ok(())
    }

    /// Recompute the line from the endpoint centers. Stays invalid while an
    /// endpoint is missing.
    pub(crate) fn validate_connection(&mut self, connection: ComponentId) {
        let node = self.component(connection);
        if node.valid {
            return;
        }
        let Some((source, destination)) = node
            .connection()
            .and_then(|state| Some((state.source?, state.destination?)))
        else {
            return;
        };

        let old_preferred = node.preferred_bounds();
        let origin = self.panel_offset(connection);
        let start = self.center_on_panel(source).translate(-origin.x, -origin.y);
        let end = self.center_on_panel(destination).translate(-origin.x, -origin.y);
        if let Some(state) = self.node_mut(connection).connection.as_mut() {
            state.line = Some(Line::new(start, end));
        }
        log::trace!("{connection:?} line {start:?} -> {end:?}");

        self.mark_valid(connection);
        let new_preferred = self.component(connection).preferred_bounds();
        self.repaint_region(connection, old_preferred.union(&new_preferred));
    }
}
