//! Connection endpoints: inbound and outbound connection lists.

use crate::component::ComponentId;
use crate::error::{Result, SceneError};
use crate::event::{ConnectedEvent, ConnectedEventKind};
use crate::listeners::{ConnectedListener, ListenerList};
use crate::scene::Scene;

/// Connection lists of a component that can be a connection endpoint.
pub(crate) struct EndpointHost {
    pub(crate) inbound: Vec<ComponentId>,
    pub(crate) outbound: Vec<ComponentId>,
    pub(crate) listeners: ListenerList<dyn ConnectedListener>,
    pub(crate) notification_enabled: bool,
}

impl Default for EndpointHost {
    fn default() -> Self {
        Self {
            inbound: Vec::new(),
            outbound: Vec::new(),
            listeners: ListenerList::new(),
            notification_enabled: true,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Direction {
    Inbound,
    Outbound,
}

impl Scene {
    /// Inbound followed by outbound connections of `id`.
    pub(crate) fn attached_connections(&self, id: ComponentId) -> Vec<ComponentId> {
        let node = self.component(id);
        node.inbound_connections()
            .iter()
            .chain(node.outbound_connections())
            .copied()
            .collect()
    }

    /// Invalidate the connections of `id` and of all its descendants, whose
    /// centers on the panel move along with it.
    pub(crate) fn invalidate_attached_connections(&mut self, id: ComponentId) {
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            for connection in self.attached_connections(current) {
                self.invalidate(connection);
            }
            pending.extend_from_slice(self.component(current).children());
        }
    }

    /// Register `connection` as arriving at `id` and make `id` its destination.
    pub fn add_inbound_connection(&mut self, id: ComponentId, connection: ComponentId) -> Result<()> {
        self.add_endpoint(id, connection, Direction::Inbound)
    }

    /// Register `connection` as leaving `id` and make `id` its source.
    pub fn add_outbound_connection(&mut self, id: ComponentId, connection: ComponentId) -> Result<()> {
        self.add_endpoint(id, connection, Direction::Outbound)
    }

    /// Drop `connection` from `id`'s inbound list, clearing its destination
    /// if that still points at `id`. Returns whether it was registered.
    pub fn remove_inbound_connection(&mut self, id: ComponentId, connection: ComponentId) -> Result<bool> {
        self.remove_endpoint(id, connection, Direction::Inbound)
    }

    pub fn remove_outbound_connection(&mut self, id: ComponentId, connection: ComponentId) -> Result<bool> {
        self.remove_endpoint(id, connection, Direction::Outbound)
    }

    pub fn connected_listeners_mut(
        &mut self,
        id: ComponentId,
    ) -> Option<&mut ListenerList<dyn ConnectedListener>> {
        self.node_mut(id).endpoints.as_mut().map(|host| &mut host.listeners)
    }

    fn check_endpoint(&self, id: ComponentId, connection: ComponentId) -> Result<()> {
        if !self.component(id).is_connected() {
            log::warn!("{id:?} cannot hold connections");
            return Err(SceneError::NotConnectable(id));
        }
        if !self.component(connection).is_connection() {
            log::warn!("{connection:?} is not a connection");
            return Err(SceneError::NotAConnection(connection));
        }
        Ok(())
    }

    fn add_endpoint(&mut self, id: ComponentId, connection: ComponentId, direction: Direction) -> Result<()> {
        self.check_endpoint(id, connection)?;
        let Some(host) = self.node_mut(id).endpoints.as_mut() else {
            return Ok(());
        };
        let list = match direction {
            Direction::Inbound => &mut host.inbound,
            Direction::Outbound => &mut host.outbound,
        };
        if list.contains(&connection) {
            return Ok(());
        }
        list.push(connection);

        let current = self.endpoint_of(connection, direction);
        if current != Some(id) {
            match direction {
                Direction::Inbound => self.set_destination_component(connection, Some(id))?,
                Direction::Outbound => self.set_source_component(connection, Some(id))?,
            }
        }

        let kind = match direction {
            Direction::Inbound => ConnectedEventKind::InboundAdded,
            Direction::Outbound => ConnectedEventKind::OutboundAdded,
        };
        self.fire_connected_event(id, kind, connection);
        self.repaint(id);
        Ok(())
    }

    fn remove_endpoint(
        &mut self,
        id: ComponentId,
        connection: ComponentId,
        direction: Direction,
    ) -> Result<bool> {
        self.check_endpoint(id, connection)?;
        let Some(host) = self.node_mut(id).endpoints.as_mut() else {
            return Ok(false);
        };
        let list = match direction {
            Direction::Inbound => &mut host.inbound,
            Direction::Outbound => &mut host.outbound,
        };
        let Some(index) = list.iter().position(|c| *c == connection) else {
            return Ok(false);
        };
        list.remove(index);

        if self.endpoint_of(connection, direction) == Some(id) {
            match direction {
                Direction::Inbound => self.set_destination_component(connection, None)?,
                Direction::Outbound => self.set_source_component(connection, None)?,
            }
        }

        let kind = match direction {
            Direction::Inbound => ConnectedEventKind::InboundRemoved,
            Direction::Outbound => ConnectedEventKind::OutboundRemoved,
        };
        self.fire_connected_event(id, kind, connection);
        self.repaint(id);
        Ok(true)
    }

    fn endpoint_of(&self, connection: ComponentId, direction: Direction) -> Option<ComponentId> {
        let state = self.component(connection).connection()?;
        match direction {
            Direction::Inbound => state.destination(),
            Direction::Outbound => state.source(),
        }
    }

    fn fire_connected_event(&self, id: ComponentId, kind: ConnectedEventKind, connection: ComponentId) {
        let Some(host) = self.component(id).endpoints.as_ref() else {
            return;
        };
        if !host.notification_enabled {
            return;
        }
        let evt = ConnectedEvent {
            component: id,
            kind,
            connections: vec![connection],
        };
        for listener in host.listeners.snapshot() {
            match kind {
                ConnectedEventKind::InboundAdded => listener.inbound_connections_added(&evt),
                ConnectedEventKind::InboundRemoved => listener.inbound_connections_removed(&evt),
                ConnectedEventKind::OutboundAdded => listener.outbound_connections_added(&evt),
                ConnectedEventKind::OutboundRemoved => listener.outbound_connections_removed(&evt),
            }
        }
    }
}
