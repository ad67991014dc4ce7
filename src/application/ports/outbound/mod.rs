//! Outbound ports - Interfaces that the application requires from external systems

mod clock_port;
mod host_bridge_port;
mod room_catalog_port;

pub use clock_port::ClockPort;
pub use host_bridge_port::{BridgeError, HostBridgePort};
pub use room_catalog_port::RoomCatalogPort;

#[cfg(test)]
pub use clock_port::MockClockPort;
#[cfg(test)]
pub use host_bridge_port::MockHostBridgePort;
#[cfg(test)]
pub use room_catalog_port::MockRoomCatalogPort;
