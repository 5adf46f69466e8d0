//! Device link event surface
//!
//! The device link reports everything it sees through a single tagged
//! [`DeviceEvent`](event::DeviceEvent) delivered to a
//! [`DeviceListener`](listener::DeviceListener).

pub mod event;
pub mod listener;
