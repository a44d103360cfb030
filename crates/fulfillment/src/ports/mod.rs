//! # Collaborator Ports
//!
//! The core reaches the outside world only through these traits: the dish catalog, the
//! delivery-zone fee table, the notifications sink and the clock. Each comes with a simple
//! adapter used by the demo binary and the tests.

pub mod catalog;
pub mod clock;
pub mod delivery_zones;
pub mod notifier;

pub use catalog::*;
pub use clock::*;
pub use delivery_zones::*;
pub use notifier::*;
