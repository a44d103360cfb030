//! # System Lifecycle & Orchestration
//!
//! Starts the three actors, wires them together and shuts them down.
//!
//! ## Wiring
//!
//! ```text
//!            ┌──────────────┐
//!  checkout ─▶ Order actor  ├──▶ Promo actor      (validate, record usage)
//!            │              ├──▶ Inventory actor  (reserve, restore)
//!            └──────────────┘
//! ```
//!
//! Actors are created first and receive their dependencies through `run(context)`, so the
//! order actor can hold inventory and promo clients without any construction-order problem.
//! The dependency graph is acyclic: dropping the public clients closes the order actor, whose
//! context then drops the last inventory and promo senders.
//!
//! ## Persistence
//!
//! With `data_dir` set, each collection lives in its own JSON file (`orders.json`,
//! `inventory.json`, `promos.json`) and survives restarts. Otherwise everything is in memory.
//!
//! ## Observability
//!
//! [`setup_tracing`] installs the log subscriber, filtered by `RUST_LOG`:
//!
//! ```bash
//! RUST_LOG=info cargo run --bin fulfillment-demo     # outcomes
//! RUST_LOG=debug cargo run --bin fulfillment-demo    # full payloads
//! ```

pub mod fulfillment_system;
pub mod tracing;

pub use fulfillment_system::*;
pub use self::tracing::*;
