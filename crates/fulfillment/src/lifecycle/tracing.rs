//! Log subscriber setup.
//!
//! Actor loops log with an `entity_type` field (`Order`, `InventoryRecord`, `PromoCode`), so
//! module paths are left out of the output.

/// Installs a compact `tracing-subscriber` formatter filtered by `RUST_LOG`.
/// Call once, at the start of the binary.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
