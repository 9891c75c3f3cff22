//! Internal test modules with crate access.
//!
//! Cross-module scenarios and property tests live here; per-module unit
//! tests stay next to their modules.
