//! Foundation module - cross-cutting utilities
//!
//! Currently this is just logging setup; the heavier foundations
//! (math, memory, time) live with the rendering substrate, outside this
//! crate.

pub mod logging;
