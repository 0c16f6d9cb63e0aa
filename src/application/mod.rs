//! Application layer: service orchestration over domain contracts.

pub mod services;
