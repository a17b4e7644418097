//! Signage Hub - realtime content broadcast for digital signage screens.
//!
//! A controller assigns media to named screens; every change is written to
//! the screen registry first and then published on the screen's topic, so
//! open displays update immediately and late joiners bootstrap from the
//! registry.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
