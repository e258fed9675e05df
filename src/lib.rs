//! iTunes Gallery Library
//!
//! Search client, gallery model and GUI for the iTunes artwork slideshow.

pub mod api;
pub mod config;
pub mod fetch;
pub mod gallery;
pub mod gui;
pub mod logging;
