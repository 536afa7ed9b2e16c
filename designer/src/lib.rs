//! Design sessions for the slide layout editor.
//!
//! Wraps the pure [`canvas`] engine with the parts that need the outside
//! world: configuration, the spreadsheet/drawing-folder/generation/settings
//! services, and a [`session::DesignSession`] that keeps the document
//! consistent when those services fail.

pub mod config;
pub mod error;
pub mod services;
pub mod session;
