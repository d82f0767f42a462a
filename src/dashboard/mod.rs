//! Dashboard UI Module
//!
//! Thin egui front end over the automation coordinator: renders its state
//! and forwards user intent.

pub mod app;
pub mod components;
pub mod state;
pub mod theme;
pub mod views;

pub use app::{run_dashboard, DashboardApp};
