//! # freesms core library
//!
//! Business logic for the freesms hub tool, independent of the terminal
//! front-end.
//!
//! ## Modules
//!
//! - `bus`: in-process command bus and the module-config cache
//! - `module`: the `Module` seam and the Free Mobile SMS module
//! - `provider`: the Free Mobile gateway client
//! - `service`: the RPC adapter the widget talks through
//! - `widget`: the credentials form component
//! - `settings` / `theme`: application preferences and UI styling

pub mod bus;
pub mod credentials;
pub mod error;
pub mod module;
pub mod provider;
pub mod service;
pub mod settings;
pub mod store;
pub mod theme;
pub mod widget;
