//! An anchored popup time picker for the Tessera UI framework.
//!
//! Text fields bind to a shared [`TimePickerController`]; clicking a field
//! opens a popup directly below it with stepper arrows for hours, minutes,
//! and AM/PM, and writes the chosen time back into the field as text such as
//! `2 : 05 PM`. One popup serves every bound field: activating another field
//! repoints it, and Escape or a click elsewhere dismisses it.
//!
//! # Usage
//!
//! Wrap the main UI in a [`time_picker_provider`] and pass the same
//! controller to it and to each [`time_picker_field`].
//!
//! ```no_run
//! use tessera_components::theme::{MaterialTheme, MaterialThemeProviderArgs, material_theme};
//! use tessera_timepicker::{
//!     controller::TimePickerController,
//!     field::{TimePickerFieldArgs, time_picker_field},
//!     provider::{TimePickerProviderArgs, time_picker_provider},
//! };
//! use tessera_ui::{remember, tessera};
//!
//! #[tessera]
//! fn app() {
//!     let controller = remember(TimePickerController::new);
//!     let args = MaterialThemeProviderArgs::new(
//!         || MaterialTheme::default(),
//!         move || {
//!             time_picker_provider(
//!                 &TimePickerProviderArgs::new(controller).main_content(move || {
//!                     time_picker_field(
//!                         &TimePickerFieldArgs::default()
//!                             .key("appointment")
//!                             .controller(controller),
//!                     );
//!                 }),
//!             );
//!         },
//!     );
//!     material_theme(&args);
//! }
//! ```
//!
//! [`TimePickerController`]: controller::TimePickerController
//! [`time_picker_provider`]: provider::time_picker_provider
//! [`time_picker_field`]: field::time_picker_field
#![deny(missing_docs, clippy::unwrap_used)]

pub mod controller;
pub mod field;
mod popup;
pub mod provider;
pub mod time_value;
