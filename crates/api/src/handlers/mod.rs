//! Request handlers.
//!
//! Each submodule translates HTTP requests into calls on one component held
//! in [`AppState`](crate::state::AppState) and maps errors via
//! [`AppError`](crate::error::AppError).

pub mod canvas;
pub mod form;
pub mod notifications;
pub mod records;
pub mod regions;
pub mod upload;
