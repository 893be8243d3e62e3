//! # Core Navigation Logic
//!
//! Menus, commands, results and the navigator that ties them together.
//! It knows nothing about any specific terminal; all output and input go
//! through the ports in [`crate::console`].
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │       Navigator         │
//!                    │  open / close / switch  │
//!                    │  read → dispatch loop   │
//!                    └───────────┬─────────────┘
//!                                │ owns
//!                    ┌───────────▼─────────────┐
//!                    │      Menu (many)        │
//!                    │  id, parent, style      │
//!                    │  exit, help, ...        │
//!                    └───────────┬─────────────┘
//!                                │ owns
//!                    ┌───────────▼─────────────┐
//!                    │       Command           │
//!                    │  execute → CommandResult│
//!                    └─────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`command`]: `Command` and `CommandError`
//! - [`result`]: `CommandResult` and the derived `CommandStatus`
//! - [`menu`]: `Menu`, `MenuType`, parameters and styling
//! - [`navigator`]: the state machine and run loop
//! - [`events`]: lifecycle notifications
//! - [`config`]: settings file and override resolution

pub mod command;
pub mod config;
pub mod events;
pub mod menu;
pub mod navigator;
pub mod result;
