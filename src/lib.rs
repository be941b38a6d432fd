//! blipdesk - control panel core for host-managed map markers
//!
//! The host (a game-server resource) owns the marker records and pushes
//! them to the panel; the panel mirrors them, lets an operator browse and
//! edit, and sends requests back. Nothing here writes marker data itself.
//!
//! - [`blips`]: records, drafts, reconciliation, table projection
//! - [`panel`]: the state owner both sides talk to
//! - [`events`]: host wire protocol
//! - [`bridge`]: stdin/stdout runtime around a panel

pub mod blips;
pub mod bridge;
pub mod config;
pub mod demo;
pub mod events;
pub mod export;
pub mod logging;
pub mod panel;
pub mod validation;
