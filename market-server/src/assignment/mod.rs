//! Assignment engine
//!
//! Assigns an order to a seller and a shipper and processes their
//! accept/reject decisions:
//!
//! - assignment sets `assignedSellerId`/`assignedShipperId` and moves the
//!   handoff to `ASSIGNED` without touching the fulfillment status;
//! - a seller accepting moves the order to `CONFIRMED`, a shipper
//!   accepting moves it to `SHIPPING`, both marking the handoff
//!   `ACCEPTED`;
//! - rejecting clears the assigned actor, marks the handoff `REJECTED`
//!   and leaves the status alone.
//!
//! Only the assigned actor may answer. Every accepted mutation commits
//! the order and one history entry atomically, then fires a best-effort
//! notification.

mod engine;
mod error;
mod strategy;

#[cfg(test)]
mod tests;

pub use engine::AssignmentEngine;
pub use error::{AssignmentError, AssignmentResult};
pub use strategy::{AssignStrategy, FirstVerified};
