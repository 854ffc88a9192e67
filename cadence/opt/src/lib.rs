//! The scheduling core of Cadence.
//!
//! [analysis] holds the latency model, resource bookkeeping and the priority
//! pass, [passes] the list scheduler built on them and [traversal] the
//! bottom-up orders in which scopes and regions are visited.
pub mod analysis;
pub mod passes;
pub mod traversal;
