//! Frontend for the Cadence scheduler.
//!
//! The scheduler does not parse source programs itself. Earlier compiler
//! stages hand over an already lowered, typed program as a JSON description
//! whose shape is given by the [ast] module.
pub mod ast;
mod common;
mod workspace;

pub use common::{
    BinaryOp, EdgeKind, JumpKind, PortDirection, Protocol, RelOp, ScopeKind,
    UnaryOp,
};
pub use workspace::Workspace;
