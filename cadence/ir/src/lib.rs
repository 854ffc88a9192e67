//! Internal representation for the Cadence scheduler.
//!
//! The representation is generated from the frontend AST.
//! The key differences between the frontend AST and the IR are:
//! 1. The IR refers to symbols, blocks, regions and scopes through typed
//!    indices instead of names.
//! 2. Every structural region carries its operation graph.

// Modules defining internal structures.
mod builder;
mod context;
mod expr;
mod graph;
mod printer;
mod scope;
mod stm;
mod symbol;
mod types;

// Re-export types at the module level.
pub use builder::Builder;
pub use cadence_utils::{GetName, Id};
pub use context::Context;
pub use expr::{Builtin, Const, Expr};
pub use graph::{NodeIdx, NodeTag, OpGraph, OpNode};
pub use printer::Printer;
pub use scope::{CalleeKind, RegionIdx, Scope, ScopeIdx};
pub use stm::{Block, BlockIdx, SchedulingMode, Stm, StmKind};
pub use symbol::{SymIdx, Symbol};
pub use types::{MemInfo, Type};

// Re-export types from the frontend.
pub use cadence_frontend::{
    BinaryOp, EdgeKind, JumpKind, PortDirection, Protocol, RelOp, ScopeKind,
    UnaryOp,
};

/// Module to transform AST programs into IR.
pub mod from_ast;
