//! Closed vocabularies shared by the AST and the IR.
use serde::{Deserialize, Serialize};

/// Kind of a dependency edge in an operation graph.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// True data dependency.
    DefUse,
    /// Sequencing of side effects.
    Seq,
    /// Write-after-read.
    Anti,
    /// Loop-carried order. Never constrains cycle assignment.
    Back,
}

/// Handshake protocol of a hardware port.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
    /// Raw wire, no handshake.
    #[default]
    None,
    Valid,
    ReadyValid,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PortDirection {
    #[default]
    Input,
    Output,
    Inout,
}

/// What a scope is. Call-target classification is derived from the kind of
/// the callee and the kind of its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    Function,
    Method,
    Class,
    Testbench,
    Module,
    /// A port type whose methods are port accessors.
    PortClass,
    /// A queue type whose `rd`/`wr` methods are queue endpoints.
    QueueClass,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum JumpKind {
    #[default]
    Plain,
    Break,
    Continue,
    LoopBack,
    Specific,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    USub,
    UAdd,
    Not,
    Invert,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Sub,
    Mult,
    FloorDiv,
    Mod,
    LShift,
    RShift,
    BitOr,
    BitXor,
    BitAnd,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RelOp {
    And,
    Or,
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    Is,
    IsNot,
}

impl UnaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::USub => "-",
            UnaryOp::UAdd => "+",
            UnaryOp::Not => "!",
            UnaryOp::Invert => "~",
        }
    }
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mult => "*",
            BinaryOp::FloorDiv => "//",
            BinaryOp::Mod => "%",
            BinaryOp::LShift => "<<",
            BinaryOp::RShift => ">>",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::BitAnd => "&",
        }
    }
}

impl RelOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            RelOp::And => "&&",
            RelOp::Or => "||",
            RelOp::Eq => "==",
            RelOp::NotEq => "!=",
            RelOp::Lt => "<",
            RelOp::LtE => "<=",
            RelOp::Gt => ">",
            RelOp::GtE => ">=",
            RelOp::Is => "is",
            RelOp::IsNot => "is not",
        }
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EdgeKind::DefUse => "DefUse",
            EdgeKind::Seq => "Seq",
            EdgeKind::Anti => "Anti",
            EdgeKind::Back => "Back",
        };
        f.write_str(s)
    }
}
