use crate::{PortDirection, Protocol, ScopeIdx};

/// Backing store of a sequence-typed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemInfo {
    /// Small and simple enough to be implemented with plain registers.
    pub can_be_reg: bool,
    pub immutable: bool,
    pub writable: bool,
}

impl Default for MemInfo {
    fn default() -> Self {
        MemInfo {
            can_be_reg: false,
            immutable: false,
            writable: true,
        }
    }
}

impl MemInfo {
    /// A register-mapped memory.
    pub fn reg() -> Self {
        MemInfo {
            can_be_reg: true,
            ..Default::default()
        }
    }

    /// A block memory that is written to.
    pub fn block() -> Self {
        MemInfo::default()
    }
}

/// The type of a symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Int { width: u32, signed: bool },
    Bool,
    Seq { len: Option<u64>, mem: MemInfo },
    Port {
        protocol: Protocol,
        direction: PortDirection,
    },
    /// Instance of a class scope, if known.
    Object(Option<ScopeIdx>),
    Function(ScopeIdx),
    None,
    Undef,
}

impl Type {
    pub fn int(width: u32) -> Self {
        Type::Int {
            width,
            signed: true,
        }
    }

    pub fn port(protocol: Protocol) -> Self {
        Type::Port {
            protocol,
            direction: PortDirection::default(),
        }
    }

    pub fn seq(mem: MemInfo) -> Self {
        Type::Seq { len: None, mem }
    }

    pub fn is_port(&self) -> bool {
        matches!(self, Type::Port { .. })
    }

    pub fn is_seq(&self) -> bool {
        matches!(self, Type::Seq { .. })
    }

    /// The memory behind a sequence type.
    pub fn mem(&self) -> Option<&MemInfo> {
        match self {
            Type::Seq { mem, .. } => Some(mem),
            _ => None,
        }
    }

    pub fn protocol(&self) -> Option<Protocol> {
        match self {
            Type::Port { protocol, .. } => Some(*protocol),
            _ => None,
        }
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Int { width, signed } => {
                write!(f, "{}int{width}", if *signed { "" } else { "u" })
            }
            Type::Bool => write!(f, "bool"),
            Type::Seq { len, mem } => {
                write!(f, "seq")?;
                if let Some(len) = len {
                    write!(f, "[{len}]")?;
                }
                if mem.can_be_reg {
                    write!(f, "<reg>")?;
                }
                Ok(())
            }
            Type::Port { protocol, .. } => write!(f, "port<{protocol:?}>"),
            Type::Object(Some(s)) => write!(f, "object#{s}"),
            Type::Object(None) => write!(f, "object"),
            Type::Function(s) => write!(f, "function#{s}"),
            Type::None => write!(f, "none"),
            Type::Undef => write!(f, "undef"),
        }
    }
}
