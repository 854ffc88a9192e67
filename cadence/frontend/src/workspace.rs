use crate::ast::{Program, ScopeDef};
use cadence_utils::{CadenceResult, Error, Id};
use std::{
    io::Read,
    path::{Path, PathBuf},
    str::FromStr,
};

/// A Workspace holds every scope of the program handed over for scheduling.
///
/// The description is a JSON document shaped like [Program]. When no path is
/// given it is read from standard input.
#[derive(Debug, Default)]
pub struct Workspace {
    /// Scope definitions in the order they were given.
    pub scopes: Vec<ScopeDef>,
    /// Name of the top-level scope.
    pub entry: Option<Id>,
    /// Where the description was read from, used in diagnostics.
    pub source: Option<PathBuf>,
}

impl Workspace {
    /// Construct a new workspace from a file, or from stdin when `file` is
    /// `None`.
    pub fn construct(file: &Option<PathBuf>) -> CadenceResult<Self> {
        let mut ws = match file {
            Some(path) => Self::from_path(path)?,
            None => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf.parse::<Workspace>()?
            }
        };
        ws.source = file.clone();
        log::debug!(
            "loaded {} scope(s) from {}",
            ws.scopes.len(),
            ws.source_name()
        );
        Ok(ws)
    }

    fn from_path(path: &Path) -> CadenceResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|err| {
            Error::misc(format!(
                "Failed to read `{}`: {err}",
                path.to_string_lossy()
            ))
        })?;
        content.parse::<Workspace>().map_err(|err| {
            err.with_post_msg(Some(format!(
                "while reading `{}`",
                path.to_string_lossy()
            )))
        })
    }

    /// Name of the input for diagnostics.
    pub fn source_name(&self) -> String {
        self.source
            .as_ref()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|| "<stdin>".to_string())
    }
}

impl From<Program> for Workspace {
    fn from(program: Program) -> Self {
        Workspace {
            scopes: program.scopes,
            entry: program.entry,
            source: None,
        }
    }
}

impl FromStr for Workspace {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let program: Program = serde_json::from_str(s).map_err(Error::parse)?;
        Ok(program.into())
    }
}
