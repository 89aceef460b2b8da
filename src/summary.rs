//! Serializable snapshot of a command tree.
use crate::command::Command;
use crate::option::{OptKind, OptValue};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSummary {
    pub name: String,
    pub full: String,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<CommandSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionSummary {
    pub name: String,
    pub kind: OptKind,
    pub default: OptValue,
    pub description: String,
    /// False when the declared kind and the default disagree.
    pub usable: bool,
}

impl Command {
    /// Snapshot of this node and everything below it, children sorted by name.
    pub fn summary(&self) -> CommandSummary {
        CommandSummary {
            name: self.name().to_string(),
            full: self.full(),
            description: self.desc().to_string(),
            options: self
                .options()
                .map(|opt| OptionSummary {
                    name: opt.name.clone(),
                    kind: opt.kind,
                    default: opt.default.clone(),
                    description: opt.desc.clone(),
                    usable: opt.is_usable(),
                })
                .collect(),
            commands: self.subcommands().map(Command::summary).collect(),
        }
    }
}
