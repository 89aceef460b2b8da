//! Usage and command-listing output.
//!
//! Every renderer takes its destination explicitly; the `print_*` helpers
//! and the ready-made handlers write to stdout.
use crate::command::Command;
use anyhow::Result;
use std::fmt;
use std::io::{self, Write};

/// Spaces between the longest sibling name and the description column.
const NAME_GAP: usize = 3;

impl Command {
    /// Usage line, description, options and direct subcommands, optionally
    /// preceded by an error message.
    pub fn write_help<W: Write + ?Sized>(
        &self,
        out: &mut W,
        err: Option<&dyn fmt::Display>,
    ) -> io::Result<()> {
        if let Some(err) = err {
            writeln!(out, "{err}")?;
            writeln!(out)?;
        }

        writeln!(out, "Usage: {} [OPTIONS] [COMMAND] [arg...]", self.full())?;
        writeln!(out)?;
        writeln!(out, "{}", self.desc())?;
        writeln!(out)?;

        if self.has_options() {
            writeln!(out, "Options:")?;
            out.write_all(self.engine().render_options().as_bytes())?;
            writeln!(out)?;
        }

        if self.has_subcommands() {
            write_commands(self, out, 0, false)?;
        }
        Ok(())
    }

    pub fn print_help(&self, err: Option<&dyn fmt::Display>) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.write_help(&mut out, err)
    }

    /// Description followed by every descendant, indented by depth.
    pub fn write_recursive_help<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", self.desc())?;
        writeln!(out)?;
        writeln!(out, "Commands:")?;
        if self.has_subcommands() {
            write_commands(self, out, 0, true)?;
        }
        Ok(())
    }

    pub fn recursive_help(&self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.write_recursive_help(&mut out)
    }
}

fn write_commands<W: Write + ?Sized>(
    cmd: &Command,
    out: &mut W,
    level: usize,
    recurse: bool,
) -> io::Result<()> {
    if !recurse {
        writeln!(out, "Commands:")?;
    }
    let width = cmd
        .subcommands()
        .map(|sub| sub.name().chars().count())
        .max()
        .unwrap_or(0)
        + NAME_GAP;
    let indent = "  ".repeat(level);
    for sub in cmd.subcommands() {
        writeln!(
            out,
            "{indent}  {name:<width$}{desc}",
            name = sub.name(),
            desc = sub.desc()
        )?;
        if recurse {
            write_commands(sub, out, level + 1, true)?;
        }
    }
    Ok(())
}

/// Handler for commands that only group subcommands: prints help.
pub fn help_only(cmd: &Command) -> Result<()> {
    cmd.print_help(None)?;
    Ok(())
}

/// Handler that prints the whole subtree below `cmd`.
pub fn recursive_help(cmd: &Command) -> Result<()> {
    cmd.recursive_help()?;
    Ok(())
}
