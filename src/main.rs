use anyhow::{Context, Result};
use cmd_tree::{help_only, recursive_help, Command, Opt, ParseError};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const EXIT_USAGE: u8 = 2;

fn main() -> ExitCode {
    init_tracing();

    let argv: Vec<String> = std::env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    let mut root = build_tree();

    match root.run(&argv) {
        Ok(()) => ExitCode::SUCCESS,
        // Help annotated with the parse error has already been printed.
        Err(err) if err.downcast_ref::<ParseError>().is_some() => ExitCode::from(EXIT_USAGE),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout carries only help and command output.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

fn build_tree() -> Command {
    Command::new(
        "cmd-tree-demo",
        "Demonstrates nested command dispatch with typed options",
        cmd_root,
    )
    .add_opts([Opt::bool("json", false, "Print the command tree as JSON")])
    .subs([
        Command::new("greet", "Greet one or more people", cmd_greet).add_opts([
            Opt::string("greeting", "hello", "Word to greet with"),
            Opt::int("times", 1, "Repeat each greeting this many times"),
            Opt::bool("shout", false, "Print in upper case"),
        ]),
        Command::new("math", "Integer arithmetic", help_only).subs([
            Command::new("add", "Add integers to a base value", cmd_add)
                .add_opts([Opt::int("base", 0, "Starting value")]),
            Command::new("mul", "Multiply integers with a base value", cmd_mul)
                .add_opts([Opt::int("base", 1, "Starting value")]),
        ]),
        Command::new("tree", "Show every command", recursive_help),
    ])
}

fn cmd_root(cmd: &Command) -> Result<()> {
    if cmd.bool_opt("json").unwrap_or(false) {
        let text =
            serde_json::to_string_pretty(&cmd.summary()).context("serialize command tree")?;
        println!("{text}");
        return Ok(());
    }
    cmd.print_help(None)?;
    Ok(())
}

fn cmd_greet(cmd: &Command) -> Result<()> {
    let greeting = cmd.string_opt("greeting").unwrap_or("hello");
    let times = cmd.int_opt("times").unwrap_or(1);
    let shout = cmd.bool_opt("shout").unwrap_or(false);

    let names: Vec<&str> = if cmd.args().is_empty() {
        vec!["world"]
    } else {
        cmd.args().iter().map(String::as_str).collect()
    };
    for name in names {
        for _ in 0..times {
            let line = format!("{greeting}, {name}!");
            if shout {
                println!("{}", line.to_uppercase());
            } else {
                println!("{line}");
            }
        }
    }
    Ok(())
}

fn cmd_add(cmd: &Command) -> Result<()> {
    let base = cmd.int_opt("base").unwrap_or(0);
    let total = integer_args(cmd)?
        .into_iter()
        .try_fold(base, i64::checked_add)
        .context("sum overflows a 64-bit integer")?;
    println!("{total}");
    Ok(())
}

fn cmd_mul(cmd: &Command) -> Result<()> {
    let base = cmd.int_opt("base").unwrap_or(1);
    let total = integer_args(cmd)?
        .into_iter()
        .try_fold(base, i64::checked_mul)
        .context("product overflows a 64-bit integer")?;
    println!("{total}");
    Ok(())
}

fn integer_args(cmd: &Command) -> Result<Vec<i64>> {
    cmd.args()
        .iter()
        .map(|arg| {
            arg.parse::<i64>()
                .with_context(|| format!("{}: not an integer: {arg}", cmd.full()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn demo_tree_shape() {
        let root = build_tree();
        let names: Vec<&str> = root.subcommands().map(Command::name).collect();
        assert_eq!(names, vec!["greet", "math", "tree"]);
        let add = root
            .subcommand("math")
            .and_then(|math| math.subcommand("add"))
            .expect("math add");
        assert_eq!(add.full(), "cmd-tree-demo math add");
    }

    #[test]
    fn arithmetic_handlers_reject_non_integers() {
        let mut root = build_tree();
        let err = root
            .run(&argv(&["cmd-tree-demo", "math", "add", "1", "two"]))
            .expect_err("non-integer argument");
        assert!(err.to_string().contains("not an integer: two"));
        assert!(err.downcast_ref::<ParseError>().is_none());
    }

    #[test]
    fn arithmetic_handlers_detect_overflow() {
        let mut root = build_tree();
        let err = root
            .run(&argv(&[
                "cmd-tree-demo",
                "math",
                "mul",
                "--base=9223372036854775807",
                "2",
            ]))
            .expect_err("overflow");
        assert!(err.to_string().contains("overflows"));
    }
}
