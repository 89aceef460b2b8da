//! Flag-parsing engine backed by the `clap` builder API.
//!
//! Each command node owns one engine. The engine is rebuilt from the node's
//! registry whenever it changes, so a re-registered name simply replaces the
//! earlier argument instead of tripping clap's duplicate-id checks.
use crate::error::ParseError;
use crate::option::{parse_bool, parse_int, Opt, OptKind, OptValue};
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Arg, ArgAction, ArgMatches};

// Ids contain `=`, which no usable option name may.
const POSITIONAL_ID: &str = "=positional";
const HELP_ID: &str = "=help";

/// Result of parsing one node's slice of the command line.
#[derive(Debug, Default)]
pub(crate) struct Parsed {
    pub(crate) values: Vec<(String, OptValue)>,
    pub(crate) args: Vec<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct Engine {
    cmd: clap::Command,
}

impl Engine {
    /// Rebuild from the usable options of a node, in name order.
    pub(crate) fn rebuild<'a>(name: &str, opts: impl IntoIterator<Item = &'a Opt>) -> Self {
        let mut defines_help = false;
        let mut defines_h = false;
        let mut cmd = base_command(name);
        for opt in opts {
            if !opt.is_usable() {
                continue;
            }
            defines_help |= opt.name == "help";
            defines_h |= opt.name == "h";
            cmd = cmd.arg(option_arg(opt));
        }

        // `--help`/`-help` and `-h` each request help unless an option owns the name.
        let help = Arg::new(HELP_ID).action(ArgAction::SetTrue).hide(true);
        let help = match (defines_help, defines_h) {
            (false, false) => Some(help.long("help").alias("h")),
            (false, true) => Some(help.long("help")),
            (true, false) => Some(help.long("h")),
            (true, true) => None,
        };
        if let Some(help) = help {
            cmd = cmd.arg(help);
        }
        Self { cmd }
    }

    /// Parse `argv`, where `argv[0]` is the command token and is skipped.
    pub(crate) fn parse<'a>(
        &self,
        opts: impl IntoIterator<Item = &'a Opt>,
        argv: &[String],
    ) -> Result<Parsed, ParseError> {
        let opts: Vec<&Opt> = opts.into_iter().filter(|opt| opt.is_usable()).collect();
        let matches = self
            .cmd
            .clone()
            .try_get_matches_from(long_form_flags(argv, &opts))
            .map_err(|err| translate_error(&err))?;

        if matches!(matches.try_get_one::<bool>(HELP_ID), Ok(Some(true))) {
            return Err(ParseError::HelpRequested);
        }

        let mut parsed = Parsed {
            values: Vec::new(),
            args: matches
                .get_many::<String>(POSITIONAL_ID)
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),
        };
        for opt in opts {
            let value = parsed_value(&matches, opt).unwrap_or_else(|| opt.default.clone());
            parsed.values.push((opt.name.clone(), value));
        }
        Ok(parsed)
    }

    /// Option table in the engine's own help layout.
    pub(crate) fn render_options(&self) -> String {
        let rendered = self
            .cmd
            .clone()
            .help_template("{options}")
            .render_help()
            .to_string();
        let mut out = String::new();
        for line in rendered.trim_end().lines().skip_while(|line| line.trim().is_empty()) {
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}

/// Rewrite single-dash flags (`-count=5`, `-loud`) to their `--` form.
///
/// Stops at `--` or the first positional. The token after an integer or
/// string flag without `=` is its value and is passed through untouched.
fn long_form_flags(argv: &[String], opts: &[&Opt]) -> Vec<String> {
    let mut out = Vec::with_capacity(argv.len());
    let mut tokens = argv.iter();
    if let Some(command) = tokens.next() {
        out.push(command.clone());
    }
    while let Some(token) = tokens.next() {
        if token == "--" || token == "-" || !token.starts_with('-') {
            out.push(token.clone());
            out.extend(tokens.by_ref().cloned());
            break;
        }
        let flag = if token.starts_with("--") {
            token.clone()
        } else {
            format!("-{token}")
        };
        let takes_value = !flag.contains('=')
            && opts
                .iter()
                .any(|opt| opt.kind != OptKind::Boolean && flag[2..] == opt.name);
        out.push(flag);
        if takes_value {
            if let Some(value) = tokens.next() {
                out.push(value.clone());
            }
        }
    }
    out
}

fn base_command(name: &str) -> clap::Command {
    clap::Command::new(name.to_string())
        .disable_help_flag(true)
        .disable_version_flag(true)
        .disable_help_subcommand(true)
        .disable_colored_help(true)
        .args_override_self(true)
        .arg(
            Arg::new(POSITIONAL_ID)
                .num_args(1..)
                .trailing_var_arg(true)
                .hide(true),
        )
}

fn option_arg(opt: &Opt) -> Arg {
    let mut arg = Arg::new(opt.name.clone())
        .long(opt.name.clone())
        .value_name(opt.kind.value_name())
        .help(opt.desc.clone());
    arg = match opt.kind {
        OptKind::Integer => arg
            .action(ArgAction::Set)
            .allow_hyphen_values(true)
            .value_parser(parse_int),
        OptKind::String => arg.action(ArgAction::Set).allow_hyphen_values(true),
        OptKind::Boolean => arg
            .action(ArgAction::Set)
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true")
            .value_parser(parse_bool),
    };
    if !opt.default.is_zero() {
        arg = arg.default_value(opt.default.to_string());
    }
    arg
}

fn parsed_value(matches: &ArgMatches, opt: &Opt) -> Option<OptValue> {
    let id = opt.name.as_str();
    match opt.kind {
        OptKind::Integer => matches.get_one::<i64>(id).copied().map(OptValue::Integer),
        OptKind::String => matches.get_one::<String>(id).cloned().map(OptValue::Text),
        OptKind::Boolean => matches.get_one::<bool>(id).copied().map(OptValue::Flag),
    }
}

fn translate_error(err: &clap::Error) -> ParseError {
    let flag = context_string(err, ContextKind::InvalidArg)
        .map(|arg| flag_token(&arg))
        .unwrap_or_default();
    let value = context_string(err, ContextKind::InvalidValue).unwrap_or_default();
    match err.kind() {
        ErrorKind::UnknownArgument => ParseError::UnknownFlag(flag),
        ErrorKind::InvalidValue if value.is_empty() => ParseError::MissingValue(flag),
        ErrorKind::InvalidValue | ErrorKind::ValueValidation => ParseError::InvalidValue {
            flag,
            value,
            reason: std::error::Error::source(err)
                .map(|source| source.to_string())
                .unwrap_or_else(|| "parse error".to_string()),
        },
        ErrorKind::NoEquals => ParseError::InvalidValue {
            flag,
            value,
            reason: "boolean flags take their value as --name=<bool>".to_string(),
        },
        kind => ParseError::Malformed(
            kind.as_str()
                .unwrap_or("invalid command line")
                .to_string(),
        ),
    }
}

fn context_string(err: &clap::Error, kind: ContextKind) -> Option<String> {
    match err.get(kind)? {
        ContextValue::String(value) => Some(value.clone()),
        _ => None,
    }
}

/// clap renders the offending argument with its placeholder (`--count <int>`);
/// keep only the flag itself.
fn flag_token(rendered: &str) -> String {
    rendered
        .split(|c: char| c.is_whitespace() || c == '[' || c == '=')
        .next()
        .unwrap_or(rendered)
        .to_string()
}
