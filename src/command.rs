//! Command tree nodes: registration, lookup and dispatch.
use crate::engine::{Engine, Parsed};
use crate::option::{Opt, OptValue};
use anyhow::Result;
use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};

/// Function run on the terminal node of a dispatch chain.
pub type Handler = Box<dyn Fn(&Command) -> Result<()>>;

#[derive(Debug, Clone)]
struct OptSlot {
    opt: Opt,
    /// `None` when the registration was unusable.
    value: Option<OptValue>,
}

/// One node in a command tree.
///
/// Children are owned by their parent. The parent link is the chain of
/// ancestor names recorded when the node is attached with [`Command::subs`];
/// it is only read to build [`Command::full`].
pub struct Command {
    name: String,
    desc: String,
    opts: BTreeMap<String, OptSlot>,
    args: Vec<String>,
    ancestors: Vec<String>,
    subs: BTreeMap<String, Command>,
    engine: Engine,
    handler: Handler,
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("desc", &self.desc)
            .field("opts", &self.opts)
            .field("args", &self.args)
            .field("ancestors", &self.ancestors)
            .field("subs", &self.subs)
            .finish_non_exhaustive()
    }
}

impl Command {
    pub fn new(
        name: impl Into<String>,
        desc: impl Into<String>,
        handler: impl Fn(&Command) -> Result<()> + 'static,
    ) -> Self {
        let name = name.into();
        let engine = Engine::rebuild(&name, std::iter::empty());
        Self {
            name,
            desc: desc.into(),
            opts: BTreeMap::new(),
            args: Vec::new(),
            ancestors: Vec::new(),
            subs: BTreeMap::new(),
            engine,
            handler: Box::new(handler),
        }
    }

    /// Register options on this node. A later option with the same name
    /// replaces the earlier one.
    ///
    /// An option whose default does not match its declared kind is kept in the
    /// registry but has no usable value: the flag is rejected on the command
    /// line and every accessor reports it as not found.
    pub fn add_opts(mut self, opts: impl IntoIterator<Item = Opt>) -> Self {
        for opt in opts {
            let value = if opt.is_usable() {
                Some(opt.default.clone())
            } else {
                tracing::warn!(
                    command = %self.name,
                    option = %opt.name,
                    declared = %opt.kind,
                    default = %opt.default.kind(),
                    "option registration is unusable"
                );
                None
            };
            self.opts.insert(opt.name.clone(), OptSlot { opt, value });
        }
        self.engine = Engine::rebuild(&self.name, self.opts.values().map(|slot| &slot.opt));
        self
    }

    /// Attach children, keyed by name. A child whose name is already present
    /// replaces the existing entry.
    pub fn subs(mut self, children: impl IntoIterator<Item = Command>) -> Self {
        let path = self.path();
        for mut child in children {
            child.attach(path.clone());
            self.subs.insert(child.name.clone(), child);
        }
        self
    }

    fn attach(&mut self, ancestors: Vec<String>) {
        self.ancestors = ancestors;
        let path = self.path();
        for sub in self.subs.values_mut() {
            sub.attach(path.clone());
        }
    }

    fn path(&self) -> Vec<String> {
        let mut path = self.ancestors.clone();
        path.push(self.name.clone());
        path
    }

    /// Full invocation path, root first, space separated.
    pub fn full(&self) -> String {
        self.path().join(" ")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn desc(&self) -> &str {
        &self.desc
    }

    /// Positional arguments left over after the last parse of this node.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Name of the enclosing command, if this node has been attached.
    pub fn parent(&self) -> Option<&str> {
        self.ancestors.last().map(String::as_str)
    }

    /// Registered options, sorted by name.
    pub fn options(&self) -> impl Iterator<Item = &Opt> {
        self.opts.values().map(|slot| &slot.opt)
    }

    pub fn subcommand(&self, name: &str) -> Option<&Command> {
        self.subs.get(name)
    }

    /// Children, sorted by name.
    pub fn subcommands(&self) -> impl Iterator<Item = &Command> {
        self.subs.values()
    }

    pub(crate) fn has_options(&self) -> bool {
        !self.opts.is_empty()
    }

    pub(crate) fn has_subcommands(&self) -> bool {
        !self.subs.is_empty()
    }

    pub(crate) fn engine(&self) -> &Engine {
        &self.engine
    }

    fn value(&self, name: &str) -> Option<&OptValue> {
        self.opts.get(name)?.value.as_ref()
    }

    pub fn string_opt(&self, name: &str) -> Option<&str> {
        match self.value(name)? {
            OptValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn bool_opt(&self, name: &str) -> Option<bool> {
        match self.value(name)? {
            OptValue::Flag(value) => Some(*value),
            _ => None,
        }
    }

    pub fn int_opt(&self, name: &str) -> Option<i64> {
        match self.value(name)? {
            OptValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Parse `argv` and dispatch, printing parse-error help to stdout.
    ///
    /// `argv[0]` names the invoked command and is skipped. Returns the parse
    /// error of whichever node failed, or the terminal handler's result.
    pub fn run(&mut self, argv: &[String]) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.run_with_output(argv, &mut out)
    }

    /// Same as [`Command::run`], writing parse-error help to `out`.
    pub fn run_with_output<W: Write + ?Sized>(
        &mut self,
        argv: &[String],
        out: &mut W,
    ) -> Result<()> {
        let own_token = [self.name.clone()];
        let argv = if argv.is_empty() { &own_token[..] } else { argv };

        let parsed = match self.engine.parse(self.options(), argv) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::debug!(command = %self.full(), error = %err, "flag parsing failed");
                let shown: &dyn fmt::Display = &err;
                if let Err(io_err) = self.write_help(out, Some(shown)) {
                    tracing::warn!(
                        command = %self.full(),
                        error = %io_err,
                        "failed to write help"
                    );
                }
                return Err(err.into());
            }
        };
        self.apply(parsed);

        if let Some(first) = self.args.first() {
            if let Some(sub) = self.subs.get_mut(first) {
                tracing::debug!(
                    command = %sub.full(),
                    args = ?self.args,
                    "dispatching to subcommand"
                );
                return sub.run_with_output(&self.args, out);
            }
        }

        tracing::debug!(command = %self.full(), args = ?self.args, "invoking handler");
        (self.handler)(self)
    }

    fn apply(&mut self, parsed: Parsed) {
        for slot in self.opts.values_mut() {
            slot.value = slot.opt.is_usable().then(|| slot.opt.default.clone());
        }
        for (name, value) in parsed.values {
            if let Some(slot) = self.opts.get_mut(&name) {
                slot.value = Some(value);
            }
        }
        self.args = parsed.args;
    }
}
