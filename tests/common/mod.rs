//! Shared helpers for command tree integration tests.

use cmd_tree::Command;
use std::cell::RefCell;
use std::rc::Rc;

/// Split a shell-style command line into argv.
pub fn argv(line: &str) -> Vec<String> {
    shell_words::split(line).expect("valid command line")
}

/// What a handler saw when it ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub full: String,
    pub args: Vec<String>,
}

/// Shared log of handler invocations.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    calls: Rc<RefCell<Vec<Invocation>>>,
}

impl Recorder {
    /// Build a command whose handler appends to this recorder.
    pub fn command(&self, name: &str, desc: &str) -> Command {
        let calls = Rc::clone(&self.calls);
        Command::new(name, desc, move |cmd: &Command| {
            calls.borrow_mut().push(Invocation {
                full: cmd.full(),
                args: cmd.args().to_vec(),
            });
            Ok(())
        })
    }

    /// Not every test binary inspects calls.
    #[allow(dead_code)]
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }
}

/// Run `line` against `root`, returning the result and whatever help was
/// written for a parse error.
pub fn run_captured(root: &mut Command, line: &str) -> (anyhow::Result<()>, String) {
    let mut out = Vec::new();
    let result = root.run_with_output(&argv(line), &mut out);
    (result, String::from_utf8(out).expect("utf8 help"))
}
