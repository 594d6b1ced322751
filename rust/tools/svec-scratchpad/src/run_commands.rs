use anyhow::Result;

use crate::scenarios::{growth, push_bench, reserve_constructor, reserve_method};

pub type RunFn = fn(&[Option<&str>]) -> Result<()>;

pub struct RunCommand {
    pub name: &'static str,
    pub about: &'static str,
    pub run: RunFn,
}

impl RunCommand {
    pub const fn new(name: &'static str, about: &'static str, run: RunFn) -> Self {
        Self { name, about, run }
    }
}

fn all_scenarios(args: &[Option<&str>]) -> Result<()> {
    reserve_constructor(args)?;
    reserve_method(args)
}

// New commands take `&[Option<&str>]` positional args and get an entry below.
pub static RUN_COMMANDS: &[RunCommand] = &[
    RunCommand::new(
        "reserve-ctor",
        "Construct from a reserve proxy and check the capacity",
        reserve_constructor,
    ),
    RunCommand::new(
        "reserve-method",
        "Reserve, push 0..10, reserve more and check the contents",
        reserve_method,
    ),
    RunCommand::new(
        "scenarios",
        "Run reserve-ctor and reserve-method",
        all_scenarios,
    ),
    RunCommand::new("growth", "Trace capacity changes: growth [count]", growth),
    RunCommand::new(
        "push-bench",
        "Time pushes, reserved pushes, inserts and erases: push-bench [count]",
        push_bench,
    ),
];

pub fn all() -> &'static [RunCommand] {
    RUN_COMMANDS
}

pub fn get(name: &str) -> Option<&'static RunCommand> {
    RUN_COMMANDS
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
}
