use crate::errors::{MigrateError, Result};
use crate::io::traits::{CommandOutput, CommandRunner, Prompter};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Answers prompts in order; once the script runs out every answer is "no".
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: RefCell<VecDeque<bool>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: RefCell::new(answers.into_iter().collect()),
            asked: RefCell::new(Vec::new()),
        }
    }

    /// Questions asked so far, in order.
    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, question: &str) -> bool {
        self.asked.borrow_mut().push(question.to_string());
        self.answers.borrow_mut().pop_front().unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Succeed,
    Fail,
    Missing,
}

/// Records every command line and replies with a scripted outcome per
/// program. Programs without a script succeed.
#[derive(Debug, Clone, Default)]
pub struct RecordingRunner {
    calls: Arc<Mutex<Vec<String>>>,
    outcomes: Arc<Mutex<HashMap<String, Outcome>>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// `program` starts but exits non-zero.
    pub fn failing(self, program: &str) -> Self {
        self.script(program, Outcome::Fail)
    }

    /// `program` cannot be started at all.
    pub fn missing(self, program: &str) -> Self {
        self.script(program, Outcome::Missing)
    }

    /// Command lines run so far, e.g. `"pnpm install"`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("Lock poisoned").clone()
    }

    fn script(self, program: &str, outcome: Outcome) -> Self {
        self.outcomes
            .lock()
            .expect("Lock poisoned")
            .insert(program.to_string(), outcome);
        self
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, program: &str, args: &[&str], _cwd: &Path) -> Result<CommandOutput> {
        let mut line = program.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        self.calls.lock().expect("Lock poisoned").push(line);

        let outcome = self
            .outcomes
            .lock()
            .expect("Lock poisoned")
            .get(program)
            .copied()
            .unwrap_or(Outcome::Succeed);

        match outcome {
            Outcome::Succeed => Ok(CommandOutput {
                success: true,
                stderr: String::new(),
            }),
            Outcome::Fail => Ok(CommandOutput {
                success: false,
                stderr: format!("{} exited with status 1", program),
            }),
            Outcome::Missing => Err(MigrateError::command(program, "not found on PATH")),
        }
    }
}
