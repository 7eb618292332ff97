//! Scripted in-memory machine for step tests

use anyhow::{Result, bail};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::{Path, PathBuf};

use super::{CommandOutput, Machine};

/// A change to the fake machine, applied when a command runs or a wait
/// would otherwise block
#[derive(Debug, Clone)]
pub enum Effect {
    /// Future `output` calls for this command line return the given output
    Output(String, CommandOutput),
    /// A path starts existing
    Path(PathBuf),
    /// A command appears on `$PATH`
    Command(String),
}

#[derive(Debug)]
pub struct FakeMachine {
    pub home: PathBuf,
    /// Captured outputs keyed by the full command line (`"cmd arg arg"`)
    pub outputs: BTreeMap<String, CommandOutput>,
    /// Commands on `$PATH`
    pub commands: BTreeSet<String>,
    /// Paths that exist but are not text files (sockets, bundles)
    pub paths: BTreeSet<PathBuf>,
    pub files: BTreeMap<PathBuf, String>,
    /// Exit status for `run`/`sudo` by command line (default: success)
    pub statuses: BTreeMap<String, bool>,
    /// Effects triggered by running a command line
    pub effects: BTreeMap<String, Vec<Effect>>,
    /// Effects the "operator" performs while nova waits
    pub operator: Vec<Effect>,
    pub answers: VecDeque<String>,
    /// Every mutating command, sudo ones prefixed with `sudo `
    pub ran: Vec<String>,
    pub notices: Vec<String>,
    pub waits: Vec<String>,
}

impl Default for FakeMachine {
    fn default() -> Self {
        Self {
            home: PathBuf::from("/Users/tester"),
            outputs: BTreeMap::new(),
            commands: BTreeSet::new(),
            paths: BTreeSet::new(),
            files: BTreeMap::new(),
            statuses: BTreeMap::new(),
            effects: BTreeMap::new(),
            operator: Vec::new(),
            answers: VecDeque::new(),
            ran: Vec::new(),
            notices: Vec::new(),
            waits: Vec::new(),
        }
    }
}

impl FakeMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, line: &str, output: CommandOutput) -> Self {
        self.outputs.insert(line.to_string(), output);
        self
    }

    pub fn with_command(mut self, cmd: &str) -> Self {
        self.commands.insert(cmd.to_string());
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.insert(path.into());
        self
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: &str) -> Self {
        self.files.insert(path.into(), contents.to_string());
        self
    }

    pub fn with_status(mut self, line: &str, success: bool) -> Self {
        self.statuses.insert(line.to_string(), success);
        self
    }

    pub fn on_run(mut self, line: &str, effect: Effect) -> Self {
        self.effects.entry(line.to_string()).or_default().push(effect);
        self
    }

    pub fn on_wait(mut self, effect: Effect) -> Self {
        self.operator.push(effect);
        self
    }

    pub fn answering(mut self, answer: &str) -> Self {
        self.answers.push_back(answer.to_string());
        self
    }

    pub fn file(&self, path: &str) -> Option<&str> {
        self.files.get(Path::new(path)).map(String::as_str)
    }

    fn apply_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Output(line, output) => {
                self.outputs.insert(line, output);
            }
            Effect::Path(path) => {
                self.paths.insert(path);
            }
            Effect::Command(cmd) => {
                self.commands.insert(cmd);
            }
        }
    }

    fn execute(&mut self, line: String) -> bool {
        let success = self.statuses.get(&line).copied().unwrap_or(true);
        if success {
            for effect in self.effects.remove(&line).unwrap_or_default() {
                self.apply_effect(effect);
            }
        }
        self.ran.push(line);
        success
    }
}

fn command_line(cmd: &str, args: &[&str]) -> String {
    std::iter::once(cmd)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

impl Machine for FakeMachine {
    fn output(&self, cmd: &str, args: &[&str]) -> Result<CommandOutput> {
        let line = command_line(cmd, args);
        match self.outputs.get(&line) {
            Some(output) => Ok(output.clone()),
            None if self.commands.contains(cmd) => Ok(CommandOutput::failed("")),
            None => bail!("Failed to execute: {line}"),
        }
    }

    fn run(&mut self, cmd: &str, args: &[&str]) -> Result<bool> {
        Ok(self.execute(command_line(cmd, args)))
    }

    fn sudo(&mut self, cmd: &str, args: &[&str]) -> Result<bool> {
        Ok(self.execute(format!("sudo {}", command_line(cmd, args))))
    }

    fn command_exists(&self, cmd: &str) -> bool {
        self.commands.contains(cmd)
    }

    fn exists(&self, path: &Path) -> bool {
        self.paths.contains(path) || self.files.contains_key(path)
    }

    fn read_file(&self, path: &Path) -> Result<Option<String>> {
        Ok(self.files.get(path).cloned())
    }

    fn write_file(&mut self, path: &Path, contents: &str) -> Result<()> {
        self.files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn home_dir(&self) -> Result<PathBuf> {
        Ok(self.home.clone())
    }

    fn prompt(&mut self, prompt: &str, default: &str) -> Result<String> {
        match self.answers.pop_front() {
            Some(answer) if answer.is_empty() => Ok(default.to_string()),
            Some(answer) => Ok(answer),
            None => bail!("unexpected prompt: {prompt}"),
        }
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }

    fn wait_until(&mut self, waiting_for: &str, ready: &mut dyn FnMut(&dyn Machine) -> bool) {
        self.waits.push(waiting_for.to_string());
        if ready(&*self) {
            return;
        }
        for effect in std::mem::take(&mut self.operator) {
            self.apply_effect(effect);
        }
        assert!(ready(&*self), "wait for {waiting_for} would block forever");
    }
}
