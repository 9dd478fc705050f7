use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::foundation::error::{WavyteError, WavyteResult};

/// Append-only sink for encoder input arguments.
///
/// Calls are order-sensitive: options always apply to the most recently added input.
pub trait CommandBuilder {
    /// Start a new input reading from `path`.
    fn add_input(&mut self, path: &Path) -> WavyteResult<()>;
    /// Append raw flags to the current input, e.g. `["-c:v", "libvpx-vp9"]`.
    fn add_input_options(&mut self, flags: &[&str]) -> WavyteResult<()>;
    /// Append a `name value` pair to the current input.
    fn input_option(&mut self, name: &str, value: &str) -> WavyteResult<()>;
}

/// One recorded [`CommandBuilder`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuilderCall {
    /// `add_input(path)`.
    AddInput(PathBuf),
    /// `add_input_options(flags)`.
    AddInputOptions(Vec<String>),
    /// `input_option(name, value)`.
    InputOption {
        /// Option name, including the leading dash.
        name: String,
        /// Option value.
        value: String,
    },
}

/// Builder that only records calls, for tests and debugging.
#[derive(Debug, Default)]
pub struct RecordingCommandBuilder {
    calls: Vec<BuilderCall>,
}

impl RecordingCommandBuilder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the recorded calls in order.
    pub fn calls(&self) -> &[BuilderCall] {
        &self.calls
    }
}

impl CommandBuilder for RecordingCommandBuilder {
    fn add_input(&mut self, path: &Path) -> WavyteResult<()> {
        self.calls.push(BuilderCall::AddInput(path.to_path_buf()));
        Ok(())
    }

    fn add_input_options(&mut self, flags: &[&str]) -> WavyteResult<()> {
        self.calls.push(BuilderCall::AddInputOptions(
            flags.iter().map(|f| (*f).to_owned()).collect(),
        ));
        Ok(())
    }

    fn input_option(&mut self, name: &str, value: &str) -> WavyteResult<()> {
        self.calls.push(BuilderCall::InputOption {
            name: name.to_owned(),
            value: value.to_owned(),
        });
        Ok(())
    }
}

/// A single encoder input and the options that precede its `-i`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputSpec {
    /// Media path passed to `-i`.
    pub path: PathBuf,
    /// Input-level options in insertion order.
    pub options: Vec<String>,
}

/// Builder producing `ffmpeg` input arguments.
#[derive(Clone, Debug, Default)]
pub struct FfmpegInputs {
    inputs: Vec<InputSpec>,
}

impl FfmpegInputs {
    /// Create an empty input list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the inputs in insertion order.
    pub fn inputs(&self) -> &[InputSpec] {
        &self.inputs
    }

    /// Number of inputs.
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// Return `true` when no input was added.
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Render the input section of an `ffmpeg` command line.
    ///
    /// Each input becomes `[options..., "-i", path]`.
    pub fn to_args(&self) -> Vec<OsString> {
        let mut args = Vec::new();
        for input in &self.inputs {
            args.extend(input.options.iter().map(OsString::from));
            args.push(OsString::from("-i"));
            args.push(input.path.clone().into_os_string());
        }
        args
    }

    /// Append the input section to `cmd`.
    pub fn apply_to(&self, cmd: &mut Command) {
        cmd.args(self.to_args());
    }

    fn current(&mut self) -> WavyteResult<&mut InputSpec> {
        self.inputs
            .last_mut()
            .ok_or_else(|| WavyteError::validation("input option given before any input"))
    }
}

impl CommandBuilder for FfmpegInputs {
    fn add_input(&mut self, path: &Path) -> WavyteResult<()> {
        self.inputs.push(InputSpec {
            path: path.to_path_buf(),
            options: Vec::new(),
        });
        Ok(())
    }

    fn add_input_options(&mut self, flags: &[&str]) -> WavyteResult<()> {
        let input = self.current()?;
        input.options.extend(flags.iter().map(|f| (*f).to_owned()));
        Ok(())
    }

    fn input_option(&mut self, name: &str, value: &str) -> WavyteResult<()> {
        let input = self.current()?;
        input.options.push(name.to_owned());
        input.options.push(value.to_owned());
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/command.rs"]
mod tests;
