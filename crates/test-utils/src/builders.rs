use std::path::PathBuf;
use std::time::Duration;

use jobflow::jobfile::{IoSpec, JobSpec};

/// Builder for `JobSpec` to simplify test setup.
///
/// Defaults to inherited stdin/stdout, no timeout and no extra args.
pub struct JobSpecBuilder {
    spec: JobSpec,
}

impl JobSpecBuilder {
    pub fn new(program: &str) -> Self {
        Self {
            spec: JobSpec {
                program: program.to_string(),
                input: IoSpec::Inherit,
                output: IoSpec::Inherit,
                timeout: None,
                args: Vec::new(),
            },
        }
    }

    pub fn reads_pipe(mut self, name: &str) -> Self {
        self.spec.input = IoSpec::Pipe(name.to_string());
        self
    }

    pub fn writes_pipe(mut self, name: &str) -> Self {
        self.spec.output = IoSpec::Pipe(name.to_string());
        self
    }

    pub fn reads_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.spec.input = IoSpec::File(path.into());
        self
    }

    pub fn writes_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.spec.output = IoSpec::File(path.into());
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.spec.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        self
    }

    pub fn arg(mut self, arg: &str) -> Self {
        self.spec.args.push(arg.to_string());
        self
    }

    pub fn build(self) -> JobSpec {
        self.spec
    }
}
