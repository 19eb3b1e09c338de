use crate::config::AppConfig;
use crate::error::{Error, ErrorCategory};
use crate::progress::{ProgressReporter, SilentReporter};
use std::fmt;
use std::io::{self, Read};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A fully resolved comparator command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// `<env-runner> <runner-args..> <env-name> <comparator..> --image-one <p1> --image-two <p2>`,
    /// or just the comparator part when no runner is configured.
    pub fn build(config: &AppConfig, image_one: &Path, image_two: &Path) -> Self {
        let mut command = config.comparator_command();
        command.extend([
            "--image-one".to_string(),
            image_one.to_string_lossy().into_owned(),
            "--image-two".to_string(),
            image_two.to_string_lossy().into_owned(),
        ]);

        if config.env_runner.is_empty() {
            let program = command.remove(0);
            return Self {
                program,
                args: command,
            };
        }

        let mut args = config.env_runner_args.clone();
        args.push(config.env_name.clone());
        args.extend(command);
        Self {
            program: config.env_runner.clone(),
            args,
        }
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// What a finished process left behind: its exit code and stdout+stderr interleaved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRun {
    pub exit_code: Option<i32>,
    pub output: String,
}

impl CapturedRun {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Seam between the invoker and the OS. Tests substitute a recording double.
pub trait CommandRunner: Send + Sync {
    fn run(&self, invocation: &Invocation) -> Result<CapturedRun, Error>;
}

/// Spawns the invocation as a child process, blocking until it exits.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<CapturedRun, Error> {
        // Both streams write into one pipe so the captured text keeps the child's ordering.
        let (mut reader, writer) = io::pipe()?;
        let writer_err = writer.try_clone()?;

        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(writer)
            .stderr(writer_err);

        let mut child = command.spawn().map_err(|source| Error::Spawn {
            program: invocation.program.clone(),
            source,
        })?;
        // The command still owns our copies of the write end; the reader only sees EOF once they're gone.
        drop(command);

        let output_thread = thread::spawn(move || {
            let mut buffer = Vec::new();
            reader.read_to_end(&mut buffer).map(|_| buffer)
        });

        let status = match self.timeout {
            None => child.wait()?,
            Some(limit) => match wait_with_deadline(&mut child, limit)? {
                Some(status) => status,
                None => {
                    // Grandchildren may still hold the pipe open; leave the reader detached.
                    return Err(Error::Timeout {
                        secs: limit.as_secs(),
                    });
                }
            },
        };

        let buffer = output_thread
            .join()
            .map_err(|_| Error::Unknown("output reader thread panicked".to_string()))??;

        Ok(CapturedRun {
            exit_code: status.code(),
            output: String::from_utf8_lossy(&buffer).into_owned(),
        })
    }
}

/// `Ok(None)` means the deadline passed and the child was killed.
fn wait_with_deadline(child: &mut Child, limit: Duration) -> io::Result<Option<ExitStatus>> {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if start.elapsed() >= limit {
            warn!("Comparator exceeded {:.0}s, killing pid {}", limit.as_secs_f64(), child.id());
            if let Err(err) = child.kill() {
                error!("Error killing comparator: {}", err);
            }
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(WAIT_POLL_INTERVAL);
    }
}

/// Text handed back to the presentation layer for every comparison attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparisonOutcome {
    /// Comparator output, verbatim.
    Completed(String),
    /// Human-readable description of what went wrong.
    Failed {
        message: String,
        category: ErrorCategory,
    },
}

impl ComparisonOutcome {
    pub fn text(&self) -> &str {
        match self {
            ComparisonOutcome::Completed(text) | ComparisonOutcome::Failed { message: text, .. } => {
                text
            }
        }
    }

    pub fn category(&self) -> Option<ErrorCategory> {
        match self {
            ComparisonOutcome::Completed(_) => None,
            ComparisonOutcome::Failed { category, .. } => Some(*category),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ComparisonOutcome::Completed(_))
    }
}

impl fmt::Display for ComparisonOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

impl From<Error> for ComparisonOutcome {
    fn from(err: Error) -> Self {
        let message = match &err {
            Error::NonZeroExit { output, .. } if !output.trim().is_empty() => {
                format!("Error: {}\n{}", err, output.trim_end())
            }
            _ => format!("Error: {}", err),
        };
        ComparisonOutcome::Failed {
            message,
            category: err.category(),
        }
    }
}

/// Runs the external comparator on two staged images.
pub struct ComparatorInvoker {
    config: AppConfig,
    runner: Box<dyn CommandRunner>,
}

impl ComparatorInvoker {
    pub fn new(config: AppConfig) -> Self {
        let runner = SystemRunner::new(config.timeout());
        Self {
            config,
            runner: Box::new(runner),
        }
    }

    pub fn with_runner(mut self, runner: impl CommandRunner + 'static) -> Self {
        self.runner = Box::new(runner);
        self
    }

    pub fn compare(&self, image_one: &Path, image_two: &Path) -> ComparisonOutcome {
        self.compare_with(image_one, image_two, &SilentReporter)
    }

    pub fn compare_with(
        &self,
        image_one: &Path,
        image_two: &Path,
        reporter: &dyn ProgressReporter,
    ) -> ComparisonOutcome {
        match self.try_compare(image_one, image_two, reporter) {
            Ok(output) => ComparisonOutcome::Completed(output),
            Err(err) => {
                error!("Comparison failed: {}", err);
                err.into()
            }
        }
    }

    fn try_compare(
        &self,
        image_one: &Path,
        image_two: &Path,
        reporter: &dyn ProgressReporter,
    ) -> Result<String, Error> {
        if image_one.as_os_str().is_empty() || image_two.as_os_str().is_empty() {
            return Err(Error::InputMissing);
        }

        let invocation = Invocation::build(&self.config, image_one, image_two);
        let command_line = invocation.command_line();
        info!("Running comparator: {}", command_line);
        reporter.on_compare_start(&command_line);

        let start = Instant::now();
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.runner.run(&invocation)))
            .unwrap_or_else(|_| Err(Error::Unknown("comparator runner panicked".to_string())));
        let duration = start.elapsed();

        let run = match result {
            Ok(run) => run,
            Err(err) => {
                reporter.on_compare_complete(false, duration.as_secs_f64());
                return Err(err);
            }
        };

        debug!(
            "Comparator finished in {:.2}s with exit code {:?}",
            duration.as_secs_f64(),
            run.exit_code
        );
        reporter.on_compare_complete(run.success(), duration.as_secs_f64());

        if run.success() {
            Ok(run.output)
        } else {
            Err(Error::NonZeroExit {
                code: run.exit_code,
                output: run.output,
            })
        }
    }
}
