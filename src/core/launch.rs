//! Process replacement.
//!
//! Hands control to the target executable with a [`LaunchEnvironment`] as
//! its complete environment. On Unix this is `execve`: the launcher's image
//! is replaced and nothing after the call runs. Elsewhere the target is
//! spawned as a child, the launcher's copy of the environment is dropped
//! immediately, and the child's exit status is forwarded.

use std::ffi::{OsStr, OsString};
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

use crate::core::constants;
use crate::core::env::LaunchEnvironment;
use crate::error::Error;

/// The program to hand off to, and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    program: OsString,
    args: Vec<OsString>,
}

impl Target {
    pub fn new<I, A>(program: impl Into<OsString>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// The program as given, which is also used as `argv[0]`.
    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Resolve the program the way `execvp` would, using the launch
    /// environment's `PATH`, or `/usr/bin:/bin` when it has none.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProcessReplaceFailed`] if the program does not exist
    /// or is not executable.
    pub fn resolve(&self, env: &LaunchEnvironment) -> Result<PathBuf, Error> {
        let cwd = std::env::current_dir().map_err(|e| self.fail(e))?;
        let path = env
            .get("PATH")
            .unwrap_or_else(|| OsStr::new(constants::DEFAULT_PATH));
        which::which_in(&self.program, Some(path), cwd).map_err(|e| self.fail(e))
    }

    fn fail(&self, reason: impl ToString) -> Error {
        Error::ProcessReplaceFailed {
            program: self.program.to_string_lossy().into_owned(),
            reason: reason.to_string(),
        }
    }
}

/// Replace the current process with `target`.
///
/// Returns only on failure. The target inherits stdin, stdout, and stderr
/// unchanged and sees exactly `env`, nothing else.
pub fn replace(target: &Target, env: LaunchEnvironment) -> Error {
    let program = match target.resolve(&env) {
        Ok(program) => program,
        Err(e) => return e,
    };

    debug!(
        program = %program.display(),
        args = target.args.len(),
        vars = env.len(),
        "handing off to target"
    );

    let mut cmd = Command::new(&program);
    cmd.args(&target.args).env_clear().envs(env.iter());

    // Anything buffered would be lost once the image is gone.
    if let Err(e) = std::io::stdout().flush() {
        debug!(error = %e, "failed to flush stdout before handoff");
    }

    handoff(target, cmd, env)
}

#[cfg(unix)]
fn handoff(target: &Target, mut cmd: Command, env: LaunchEnvironment) -> Error {
    use std::os::unix::process::CommandExt;

    cmd.arg0(&target.program);
    // `cmd` holds its own copy from here on.
    drop(env);

    let err = cmd.exec();
    target.fail(err)
}

#[cfg(not(unix))]
fn handoff(target: &Target, mut cmd: Command, env: LaunchEnvironment) -> Error {
    let spawned = cmd.spawn();
    drop(cmd);
    drop(env);

    let mut child = match spawned {
        Ok(child) => child,
        Err(e) => return target.fail(e),
    };
    match child.wait() {
        Ok(status) => std::process::exit(status.code().unwrap_or(1)),
        Err(e) => target.fail(e),
    }
}
