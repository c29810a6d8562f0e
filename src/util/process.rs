//! Subprocess execution utilities.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

use crate::util::shlex;

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    env: BTreeMap<String, String>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            env: BTreeMap::new(),
            cwd: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set an environment variable, on top of the inherited environment.
    pub fn env(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.env
            .insert(key.as_ref().to_string(), value.as_ref().to_string());
        self
    }

    /// Set several environment variables.
    pub fn envs<'a>(mut self, vars: impl IntoIterator<Item = (&'a String, &'a String)>) -> Self {
        for (key, value) in vars {
            self.env.insert(key.clone(), value.clone());
        }
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Get the program path.
    pub fn get_program(&self) -> &Path {
        &self.program
    }

    /// Get the arguments.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Get the environment overlay.
    pub fn get_envs(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    /// Get the working directory.
    pub fn get_cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// Build the Command.
    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.envs(&self.env);

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Run the command with stdout and stderr merged into one pipe, handing
    /// each output line to `on_line` as it arrives.
    ///
    /// A reader thread drains the pipe while this thread waits for the
    /// child to exit, so a chatty child never blocks on a full pipe. The
    /// reader is joined before returning, including when the child fails
    /// to start.
    pub fn exec_streaming<F>(&self, on_line: F) -> io::Result<ExitStatus>
    where
        F: FnMut(&str) + Send + 'static,
    {
        let (reader, writer) = io::pipe()?;

        let mut cmd = self.build_command();
        cmd.stdin(Stdio::null());
        cmd.stdout(writer.try_clone()?);
        cmd.stderr(writer);

        // The reader starts before the child, so a running child always has
        // someone draining its output.
        let drain = thread::Builder::new()
            .name("ferry-output".to_string())
            .spawn(move || drain_lines(reader, on_line))?;

        let spawned = cmd.spawn();
        // The command holds our copies of the write end; the reader only
        // sees EOF once they are gone.
        drop(cmd);
        let status = spawned.and_then(|mut child| child.wait());

        if drain.join().is_err() {
            tracing::warn!("output reader for `{}` panicked", self.program.display());
        }

        status
    }

    /// Execute and return status only, discarding all output.
    pub fn status_quiet(&self) -> io::Result<ExitStatus> {
        let mut cmd = self.build_command();
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd.status()
    }

    /// Display the command, shell-quoted, for logs and error messages.
    pub fn display_command(&self) -> String {
        let program = self.program.to_string_lossy();
        shlex::join(std::iter::once(&*program).chain(self.args.iter().map(String::as_str)))
    }
}

fn drain_lines<R: io::Read>(reader: R, mut on_line: impl FnMut(&str)) {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                on_line(line.trim_end_matches(['\n', '\r']));
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            // The pipe can report an error while the child is torn down.
            Err(_) => break,
        }
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}
