//! Scheme-dispatched repository cloning via child processes.

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

use log::info;
use url::Url;

use crate::error::{Error, Result};

/// The version-control tool that clones a given URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneTool {
    Git,
    Hg,
}

impl CloneTool {
    /// Select the clone tool from the URL's scheme and user.
    ///
    /// `ssh://git@...` clones with git, `ssh://hg@...` with Mercurial.
    /// Every other URL is rejected before any process is spawned.
    pub fn for_url(url: &str) -> Result<Self> {
        let parsed = Url::parse(url).map_err(|_| Error::UnsupportedUrl(url.to_string()))?;
        match (parsed.scheme(), parsed.username()) {
            ("ssh", "git") => Ok(CloneTool::Git),
            ("ssh", "hg") => Ok(CloneTool::Hg),
            _ => Err(Error::UnsupportedUrl(url.to_string())),
        }
    }

    /// The executable this tool runs as.
    pub fn program(&self) -> &'static str {
        match self {
            CloneTool::Git => "git",
            CloneTool::Hg => "hg",
        }
    }
}

/// Clone `url` into a subdirectory of `target_dir`, blocking until the
/// external clone process exits.
///
/// The child runs `<tool> clone --quiet <url>` with `target_dir` as its
/// working directory, so the tool itself names the subdirectory. Output is
/// forwarded to this process's stdout as it is produced; a nonzero exit is
/// an error naming the URL, directory, and code.
pub fn clone_repository(url: &str, target_dir: &Path) -> Result<()> {
    let tool = CloneTool::for_url(url)?;
    info!("cloning {url} with {}", tool.program());
    run(quiet_clone_command(tool, url, target_dir), url, target_dir)
}

fn quiet_clone_command(tool: CloneTool, url: &str, target_dir: &Path) -> Command {
    let mut command = Command::new(tool.program());
    command
        .args(["clone", "--quiet", url])
        .current_dir(target_dir)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    command
}

/// Spawn the command and wait for it, draining both of its pipes into our
/// stdout from background threads. The pipes must be drained while waiting;
/// a full pipe blocks the child indefinitely.
fn run(mut command: Command, url: &str, target_dir: &Path) -> Result<()> {
    let mut child = command.spawn()?;

    let stdout = child.stdout.take().map(forward_to_stdout);
    let stderr = child.stderr.take().map(forward_to_stdout);

    let status = child.wait()?;
    for forwarder in [stdout, stderr].into_iter().flatten() {
        let _ = forwarder.join();
    }

    if !status.success() {
        return Err(Error::CloneFailed {
            url: url.to_string(),
            dir: target_dir.to_path_buf(),
            code: status.code().unwrap_or(-1),
        });
    }
    Ok(())
}

fn forward_to_stdout<R>(mut reader: R) -> thread::JoinHandle<()>
where
    R: io::Read + Send + 'static,
{
    thread::spawn(move || {
        let _ = io::copy(&mut reader, &mut io::stdout());
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_git_urls_select_git() {
        assert_eq!(
            CloneTool::for_url("ssh://git@bitbucket.org/acme/widget.git").unwrap(),
            CloneTool::Git
        );
    }

    #[test]
    fn test_hg_urls_select_mercurial() {
        assert_eq!(
            CloneTool::for_url("ssh://hg@bitbucket.org/acme/widget").unwrap(),
            CloneTool::Hg
        );
    }

    #[test]
    fn test_other_schemes_are_rejected() {
        for url in [
            "https://bitbucket.org/acme/widget.git",
            "ssh://deploy@bitbucket.org/acme/widget.git",
            "git@bitbucket.org:acme/widget.git",
            "not a url",
        ] {
            assert!(matches!(
                CloneTool::for_url(url),
                Err(Error::UnsupportedUrl(_))
            ));
        }
    }

    #[test]
    fn test_clone_command_shape() {
        let dir = TempDir::new().unwrap();
        let command = quiet_clone_command(
            CloneTool::Git,
            "ssh://git@bitbucket.org/acme/widget.git",
            dir.path(),
        );

        assert_eq!(command.get_program(), "git");
        let args: Vec<String> = command
            .get_args()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            ["clone", "--quiet", "ssh://git@bitbucket.org/acme/widget.git"]
        );
        assert_eq!(command.get_current_dir(), Some(dir.path()));
    }

    #[test]
    fn test_unsupported_url_fails_before_spawning() {
        let dir = TempDir::new().unwrap();
        let result = clone_repository("https://bitbucket.org/acme/widget.git", dir.path());
        assert!(matches!(result, Err(Error::UnsupportedUrl(_))));
    }

    #[test]
    fn test_successful_child_exit_is_ok() {
        let dir = TempDir::new().unwrap();
        let mut command = Command::new("sh");
        command
            .args(["-c", "echo cloning"])
            .current_dir(dir.path())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        run(command, "ssh://git@example.org/repo.git", dir.path()).unwrap();
    }

    #[test]
    fn test_nonzero_child_exit_reports_url_dir_and_code() {
        let dir = TempDir::new().unwrap();
        let mut command = Command::new("sh");
        command
            .args(["-c", "exit 3"])
            .current_dir(dir.path())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        match run(command, "ssh://git@example.org/repo.git", dir.path()) {
            Err(Error::CloneFailed { url, dir: failed_dir, code }) => {
                assert_eq!(url, "ssh://git@example.org/repo.git");
                assert_eq!(failed_dir, dir.path());
                assert_eq!(code, 3);
            }
            other => panic!("expected CloneFailed, got {other:?}"),
        }
    }
}
