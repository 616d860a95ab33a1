//! Launching batches of ns-3 runs.
//!
//! Every job of a [`BatchRun`] becomes one `./waf --run "<program> <config> <args>"` invocation
//! in the ns-3 directory. All jobs are started before any of them is waited on.

use std::io;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus};

use log::{info, warn};

/// One simulation run.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Job {
    /// The simulation config, relative to the ns-3 directory or absolute.
    pub config: PathBuf,
    /// Extra arguments passed to the program after the config.
    #[serde(default)]
    pub args: Vec<String>,
}

/// A batch of ns-3 runs.
#[derive(Debug, typed_builder::TypedBuilder)]
pub struct BatchRun {
    /// The directory in the ns-3 source tree containing `waf`.
    #[builder(setter(into))]
    pub ns3_dir: PathBuf,
    /// The command that builds and runs ns-3 programs.
    #[builder(default = String::from("./waf"), setter(into))]
    pub launcher: String,
    /// The ns-3 program to run.
    #[builder(default = String::from("scratch/pfc-cyq"), setter(into))]
    pub program: String,
    /// The runs to launch.
    pub jobs: Vec<Job>,
}

impl BatchRun {
    /// The shell command that runs `job`.
    pub fn command_line(&self, job: &Job) -> String {
        let mut run = format!("{} {}", self.program, job.config.display());
        for arg in &job.args {
            run.push(' ');
            run.push_str(arg);
        }
        format!("{} --run \"{run}\"", self.launcher)
    }

    /// Launch every job, then wait for all of them.
    ///
    /// Jobs that exit unsuccessfully are reported in the returned outcomes, not as errors. If a
    /// job cannot be launched, the jobs launched before it are still waited for.
    pub fn run(&self) -> Result<Vec<JobOutcome>, BatchError> {
        let mut children: Vec<(String, Child)> = Vec::with_capacity(self.jobs.len());
        for job in &self.jobs {
            let command = self.command_line(job);
            info!("{command}");
            match self.spawn(&command) {
                Ok(child) => children.push((command, child)),
                Err(source) => {
                    wait_all(children)?;
                    return Err(BatchError::Spawn { command, source });
                }
            }
        }
        let outcomes = wait_all(children)?;
        info!("Done!");
        Ok(outcomes)
    }

    fn spawn(&self, command: &str) -> io::Result<Child> {
        Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(&self.ns3_dir)
            .spawn()
    }
}

fn wait_all(children: Vec<(String, Child)>) -> Result<Vec<JobOutcome>, BatchError> {
    children
        .into_iter()
        .map(|(command, mut child)| match child.wait() {
            Ok(status) => {
                if !status.success() {
                    warn!("`{command}` exited with {status}");
                }
                Ok(JobOutcome { command, status })
            }
            Err(source) => Err(BatchError::Wait { command, source }),
        })
        .collect()
}

/// How a job ended.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    /// The command that was run.
    pub command: String,
    /// The exit status of the shell running it.
    pub status: ExitStatus,
}

/// The error type for [BatchRun::run].
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// A job could not be started.
    #[error("failed to launch `{command}`")]
    Spawn {
        /// The job's command.
        command: String,
        /// The underlying error.
        source: io::Error,
    },

    /// Waiting for a job failed.
    #[error("failed to wait for `{command}`")]
    Wait {
        /// The job's command.
        command: String,
        /// The underlying error.
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(config: &str, args: &[&str]) -> Job {
        Job {
            config: config.into(),
            args: args.iter().map(|&a| a.to_owned()).collect(),
        }
    }

    #[test]
    fn command_line_correct() {
        let batch = BatchRun::builder()
            .ns3_dir("/opt/ns3")
            .jobs(vec![])
            .build();
        assert_eq!(
            batch.command_line(&job("ns3_config/irn/acrossDC/inter-dc-config-20.json", &["20"])),
            "./waf --run \"scratch/pfc-cyq ns3_config/irn/acrossDC/inter-dc-config-20.json 20\""
        );
        assert_eq!(
            batch.command_line(&job("a.json", &[])),
            "./waf --run \"scratch/pfc-cyq a.json\""
        );
    }

    #[cfg(unix)]
    #[test]
    fn runs_every_job_in_the_ns3_dir() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("record.sh"), "printf '%s\\n' \"$2\" >> runs.txt\n")?;
        let batch = BatchRun::builder()
            .ns3_dir(dir.path())
            .launcher("sh record.sh")
            .program("scratch/test")
            .jobs(vec![job("a.json", &["20"]), job("b.json", &["40"])])
            .build();
        let outcomes = batch.run()?;
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.status.success()));
        let runs = std::fs::read_to_string(dir.path().join("runs.txt"))?;
        let mut runs = runs.lines().collect::<Vec<_>>();
        runs.sort_unstable();
        assert_eq!(runs, vec!["scratch/test a.json 20", "scratch/test b.json 40"]);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn failed_jobs_are_reported() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let batch = BatchRun::builder()
            .ns3_dir(dir.path())
            .launcher("false")
            .jobs(vec![job("a.json", &[])])
            .build();
        let outcomes = batch.run()?;
        assert_eq!(outcomes.len(), 1);
        assert!(!outcomes[0].status.success());
        Ok(())
    }

    #[test]
    fn missing_ns3_dir_fails_to_launch() {
        let batch = BatchRun::builder()
            .ns3_dir("/nonexistent/ns3/dir")
            .jobs(vec![job("a.json", &[])])
            .build();
        assert!(matches!(batch.run(), Err(BatchError::Spawn { .. })));
    }
}
