//! Recording fakes shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use xcframework_maker::tools::{
    ArchDiscovery, BinaryMerger, BinaryThinner, FrameworkCopier, PathRemover, ShellOutput,
    ShellRunner, TempDirFactory, XcframeworkAssembler,
};
use xcframework_maker::{Arch, Error, Log, LogLevel, OptionalLog, Result, SimulatorPatcher};

/// One collaborator call, in the order it happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    CreateTempDir,
    Archs(PathBuf),
    Copy {
        framework: PathBuf,
        archs: Vec<Arch>,
        destination: PathBuf,
    },
    Patch {
        device: PathBuf,
        simulator: PathBuf,
    },
    Assemble {
        frameworks: Vec<PathBuf>,
        output: PathBuf,
    },
    Thin {
        input: PathBuf,
        arch: Arch,
        output: PathBuf,
    },
    Shell {
        command: String,
        current_dir: PathBuf,
        dir_existed: bool,
    },
    Merge {
        inputs: Vec<PathBuf>,
        output: PathBuf,
    },
    Remove(PathBuf),
}

#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<Action>>>);

impl Journal {
    pub fn record(&self, action: Action) {
        if let Ok(mut actions) = self.0.lock() {
            actions.push(action);
        }
    }

    pub fn actions(&self) -> Vec<Action> {
        self.0.lock().map(|a| a.clone()).unwrap_or_default()
    }
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Log context capturing every line it receives.
pub fn recording_log() -> (Log, Arc<Mutex<Vec<(LogLevel, String)>>>) {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&lines);
    let log = Log::new(move |level, message| {
        if let Ok(mut lines) = sink.lock() {
            lines.push((level, message.to_string()));
        }
    });
    (log, lines)
}

/// Hands out `<root>/run-<n>` for successive calls.
pub struct FakeTempDir {
    pub journal: Journal,
    pub root: PathBuf,
    pub count: Mutex<usize>,
}

impl FakeTempDir {
    pub fn new(journal: &Journal, root: impl Into<PathBuf>) -> Self {
        Self {
            journal: journal.clone(),
            root: root.into(),
            count: Mutex::new(0),
        }
    }
}

impl TempDirFactory for FakeTempDir {
    fn create(&self, log: Option<&Log>) -> Result<PathBuf> {
        log.normal("[CreateTempDir]");
        self.journal.record(Action::CreateTempDir);
        let mut count = self.count.lock().map_err(|_| Error::GenericError("poisoned".into()))?;
        *count += 1;
        Ok(self.root.join(format!("run-{}", *count)))
    }
}

/// Reports fixed architectures per framework; unknown frameworks fail.
pub struct FakeDiscovery {
    pub journal: Journal,
    pub archs: HashMap<PathBuf, Vec<Arch>>,
}

impl FakeDiscovery {
    pub fn new(journal: &Journal, archs: &[(&str, &[Arch])]) -> Self {
        Self {
            journal: journal.clone(),
            archs: archs
                .iter()
                .map(|(path, archs)| (PathBuf::from(path), archs.to_vec()))
                .collect(),
        }
    }
}

impl ArchDiscovery for FakeDiscovery {
    fn archs(&self, framework: &Path, log: Option<&Log>) -> Result<Vec<Arch>> {
        log.normal("[GetArchs]");
        self.journal.record(Action::Archs(framework.to_path_buf()));
        self.archs
            .get(framework)
            .cloned()
            .ok_or_else(|| Error::UnsupportedArch("arm64e".to_string()))
    }
}

/// Returns `<destination>/<bundle name>` without touching the disk.
///
/// Fails when asked to copy into `fail_into`.
pub struct FakeCopier {
    pub journal: Journal,
    pub fail_into: Option<PathBuf>,
}

impl FrameworkCopier for FakeCopier {
    fn copy(
        &self,
        framework: &Path,
        archs: &[Arch],
        destination: &Path,
        log: Option<&Log>,
    ) -> Result<PathBuf> {
        log.normal("[CopyFramework]");
        self.journal.record(Action::Copy {
            framework: framework.to_path_buf(),
            archs: archs.to_vec(),
            destination: destination.to_path_buf(),
        });
        if self.fail_into.as_deref() == Some(destination) {
            return Err(Error::EmptyArchSelection {
                framework: framework.to_path_buf(),
            });
        }
        let name = framework
            .file_name()
            .ok_or_else(|| Error::InvalidFramework(framework.to_path_buf()))?;
        Ok(destination.join(name))
    }
}

pub struct FakePatcher {
    pub journal: Journal,
    pub fail: bool,
}

impl SimulatorPatcher for FakePatcher {
    fn add_arm64_simulator(
        &self,
        device: &Path,
        simulator: &Path,
        log: Option<&Log>,
    ) -> Result<()> {
        log.normal("[AddArm64Simulator]");
        self.journal.record(Action::Patch {
            device: device.to_path_buf(),
            simulator: simulator.to_path_buf(),
        });
        if self.fail {
            return Err(Error::ShellCommand {
                command: "ar x Sdk-arm64".to_string(),
                status: Some(1),
                stdout: String::new(),
                stderr: "ar: Sdk-arm64: not an archive".to_string(),
            });
        }
        Ok(())
    }
}

pub struct FakeAssembler {
    pub journal: Journal,
}

impl XcframeworkAssembler for FakeAssembler {
    fn create(&self, frameworks: &[PathBuf], output: &Path, log: Option<&Log>) -> Result<()> {
        log.normal("[CreateXcframework]");
        self.journal.record(Action::Assemble {
            frameworks: frameworks.to_vec(),
            output: output.to_path_buf(),
        });
        Ok(())
    }
}

pub struct FakeThinner {
    pub journal: Journal,
}

impl BinaryThinner for FakeThinner {
    fn thin(&self, input: &Path, arch: Arch, output: &Path, log: Option<&Log>) -> Result<()> {
        log.normal("[LipoThin]");
        self.journal.record(Action::Thin {
            input: input.to_path_buf(),
            arch,
            output: output.to_path_buf(),
        });
        Ok(())
    }
}

/// Records each command; fails the call whose index is `fail_at`.
pub struct FakeShell {
    pub journal: Journal,
    pub fail_at: Option<usize>,
    pub calls: Mutex<usize>,
}

impl FakeShell {
    pub fn new(journal: &Journal, fail_at: Option<usize>) -> Self {
        Self {
            journal: journal.clone(),
            fail_at,
            calls: Mutex::new(0),
        }
    }
}

impl ShellRunner for FakeShell {
    fn run(&self, command: &str, current_dir: &Path, log: Option<&Log>) -> Result<ShellOutput> {
        log.normal("[RunShellCommand]");
        self.journal.record(Action::Shell {
            command: command.to_string(),
            current_dir: current_dir.to_path_buf(),
            dir_existed: current_dir.is_dir(),
        });
        let mut calls = self.calls.lock().map_err(|_| Error::GenericError("poisoned".into()))?;
        let index = *calls;
        *calls += 1;
        if self.fail_at == Some(index) {
            return Err(Error::ShellCommand {
                command: command.to_string(),
                status: Some(1),
                stdout: String::new(),
                stderr: "ar: malformed archive".to_string(),
            });
        }
        Ok(ShellOutput::default())
    }
}

pub struct FakeMerger {
    pub journal: Journal,
}

impl BinaryMerger for FakeMerger {
    fn merge(&self, inputs: &[PathBuf], output: &Path, log: Option<&Log>) -> Result<()> {
        log.normal("[LipoCreate]");
        self.journal.record(Action::Merge {
            inputs: inputs.to_vec(),
            output: output.to_path_buf(),
        });
        Ok(())
    }
}

pub struct FakeRemover {
    pub journal: Journal,
}

impl PathRemover for FakeRemover {
    fn remove(&self, path: &Path, log: Option<&Log>) -> Result<()> {
        log.normal("[DeletePath]");
        self.journal.record(Action::Remove(path.to_path_buf()));
        Ok(())
    }
}

/// Normal-level lines only, in order.
pub fn normal_lines(lines: &Mutex<Vec<(LogLevel, String)>>) -> Vec<String> {
    lines
        .lock()
        .map(|lines| {
            lines
                .iter()
                .filter(|(level, _)| *level == LogLevel::Normal)
                .map(|(_, line)| line.clone())
                .collect()
        })
        .unwrap_or_default()
}
