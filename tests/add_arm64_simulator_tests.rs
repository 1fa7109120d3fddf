mod common;

use common::*;
use std::fs;
use std::path::{Path, PathBuf};
use xcframework_maker::{AddArm64Simulator, Arch, Error, LogLevel, SimulatorPatcher};

const CONVERTER: &str = "/opt/tools/arm64-to-sim";

fn patcher(journal: &Journal, fail_at: Option<usize>, converter: Option<&str>) -> AddArm64Simulator {
    AddArm64Simulator::new(
        Box::new(FakeThinner {
            journal: journal.clone(),
        }),
        Box::new(FakeShell::new(journal, fail_at)),
        Box::new(FakeMerger {
            journal: journal.clone(),
        }),
        Box::new(FakeRemover {
            journal: journal.clone(),
        }),
        converter.map(PathBuf::from),
    )
}

struct Fixture {
    _root: tempfile::TempDir,
    scratch_root: PathBuf,
    device: PathBuf,
    simulator: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let root = tempfile::tempdir().expect("tempdir");
        let scratch_root = root.path().join("scratch");
        fs::create_dir_all(&scratch_root).expect("mkdir scratch");
        Self {
            device: root.path().join("ws/ios-device/Sdk.framework"),
            simulator: root.path().join("ws/ios-simulator/Sdk.framework"),
            scratch_root,
            _root: root,
        }
    }

    fn side_file(&self) -> PathBuf {
        self.simulator.join("Sdk-arm64")
    }

    fn scratch_is_empty(&self) -> bool {
        fs::read_dir(&self.scratch_root)
            .expect("read scratch root")
            .next()
            .is_none()
    }
}

fn shell_steps(actions: &[Action]) -> Vec<(&str, &Path, bool)> {
    actions
        .iter()
        .filter_map(|a| match a {
            Action::Shell {
                command,
                current_dir,
                dir_existed,
            } => Some((command.as_str(), current_dir.as_path(), *dir_existed)),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_step_sequence() {
        init_logger();
        let fx = Fixture::new();
        let journal = Journal::default();

        patcher(&journal, None, Some(CONVERTER))
            .with_scratch_root(&fx.scratch_root)
            .add_arm64_simulator(&fx.device, &fx.simulator, None)
            .expect("patch succeeds");

        let actions = journal.actions();
        assert_eq!(actions.len(), 6);
        assert_eq!(
            actions[0],
            Action::Thin {
                input: fx.device.join("Sdk"),
                arch: Arch::Arm64,
                output: fx.side_file(),
            }
        );

        let side = fx.side_file().display().to_string();
        let steps = shell_steps(&actions);
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].0, format!("ar x '{side}'"));
        assert_eq!(
            steps[1].0,
            format!("for i in *.o ; do '{CONVERTER}' \"$i\" ; done")
        );
        assert_eq!(steps[2].0, format!("ar crv '{side}' *.o"));

        assert_eq!(
            actions[4],
            Action::Merge {
                inputs: vec![fx.simulator.join("Sdk"), fx.side_file()],
                output: fx.simulator.join("Sdk"),
            }
        );
        assert_eq!(actions[5], Action::Remove(fx.side_file()));
    }

    #[test]
    fn test_shell_steps_run_in_one_scoped_directory() {
        init_logger();
        let fx = Fixture::new();
        let journal = Journal::default();

        patcher(&journal, None, Some(CONVERTER))
            .with_scratch_root(&fx.scratch_root)
            .add_arm64_simulator(&fx.device, &fx.simulator, None)
            .expect("patch succeeds");

        let actions = journal.actions();
        let steps = shell_steps(&actions);
        let dir = steps[0].1;
        assert!(dir.starts_with(&fx.scratch_root));
        assert!(
            dir.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("arm64-to-sim"))
        );
        assert!(steps.iter().all(|(_, d, existed)| *d == dir && *existed));
        assert!(!dir.exists());
        assert!(fx.scratch_is_empty());
    }

    #[test]
    fn test_separate_invocations_use_separate_directories() {
        init_logger();
        let fx = Fixture::new();
        let journal = Journal::default();
        let patcher = patcher(&journal, None, Some(CONVERTER)).with_scratch_root(&fx.scratch_root);

        patcher
            .add_arm64_simulator(&fx.device, &fx.simulator, None)
            .expect("first patch");
        patcher
            .add_arm64_simulator(&fx.device, &fx.simulator, None)
            .expect("second patch");

        let actions = journal.actions();
        let steps = shell_steps(&actions);
        assert_eq!(steps.len(), 6);
        assert_ne!(steps[0].1, steps[3].1);
    }

    #[test]
    fn test_failure_midway_removes_scratch_and_stops() {
        init_logger();
        let fx = Fixture::new();
        let journal = Journal::default();

        let result = patcher(&journal, Some(1), Some(CONVERTER))
            .with_scratch_root(&fx.scratch_root)
            .add_arm64_simulator(&fx.device, &fx.simulator, None);

        match result {
            Err(Error::ShellCommand {
                command, stderr, ..
            }) => {
                assert!(command.starts_with("for i in *.o"));
                assert_eq!(stderr, "ar: malformed archive");
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let actions = journal.actions();
        assert_eq!(shell_steps(&actions).len(), 2);
        assert!(!actions.iter().any(|a| matches!(a, Action::Merge { .. })));
        assert!(!actions.iter().any(|a| matches!(a, Action::Remove(_))));
        assert!(fx.scratch_is_empty());
    }

    #[test]
    fn test_missing_converter_fails_before_any_step() {
        init_logger();
        let fx = Fixture::new();
        let journal = Journal::default();

        let result = patcher(&journal, None, None)
            .with_scratch_root(&fx.scratch_root)
            .add_arm64_simulator(&fx.device, &fx.simulator, None);

        assert!(matches!(
            result,
            Err(Error::ToolNotFound {
                tool: "arm64-to-sim",
                env_var: "ARM64_TO_SIM"
            })
        ));
        assert!(journal.actions().is_empty());
        assert!(fx.scratch_is_empty());
    }

    #[test]
    fn test_logs_header_and_paths() {
        init_logger();
        let fx = Fixture::new();
        let journal = Journal::default();
        let (log, lines_handle) = recording_log();

        patcher(&journal, None, Some(CONVERTER))
            .with_scratch_root(&fx.scratch_root)
            .add_arm64_simulator(&fx.device, &fx.simulator, Some(&log))
            .expect("patch succeeds");

        let lines = lines_handle.lock().expect("lock");
        assert_eq!(lines[0], (LogLevel::Normal, "[AddArm64Simulator]".to_string()));
        assert_eq!(
            lines[1],
            (LogLevel::Verbose, format!("- device: {}", fx.device.display()))
        );
        assert_eq!(
            lines[2],
            (LogLevel::Verbose, format!("- simulator: {}", fx.simulator.display()))
        );
        drop(lines);

        assert_eq!(
            normal_lines(&lines_handle),
            vec![
                "[AddArm64Simulator]",
                "  [LipoThin]",
                "  [RunShellCommand]",
                "  [RunShellCommand]",
                "  [RunShellCommand]",
                "  [LipoCreate]",
                "  [DeletePath]",
            ]
        );
    }
}
