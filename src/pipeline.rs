//! The three-stage pipeline: prepare, run, check.
//!
//! Stages run strictly in order for one test case before the next test case
//! starts. Any fatal error unwinds immediately and aborts the remaining stages
//! and test cases.

use std::ffi::{OsStr, OsString};
use std::fs::{self, OpenOptions};
use std::path::Path;

use crate::checker::{self, CheckReport};
use crate::cli::output::ReportSink;
use crate::config::HarnessConfig;
use crate::descriptor;
use crate::errors::{HarnessError, Result};
use crate::layout::TestCase;
use crate::toolchain;

/// One pipeline stage, with the options it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Prepare,
    Run { emulator: OsString },
    Check { fail_fast: bool },
}

/// Aggregate over every test case checked in one invocation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SuiteSummary {
    pub reports: Vec<CheckReport>,
}

impl SuiteSummary {
    pub fn any_mismatch(&self) -> bool {
        self.reports.iter().any(|r| !r.passed())
    }
}

/// Drives the stages for a set of test cases.
#[derive(Debug, Clone)]
pub struct Harness {
    config: HarnessConfig,
}

impl Harness {
    pub fn new(config: HarnessConfig) -> Self {
        Self { config }
    }

    /// Assembles the source and instantiates the descriptor.
    ///
    /// The descriptor is only written once the assembler has exited
    /// successfully and the binary exists. The output file is created if it is
    /// absent so the checker always has something to read.
    pub fn prepare(&self, case: &TestCase) -> Result<()> {
        log::info!("preparing {}", case);
        let paths = case.paths(&self.config);
        require_file(&paths.source)?;
        require_file(&paths.descriptor_template)?;

        create_parent(&paths.binary)?;
        toolchain::run_checked(
            "assembler",
            toolchain::assembler_command(&self.config, &paths.source, &paths.binary),
        )?;
        if !paths.binary.is_file() {
            return Err(HarnessError::MissingBinary { path: paths.binary });
        }

        create_parent(&paths.output)?;
        touch(&paths.output)?;

        let template = fs::read_to_string(&paths.descriptor_template)
            .map_err(|e| HarnessError::io(&paths.descriptor_template, e))?;
        let text = descriptor::instantiate(
            &template,
            &descriptor::absolute(&paths.output)?,
            &descriptor::absolute(&paths.binary)?,
        );
        descriptor::warn_if_not_json(&text, &paths.descriptor);

        create_parent(&paths.descriptor)?;
        fs::write(&paths.descriptor, text).map_err(|e| HarnessError::io(&paths.descriptor, e))?;
        log::debug!("wrote descriptor {}", paths.descriptor.display());
        Ok(())
    }

    /// Runs the emulator on the prepared descriptor.
    pub fn run(&self, case: &TestCase, emulator: &OsStr) -> Result<()> {
        log::info!("running {}", case);
        let paths = case.paths(&self.config);
        require_file(&paths.descriptor)?;
        toolchain::run_checked(
            "emulator",
            toolchain::emulator_command(emulator, &paths.descriptor),
        )
    }

    /// Compares the emulator output with the golden file.
    pub fn check(
        &self,
        case: &TestCase,
        fail_fast: bool,
        sink: &mut dyn ReportSink,
    ) -> Result<CheckReport> {
        log::info!("checking {}", case);
        let paths = case.paths(&self.config);
        checker::check_files(case, &paths.expectation, &paths.output, fail_fast, sink)
    }

    /// Runs `stages` in order for each case in turn.
    pub fn run_stages(
        &self,
        cases: &[TestCase],
        stages: &[Stage],
        sink: &mut dyn ReportSink,
    ) -> Result<SuiteSummary> {
        let mut summary = SuiteSummary::default();
        for case in cases {
            for stage in stages {
                match stage {
                    Stage::Prepare => self.prepare(case)?,
                    Stage::Run { emulator } => self.run(case, emulator)?,
                    Stage::Check { fail_fast } => {
                        summary.reports.push(self.check(case, *fail_fast, sink)?);
                    }
                }
            }
        }
        Ok(summary)
    }
}

fn require_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(HarnessError::MissingInput {
            path: path.to_path_buf(),
        })
    }
}

fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| HarnessError::io(parent, e))
        }
        _ => Ok(()),
    }
}

/// Creates `path` if it does not exist. Existing content is left alone.
fn touch(path: &Path) -> Result<()> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(|_| ())
        .map_err(|e| HarnessError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::output::{OutputBuffer, ReportKind};
    use std::path::PathBuf;

    fn scratch_root(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("romcheck-pipeline-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("test_roms")).unwrap();
        dir
    }

    #[test]
    fn prepare_requires_source() {
        let root = scratch_root("nosource");
        let harness = Harness::new(HarnessConfig::default().with_root(&root));
        let err = harness.prepare(&TestCase::new("missing")).unwrap_err();
        match err {
            HarnessError::MissingInput { path } => {
                assert_eq!(path, root.join("test_roms/missing.s"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!root.join("temp/missing.mem.json").exists());
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn prepare_requires_descriptor_template() {
        let root = scratch_root("notemplate");
        fs::write(root.join("test_roms/a.s"), "nop\n").unwrap();
        let harness = Harness::new(HarnessConfig::default().with_root(&root));
        let err = harness.prepare(&TestCase::new("a")).unwrap_err();
        assert!(matches!(err, HarnessError::MissingInput { path } if path.ends_with("a.mem.json")));
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn run_requires_prepared_descriptor() {
        let root = scratch_root("unprepared");
        let harness = Harness::new(HarnessConfig::default().with_root(&root));
        let err = harness
            .run(&TestCase::new("a"), OsStr::new("emu"))
            .unwrap_err();
        assert!(matches!(err, HarnessError::MissingInput { .. }));
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn check_stage_collects_reports() {
        let root = scratch_root("check");
        fs::create_dir_all(root.join("output")).unwrap();
        fs::write(root.join("test_roms/a.expected"), "AB|x|R0|reg\n").unwrap();
        fs::write(root.join("output/a.out"), "\0A\0B\n").unwrap();
        fs::write(root.join("test_roms/b.expected"), "AB|h|R1|reg\n").unwrap();
        fs::write(root.join("output/b.out"), "BA\n").unwrap();

        let harness = Harness::new(HarnessConfig::default().with_root(&root));
        let mut sink = OutputBuffer::new();
        let summary = harness
            .run_stages(
                &[TestCase::new("a"), TestCase::new("b")],
                &[Stage::Check { fail_fast: false }],
                &mut sink,
            )
            .unwrap();
        assert_eq!(summary.reports.len(), 2);
        assert!(summary.reports[0].passed());
        assert!(!summary.reports[1].passed());
        assert!(summary.any_mismatch());
        assert_eq!(sink.lines[0].0, ReportKind::Success);
        assert_eq!(sink.lines[1].0, ReportKind::Mismatch);
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn touch_keeps_existing_content() {
        let root = scratch_root("touch");
        let file = root.join("out.txt");
        fs::write(&file, "kept").unwrap();
        touch(&file).unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "kept");
        let fresh = root.join("nested/fresh.out");
        create_parent(&fresh).unwrap();
        touch(&fresh).unwrap();
        assert_eq!(fs::read(&fresh).unwrap(), b"");
        let _ = fs::remove_dir_all(&root);
    }

    #[cfg(unix)]
    mod with_fake_tools {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        fn script(path: &Path, body: &str) {
            fs::write(path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
        }

        fn setup(name: &str) -> (PathBuf, Harness) {
            let root = scratch_root(name);
            fs::create_dir_all(root.join("bin")).unwrap();
            // -o BIN -mformat=binary SRC
            script(&root.join("bin/fake-as"), "cp \"$4\" \"$2\"");
            fs::write(root.join("test_roms/a.s"), "rom bytes\n").unwrap();
            fs::write(
                root.join("test_roms/a.mem.json"),
                "{\"rom\": \"%rombin\", \"out\": \"%outputfile\"}\n",
            )
            .unwrap();
            let config = HarnessConfig::default()
                .with_root(&root)
                .with_assembler(root.join("bin/fake-as").display().to_string());
            (root, Harness::new(config))
        }

        #[test]
        fn prepare_writes_binary_descriptor_and_output() {
            let (root, harness) = setup("prepare");
            harness.prepare(&TestCase::new("a")).unwrap();

            assert_eq!(fs::read_to_string(root.join("temp/a.bin")).unwrap(), "rom bytes\n");
            assert_eq!(fs::read(root.join("output/a.out")).unwrap(), b"");
            let descriptor = fs::read_to_string(root.join("temp/a.mem.json")).unwrap();
            let value: serde_json::Value = serde_json::from_str(&descriptor).unwrap();
            let rom = PathBuf::from(value["rom"].as_str().unwrap());
            let out = PathBuf::from(value["out"].as_str().unwrap());
            assert!(rom.is_absolute() && rom.ends_with("temp/a.bin"));
            assert!(out.is_absolute() && out.ends_with("output/a.out"));
            let _ = fs::remove_dir_all(&root);
        }

        #[test]
        fn prepare_is_idempotent() {
            let (root, harness) = setup("idempotent");
            harness.prepare(&TestCase::new("a")).unwrap();
            let first = fs::read(root.join("temp/a.mem.json")).unwrap();
            harness.prepare(&TestCase::new("a")).unwrap();
            let second = fs::read(root.join("temp/a.mem.json")).unwrap();
            assert_eq!(first, second);
            let _ = fs::remove_dir_all(&root);
        }

        #[test]
        fn assembler_failure_aborts_before_descriptor() {
            let (root, _) = setup("asfail");
            script(&root.join("bin/bad-as"), "exit 1");
            let config = HarnessConfig::default()
                .with_root(&root)
                .with_assembler(root.join("bin/bad-as").display().to_string());
            let err = Harness::new(config).prepare(&TestCase::new("a")).unwrap_err();
            assert!(matches!(err, HarnessError::ToolFailed { tool: "assembler", .. }));
            assert!(!root.join("temp/a.mem.json").exists());
            let _ = fs::remove_dir_all(&root);
        }

        #[test]
        fn assembler_without_binary_is_fatal() {
            let (root, _) = setup("nobin");
            script(&root.join("bin/lazy-as"), "exit 0");
            let config = HarnessConfig::default()
                .with_root(&root)
                .with_assembler(root.join("bin/lazy-as").display().to_string());
            let err = Harness::new(config).prepare(&TestCase::new("a")).unwrap_err();
            assert!(matches!(err, HarnessError::MissingBinary { .. }));
            assert!(!root.join("temp/a.mem.json").exists());
            assert!(!root.join("output/a.out").exists());
            let _ = fs::remove_dir_all(&root);
        }

        #[test]
        fn full_pipeline_reports_success() {
            let (root, harness) = setup("full");
            // Pulls the output path out of the descriptor and writes one x line.
            script(
                &root.join("bin/fake-emu"),
                "out=$(sed -n 's/.*\"out\": \"\\([^\"]*\\)\".*/\\1/p' \"$1\")\nprintf 'A\\000B\\000\\n' > \"$out\"",
            );
            fs::write(root.join("test_roms/a.expected"), "AB|x|R0|register zero\n").unwrap();

            let mut sink = OutputBuffer::new();
            let summary = harness
                .run_stages(
                    &[TestCase::new("a")],
                    &[
                        Stage::Prepare,
                        Stage::Run {
                            emulator: root.join("bin/fake-emu").into_os_string(),
                        },
                        Stage::Check { fail_fast: false },
                    ],
                    &mut sink,
                )
                .unwrap();
            assert!(!summary.any_mismatch());
            assert_eq!(sink.texts(), vec!["Test Rom a completed successfully."]);
            let _ = fs::remove_dir_all(&root);
        }

        #[test]
        fn emulator_failure_aborts_remaining_cases() {
            let (root, harness) = setup("emufail");
            script(&root.join("bin/bad-emu"), "exit 2");
            let mut sink = OutputBuffer::new();
            let err = harness
                .run_stages(
                    &[TestCase::new("a"), TestCase::new("a")],
                    &[
                        Stage::Prepare,
                        Stage::Run {
                            emulator: root.join("bin/bad-emu").into_os_string(),
                        },
                        Stage::Check { fail_fast: false },
                    ],
                    &mut sink,
                )
                .unwrap_err();
            assert!(matches!(err, HarnessError::ToolFailed { tool: "emulator", .. }));
            assert!(sink.lines.is_empty());
            let _ = fs::remove_dir_all(&root);
        }
    }
}
