//! Upload → build → run through `CodeRunner`.

#![cfg(unix)]
#![allow(clippy::unwrap_used)]

use std::path::Path;
use std::sync::Arc;
use std::thread;

use coderunner_core::CodeRunner;
use coderunner_core::ErrorKind;
use coderunner_core::Response;
use coderunner_core::RunnerConfig;
use coderunner_core::SessionStore;
use coderunner_core::SubmissionSession;
use coderunner_core::Upload;
use coderunner_core::test_utils::TarTestBuilder;
use coderunner_core::test_utils::ZipTestBuilder;
use coderunner_core::test_utils::create_test_tar;
use tempfile::TempDir;

fn runner(base: &Path) -> CodeRunner {
    CodeRunner::new(RunnerConfig::default().with_base_dir(base))
}

fn script_upload(name: &str) -> Upload {
    let archive = ZipTestBuilder::new()
        .add_directory("bin/")
        .add_file_with_mode("bin/greet.sh", b"#!/bin/sh\necho \"hello $1\"\n", 0o755)
        .build();
    Upload::new(name, archive)
        .with_compile_command("test -x greet.sh")
        .with_run_command("./greet.sh")
        .with_work_dir("bin")
}

#[test]
fn test_full_pipeline() {
    let temp = TempDir::new().unwrap();
    let runner = runner(temp.path());

    let upload = runner.upload(script_upload("greet.zip").with_arg("1", "world"));
    assert_eq!(
        Response::upload(&upload).to_json().unwrap(),
        r#""\"Upload Status\":\"Successfully Uploaded File(s)\"""#
    );

    let build = runner.build();
    assert_eq!(Response::build(&build).message(), "Compiled successfully");

    let run = runner.run();
    assert_eq!(Response::run(&run).message(), "hello world\n");
}

#[test]
fn test_false_build_reports_empty_output() {
    let temp = TempDir::new().unwrap();
    let runner = runner(temp.path());
    runner
        .upload(
            Upload::new("job.tar", create_test_tar(vec![("x.txt", b"x".as_slice())]))
                .with_compile_command("false"),
        )
        .unwrap();

    let err = runner.build().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Command);
    assert_eq!(err.command_output(), Some("\n"));
}

#[test]
fn test_run_appends_arguments_in_order() {
    let temp = TempDir::new().unwrap();
    let runner = runner(temp.path());
    runner
        .upload(
            Upload::new("job.tar.gz", TarTestBuilder::new().add_file("readme.txt", b"").build_gz())
                .with_run_command("echo hi")
                .with_arg("1", "there"),
        )
        .unwrap();

    let result = runner.run().unwrap();
    assert_eq!(result.command, "echo hi there");
    assert_eq!(result.output, "hi there\n");
    assert!(result.is_success());
}

#[test]
fn test_working_directory_unchanged() {
    let temp = TempDir::new().unwrap();
    let runner = runner(temp.path());
    let before = std::env::current_dir().unwrap();

    runner.upload(script_upload("greet.zip")).unwrap();
    runner.build().unwrap();
    runner.run().unwrap();
    assert_eq!(std::env::current_dir().unwrap(), before);

    runner.store(SubmissionSession {
        compile_command: "exit 7".into(),
        ..runner.current()
    });
    assert!(runner.build().is_err());
    assert_eq!(std::env::current_dir().unwrap(), before);

    runner.store(SubmissionSession {
        work_dir: "does-not-exist".into(),
        ..runner.current()
    });
    assert_eq!(runner.build().unwrap_err().kind(), ErrorKind::Navigation);
    assert_eq!(std::env::current_dir().unwrap(), before);
}

#[test]
fn test_missing_archive_is_file_retrieval_error() {
    let temp = TempDir::new().unwrap();
    let upload = Upload::from_fields([("compileCmd", "make"), ("runCmd", "./main")]);
    let err = runner(temp.path()).upload(upload).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FileRetrieval);
    assert!(Response::upload(&Err(err)).is_error());
}

#[test]
fn test_malicious_upload_is_security_violation() {
    let temp = TempDir::new().unwrap();
    let archive = TarTestBuilder::new()
        .add_raw_file("../../outside.txt", b"x")
        .build();

    let err = runner(temp.path())
        .upload(Upload::new("evil.tar", archive))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SecurityViolation);
    assert!(!temp.path().join("outside.txt").exists());
}

#[test]
fn test_escaping_work_dir_is_security_violation() {
    let temp = TempDir::new().unwrap();
    let runner = runner(temp.path());
    runner
        .upload(script_upload("greet.zip").with_work_dir("../.."))
        .unwrap();
    assert!(runner.build().unwrap_err().is_security_violation());
}

#[test]
fn test_session_stored_even_when_extraction_fails() {
    let temp = TempDir::new().unwrap();
    let runner = runner(temp.path());
    let archive = TarTestBuilder::new()
        .add_file("ok.txt", b"ok")
        .add_symlink("link", "/etc/passwd")
        .build();

    let err = runner
        .upload(Upload::new("partial.tar", archive).with_run_command("cat ok.txt"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decompression);
    assert_eq!(runner.current().root_dir, "partial");
    assert_eq!(runner.run().unwrap().output, "ok");
}

#[test]
fn test_concurrent_submissions_serialize() {
    let temp = TempDir::new().unwrap();
    let runner = Arc::new(runner(temp.path()));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let runner = Arc::clone(&runner);
            thread::spawn(move || {
                runner
                    .upload(script_upload(&format!("job{i}.zip")).with_arg("1", i.to_string()))
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let session = runner.current();
    let expected = format!("hello {}\n", session.args.get("1").unwrap());
    assert_eq!(runner.run().unwrap().output, expected);
    for i in 0..4 {
        assert!(temp.path().join(format!("assignments/job{i}/bin/greet.sh")).is_file());
    }
}
