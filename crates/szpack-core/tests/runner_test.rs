//! End-to-end runs of the archive flow against a fake 7-Zip binary
#![cfg(unix)]

use std::fs;
use szpack_core::progress::ProgressReporter;
use szpack_core::{create_archive, ArchiveRequest, Error, ExitKind, SevenZip};
use szpack_testing::assertions::{assert_args_contain, assert_redacted};
use szpack_testing::fixtures::{create_dash_named_file, create_input_tree, create_test_files};
use szpack_testing::{FakeSevenZip, TestDir};

fn locate(fake: &FakeSevenZip) -> SevenZip {
    SevenZip::locate(Some(fake.program()), None).unwrap()
}

#[test]
fn test_successful_run_reports_archive() {
    let test_dir = TestDir::new().unwrap();
    let inputs = create_test_files(&test_dir).unwrap();
    let fake = FakeSevenZip::install(&test_dir.join("bin")).unwrap();
    let output = test_dir.join("out/archive.7z");

    let request = ArchiveRequest::builder()
        .inputs(&inputs)
        .output(Some(&output))
        .level(7)
        .build()
        .unwrap();
    let report =
        create_archive(&locate(&fake), &request, &mut ProgressReporter::hidden()).unwrap();

    assert_eq!(report.archive, output);
    assert_eq!(report.inputs, 4);
    assert_eq!(report.level, 7);
    assert!(!report.encrypted);
    assert!(report.archive_bytes > 0);
    assert_eq!(report.input_bytes, 23 + 23 + 25 + 4);

    let mut expected = vec![
        "a".to_string(),
        "-t7z".to_string(),
        "-mx=7".to_string(),
        "-y".to_string(),
        "--".to_string(),
        output.to_string_lossy().into_owned(),
    ];
    expected.extend(inputs.iter().map(|p| p.to_string_lossy().into_owned()));
    assert_eq!(fake.recorded_args().unwrap(), expected);
}

#[test]
fn test_encrypted_run_passes_password_and_header_flag() {
    let test_dir = TestDir::new().unwrap();
    let tree = create_input_tree(&test_dir).unwrap();
    let fake = FakeSevenZip::install(&test_dir.join("bin")).unwrap();

    let request = ArchiveRequest::builder()
        .input(&tree)
        .password(Some("correct horse"))
        .build()
        .unwrap();
    let report =
        create_archive(&locate(&fake), &request, &mut ProgressReporter::hidden()).unwrap();

    assert!(report.encrypted);
    assert_eq!(report.archive, test_dir.join("project.7z"));
    let args = fake.recorded_args().unwrap();
    assert_args_contain(&args, &["-mx=5", "-pcorrect horse", "-mhe=on", "-y", "--"]);
}

#[test]
fn test_dash_named_input_follows_separator() {
    let test_dir = TestDir::new().unwrap();
    let tricky = create_dash_named_file(&test_dir).unwrap();
    let fake = FakeSevenZip::install(&test_dir.join("bin")).unwrap();

    let request = ArchiveRequest::builder().input(&tricky).build().unwrap();
    create_archive(&locate(&fake), &request, &mut ProgressReporter::hidden()).unwrap();

    let args = fake.recorded_args().unwrap();
    let separator = args.iter().position(|a| a == "--").unwrap();
    let input_pos = args
        .iter()
        .position(|a| a == &tricky.to_string_lossy())
        .unwrap();
    assert!(input_pos > separator);
}

#[test]
fn test_non_zero_exit_is_failure_with_diagnostics() {
    let test_dir = TestDir::new().unwrap();
    let inputs = create_test_files(&test_dir).unwrap();
    let fake = FakeSevenZip::builder()
        .exit_code(2)
        .stderr("ERROR: disk full")
        .create_archive(false)
        .install(&test_dir.join("bin"))
        .unwrap();

    let request = ArchiveRequest::builder()
        .inputs(&inputs)
        .password(Some("topsecret"))
        .build()
        .unwrap();
    let err = create_archive(&locate(&fake), &request, &mut ProgressReporter::hidden())
        .unwrap_err();

    match &err {
        Error::SevenZipFailed { status, message } => {
            assert_eq!(*status, ExitKind::Fatal);
            assert!(message.contains("disk full"));
        }
        other => panic!("expected SevenZipFailed, got {:?}", other),
    }
    assert_redacted(&err.to_string(), "topsecret");
}

#[test]
fn test_warning_exit_is_failure() {
    let test_dir = TestDir::new().unwrap();
    let inputs = create_test_files(&test_dir).unwrap();
    let fake = FakeSevenZip::builder()
        .exit_code(1)
        .stdout("WARNING: file1.txt is locked")
        .install(&test_dir.join("bin"))
        .unwrap();

    let request = ArchiveRequest::builder().inputs(&inputs).build().unwrap();
    let err = create_archive(&locate(&fake), &request, &mut ProgressReporter::hidden())
        .unwrap_err();

    match err {
        Error::SevenZipFailed { status, message } => {
            assert_eq!(status, ExitKind::Warning);
            assert!(message.contains("locked"));
        }
        other => panic!("expected SevenZipFailed, got {:?}", other),
    }
}

#[test]
fn test_existing_output_is_kept_without_overwrite() {
    let test_dir = TestDir::new().unwrap();
    let inputs = create_test_files(&test_dir).unwrap();
    let existing = test_dir.create_file("file1.7z", b"previous archive").unwrap();
    let fake = FakeSevenZip::install(&test_dir.join("bin")).unwrap();

    let request = ArchiveRequest::builder().inputs(&inputs).build().unwrap();
    let err = create_archive(&locate(&fake), &request, &mut ProgressReporter::hidden())
        .unwrap_err();

    assert!(matches!(err, Error::OutputExists(ref p) if p == &existing));
    assert!(!fake.was_invoked());
    assert_eq!(fs::read(&existing).unwrap(), b"previous archive");
}

#[test]
fn test_overwrite_replaces_existing_output() {
    let test_dir = TestDir::new().unwrap();
    let inputs = create_test_files(&test_dir).unwrap();
    let existing = test_dir.create_file("file1.7z", b"previous archive").unwrap();
    let fake = FakeSevenZip::install(&test_dir.join("bin")).unwrap();

    let request = ArchiveRequest::builder()
        .inputs(&inputs)
        .overwrite(true)
        .build()
        .unwrap();
    create_archive(&locate(&fake), &request, &mut ProgressReporter::hidden()).unwrap();

    assert_eq!(fs::read(&existing).unwrap(), b"fake 7z archive");
}

#[test]
fn test_unexecutable_program_is_reported_as_missing() {
    let test_dir = TestDir::new().unwrap();
    let inputs = create_test_files(&test_dir).unwrap();
    let not_a_program = test_dir.create_file("bin/7z", b"plain data").unwrap();

    let seven_zip = SevenZip::locate(Some(not_a_program.as_path()), None).unwrap();
    let request = ArchiveRequest::builder().inputs(&inputs).build().unwrap();
    let err = create_archive(&seven_zip, &request, &mut ProgressReporter::hidden()).unwrap_err();

    assert!(matches!(err, Error::ExecutableNotFound(_)));
}
