//! End-to-end tests through argument parsing and command dispatch

use clap::Parser;
use rstest::rstest;
use tempfile::TempDir;

use bmlgen::application::hash::manifest_url_hash;
use bmlgen::cli::{execute_command, Cli};
use bmlgen::exitcode;
use bmlgen::util::testing::{init_test_setup, setup_manifest_tree, write_manifest};

fn run(args: &[&str]) -> Result<(), i32> {
    let cli = Cli::try_parse_from(std::iter::once("bmlgen").chain(args.iter().copied()))
        .map_err(|_| exitcode::USAGE)?;
    execute_command(&cli).map_err(|e| e.exit_code())
}

#[test]
fn given_project_with_manifests_when_generate_then_site_in_default_output_dir() {
    init_test_setup();
    let temp = TempDir::new().unwrap();
    setup_manifest_tree(temp.path());
    let project = temp.path().to_str().unwrap();

    run(&["-C", project, "generate"]).unwrap();

    let hash = manifest_url_hash("Super Famicom");
    let index = std::fs::read_to_string(temp.path().join("public/index.html")).unwrap();
    assert!(index.contains("<title>Preservation — byuu.org</title>"));
    assert!(temp
        .path()
        .join(format!("public/boards/{hash}/index.html"))
        .is_file());
}

#[test]
fn given_explicit_dirs_when_generate_then_overrides_settings() {
    let temp = TempDir::new().unwrap();
    let manifests = setup_manifest_tree(temp.path());
    let out = temp.path().join("elsewhere");

    run(&[
        "-C",
        temp.path().to_str().unwrap(),
        "generate",
        "--manifests",
        manifests.to_str().unwrap(),
        "--output",
        out.to_str().unwrap(),
    ])
    .unwrap();

    assert!(out.join("index.html").is_file());
    assert!(!temp.path().join("public").exists());
}

#[test]
fn given_valid_tree_when_check_then_ok() {
    let temp = TempDir::new().unwrap();
    setup_manifest_tree(temp.path());
    assert_eq!(run(&["-C", temp.path().to_str().unwrap(), "check"]), Ok(()));
}

#[rstest]
#[case("Games/Broken.bml", "game\n  =oops\n", exitcode::DATAERR)]
#[case("Unknown/x.bml", "database\n", exitcode::DATAERR)]
fn given_bad_manifest_when_check_then_dataerr(
    #[case] relative: &str,
    #[case] content: &str,
    #[case] expected: i32,
) {
    let temp = TempDir::new().unwrap();
    let root = setup_manifest_tree(temp.path());
    write_manifest(&root, relative, content);

    let result = run(&["-C", temp.path().to_str().unwrap(), "check"]);

    assert_eq!(result, Err(expected));
}

#[test]
fn given_no_manifest_dir_when_check_then_noinput() {
    let temp = TempDir::new().unwrap();
    let result = run(&["-C", temp.path().to_str().unwrap(), "check"]);
    assert_eq!(result, Err(exitcode::NOINPUT));
}

#[test]
fn given_manifest_when_query_then_found_or_notfound() {
    let temp = TempDir::new().unwrap();
    let root = setup_manifest_tree(temp.path());
    let file = root.join("Games/Super Famicom.bml");
    let file = file.to_str().unwrap();

    assert_eq!(run(&["query", file, "database", "revision"]), Ok(()));
    assert_eq!(run(&["query", "--all", file, "game"]), Ok(()));
    assert_eq!(
        run(&["query", file, "game", "publisher"]),
        Err(exitcode::NOTFOUND)
    );
}

#[test]
fn given_manifest_when_parse_then_ok() {
    let temp = TempDir::new().unwrap();
    let root = setup_manifest_tree(temp.path());
    let file = root.join("Boards/Super Famicom.bml");
    assert_eq!(run(&["parse", file.to_str().unwrap()]), Ok(()));
}

#[test]
fn given_missing_file_when_parse_then_ioerr() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("missing.bml");
    assert_eq!(run(&["parse", file.to_str().unwrap()]), Err(exitcode::IOERR));
}

#[rstest]
#[case(&["hash", "name", "Super Famicom"], Ok(()))]
#[case(&["hash", "digest", "00ff"], Ok(()))]
#[case(&["hash", "digest", "xyz"], Err(exitcode::DATAERR))]
fn given_hash_input_when_hash_then_result(#[case] args: &[&str], #[case] expected: Result<(), i32>) {
    assert_eq!(run(args), expected);
}

#[test]
fn given_project_when_config_init_twice_then_second_is_usage_error() {
    let temp = TempDir::new().unwrap();
    let project = temp.path().to_str().unwrap();

    assert_eq!(run(&["-C", project, "config", "init"]), Ok(()));
    assert!(temp.path().join(".bmlgen.toml").is_file());
    assert_eq!(
        run(&["-C", project, "config", "init"]),
        Err(exitcode::USAGE)
    );
    assert_eq!(run(&["-C", project, "config", "show"]), Ok(()));
}
