use clap::Parser;
use nimata::cli::{Args, Command};
use std::ffi::OsString;
use std::path::PathBuf;

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("nimata")];
    res.extend(args.iter().map(OsString::from));
    res
}

#[test]
fn test_render_args() {
    let args = make_args(&["render", "./greeting.txt"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert!(!parsed.verbose);
    match parsed.command {
        Command::Render { template, context, check } => {
            assert_eq!(template, PathBuf::from("./greeting.txt"));
            assert!(context.is_none());
            assert!(!check);
        }
        other => panic!("Expected Render command, got {:?}", other),
    }
}

#[test]
fn test_render_with_context_and_check() {
    let args = make_args(&["render", "./greeting.txt", "--context", "./ctx.json", "--check"]);
    let parsed = Args::try_parse_from(args).unwrap();

    match parsed.command {
        Command::Render { template, context, check } => {
            assert_eq!(template, PathBuf::from("./greeting.txt"));
            assert_eq!(context, Some(PathBuf::from("./ctx.json")));
            assert!(check);
        }
        other => panic!("Expected Render command, got {:?}", other),
    }
}

#[test]
fn test_validate_args() {
    let args = make_args(&["validate", "./template.hbs"]);
    let parsed = Args::try_parse_from(args).unwrap();

    match parsed.command {
        Command::Validate { template } => {
            assert_eq!(template, PathBuf::from("./template.hbs"));
        }
        other => panic!("Expected Validate command, got {:?}", other),
    }
}

#[test]
fn test_list_args() {
    let args = make_args(&["list", "./templates"]);
    let parsed = Args::try_parse_from(args).unwrap();

    match parsed.command {
        Command::List { templates_dir } => {
            assert_eq!(templates_dir, PathBuf::from("./templates"));
        }
        other => panic!("Expected List command, got {:?}", other),
    }
}

#[test]
fn test_generate_args() {
    let args = make_args(&[
        "generate",
        "web-api",
        "--templates-dir",
        "./templates",
        "--output-dir",
        "./out",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();

    match parsed.command {
        Command::Generate { name, templates_dir, output_dir, context, force } => {
            assert_eq!(name, "web-api");
            assert_eq!(templates_dir, PathBuf::from("./templates"));
            assert_eq!(output_dir, PathBuf::from("./out"));
            assert!(context.is_none());
            assert!(!force);
        }
        other => panic!("Expected Generate command, got {:?}", other),
    }
}

#[test]
fn test_generate_short_flags() {
    let args = make_args(&[
        "generate",
        "web-api",
        "-d",
        "./templates",
        "-o",
        "./out",
        "-c",
        "./answers.json",
        "-f",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();

    match parsed.command {
        Command::Generate { context, force, .. } => {
            assert_eq!(context, Some(PathBuf::from("./answers.json")));
            assert!(force);
        }
        other => panic!("Expected Generate command, got {:?}", other),
    }
}

#[test]
fn test_verbose_is_global() {
    let parsed = Args::try_parse_from(make_args(&["--verbose", "list", "./templates"])).unwrap();
    assert!(parsed.verbose);

    // The flag is accepted after the subcommand as well.
    let parsed = Args::try_parse_from(make_args(&["list", "-v", "./templates"])).unwrap();
    assert!(parsed.verbose);
}

#[test]
fn test_missing_args() {
    assert!(Args::try_parse_from(make_args(&[])).is_err());
    assert!(Args::try_parse_from(make_args(&["render"])).is_err());
    assert!(Args::try_parse_from(make_args(&["generate", "web-api"])).is_err());
}

#[test]
fn test_too_many_args() {
    let args = make_args(&["validate", "./template.hbs", "extra"]);
    assert!(Args::try_parse_from(args).is_err());
}
