use std::path::PathBuf;

use clap::Parser;
use timetable_cli::{Cli, Commands};

// Integration tests for command line argument parsing.

#[test]
fn test_expand_defaults() {
    let cli = Cli::try_parse_from(["timetable", "expand", "events.json"]).unwrap();
    assert!(!cli.verbose);

    match cli.command {
        Commands::Expand {
            file,
            limit,
            settings,
            json,
            output,
        } => {
            assert_eq!(file, PathBuf::from("events.json"));
            assert_eq!(limit, None);
            assert_eq!(settings, None);
            assert!(!json);
            assert_eq!(output, None);
        }
        Commands::Validate { .. } => panic!("expected expand command"),
    }
}

#[test]
fn test_expand_with_options() {
    let cli = Cli::try_parse_from([
        "timetable",
        "-v",
        "expand",
        "events.json",
        "--limit",
        "25",
        "--settings",
        "settings.json",
        "--json",
        "-o",
        "out.json",
    ])
    .unwrap();
    assert!(cli.verbose);

    let Commands::Expand {
        limit,
        settings,
        json,
        output,
        ..
    } = cli.command
    else {
        panic!("expected expand command");
    };
    assert_eq!(limit, Some(25));
    assert_eq!(settings, Some(PathBuf::from("settings.json")));
    assert!(json);
    assert_eq!(output, Some(PathBuf::from("out.json")));
}

#[test]
fn test_validate_command() {
    let cli = Cli::try_parse_from(["timetable", "validate", "events.json", "--verbose"]).unwrap();
    assert!(cli.verbose);
    assert!(matches!(
        cli.command,
        Commands::Validate { file } if file == PathBuf::from("events.json")
    ));
}

#[test]
fn test_missing_file_is_rejected() {
    assert!(Cli::try_parse_from(["timetable", "expand"]).is_err());
    assert!(Cli::try_parse_from(["timetable"]).is_err());
}
