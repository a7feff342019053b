//! Tests for the CLI

use super::*;
use clap::Parser;
use tempfile::tempdir;

#[test]
fn test_parse_read() {
    let cli = Cli::try_parse_from([
        "marvel-connector",
        "--config",
        "config.json",
        "--state",
        "state.json",
        "read",
        "--streams",
        "comics,series",
        "--max-records",
        "10",
    ])
    .unwrap();

    assert_eq!(cli.config.unwrap().to_str(), Some("config.json"));
    assert_eq!(cli.state.unwrap().to_str(), Some("state.json"));
    assert_eq!(cli.format, OutputFormat::Json);
    match cli.command {
        Commands::Read {
            streams,
            max_records,
            fail_fast,
            ..
        } => {
            assert_eq!(streams.as_deref(), Some("comics,series"));
            assert_eq!(max_records, Some(10));
            assert!(!fail_fast);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["marvel-connector", "discover", "--format", "pretty", "-v"])
        .unwrap();
    assert!(matches!(cli.command, Commands::Discover));
    assert_eq!(cli.format, OutputFormat::Pretty);
    assert!(cli.verbose);
}

#[test]
fn test_parse_check_inline_config() {
    let cli = Cli::try_parse_from([
        "marvel-connector",
        "check",
        "--config-json",
        r#"{"public_key":"a","private_key":"b"}"#,
    ])
    .unwrap();
    assert!(matches!(cli.command, Commands::Check { config_json: Some(_) }));
}

#[test]
fn test_unknown_format_rejected() {
    assert!(Cli::try_parse_from(["marvel-connector", "spec", "--format", "parquet"]).is_err());
}

#[test]
fn test_load_config_prefers_inline() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"public_key":"file","private_key":"secret"}"#).unwrap();

    let cli = Cli::try_parse_from([
        "marvel-connector",
        "--config",
        path.to_str().unwrap(),
        "spec",
    ])
    .unwrap();
    let runner = Runner::new(cli);

    let config = runner
        .load_config(Some(r#"{"public_key":"inline","private_key":"secret"}"#))
        .unwrap();
    assert_eq!(config.public_key, "inline");

    let config = runner.load_config(None).unwrap();
    assert_eq!(config.public_key, "file");
}

#[test]
fn test_load_config_missing() {
    let cli = Cli::try_parse_from(["marvel-connector", "spec"]).unwrap();
    let runner = Runner::new(cli);
    assert!(runner.load_config(None).is_err());
}

#[tokio::test]
async fn test_load_state_prefers_inline() {
    let cli = Cli::try_parse_from([
        "marvel-connector",
        "--state",
        "/nonexistent/state.json",
        "--state-json",
        r#"{"streams":{"comics":{"cursor":"2020-01-01T00:00:00Z"}}}"#,
        "discover",
    ])
    .unwrap();
    let runner = Runner::new(cli);

    let state = runner.load_state().unwrap();
    assert_eq!(
        state.get_cursor("comics").await,
        Some("2020-01-01T00:00:00Z".to_string())
    );
}
