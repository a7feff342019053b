//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::MarvelConfig;
use crate::connector::{CheckResult, Connector, MarvelConnector};
use crate::engine::{Message, SyncConfig, SyncEngine};
use crate::error::{Error, Result, ResultExt};
use crate::output::{JsonLinesWriter, MessageSink};
use crate::state::StateManager;
use serde_json::Value;
use std::io::Stdout;

/// CLI runner
pub struct Runner {
    cli: Cli,
    connector: MarvelConnector,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self {
            cli,
            connector: MarvelConnector::new(),
        }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Spec => self.spec(),
            Commands::Check { config_json } => self.check(config_json.as_deref()).await,
            Commands::Discover => self.discover(),
            Commands::Read {
                streams,
                config_json,
                max_records,
                fail_fast,
            } => {
                self.read(
                    streams.as_deref(),
                    config_json.as_deref(),
                    *max_records,
                    *fail_fast,
                )
                .await
            }
        }
    }

    /// Load configuration; inline JSON takes precedence over the file
    pub(crate) fn load_config(&self, inline: Option<&str>) -> Result<MarvelConfig> {
        if let Some(json_str) = inline {
            return MarvelConfig::from_json(json_str);
        }
        if let Some(path) = &self.cli.config {
            return MarvelConfig::from_file(path);
        }
        Err(Error::config("no configuration given, use --config or --config-json"))
    }

    /// Load state; inline JSON takes precedence over the file
    pub(crate) fn load_state(&self) -> Result<StateManager> {
        if let Some(state_json) = &self.cli.state_json {
            StateManager::from_json(state_json)
        } else if let Some(path) = &self.cli.state {
            StateManager::from_file(path)
        } else {
            Ok(StateManager::in_memory())
        }
    }

    fn sink(&self) -> JsonLinesWriter<Stdout> {
        JsonLinesWriter::stdout().with_pretty(self.cli.format == OutputFormat::Pretty)
    }

    /// Show spec
    fn spec(&self) -> Result<()> {
        self.output_message(&self.connector.spec().to_json());
        Ok(())
    }

    /// Check connection
    async fn check(&self, config_json: Option<&str>) -> Result<()> {
        let result = match self.load_config(config_json) {
            Ok(config) => self.connector.check(&config).await?,
            Err(e) => CheckResult::failure(e.to_string()),
        };
        self.output_message(&result.to_json());
        Ok(())
    }

    /// Discover streams
    fn discover(&self) -> Result<()> {
        self.output_message(&self.connector.discover().to_json());
        Ok(())
    }

    /// Read streams
    async fn read(
        &self,
        streams: Option<&str>,
        config_json: Option<&str>,
        max_records: Option<usize>,
        fail_fast: bool,
    ) -> Result<()> {
        let selection = MarvelConnector::select_streams(streams)?;
        let config = self.load_config(config_json)?;
        let state = self.load_state()?;

        let mut sync_config = SyncConfig::new().with_fail_fast(fail_fast);
        if let Some(max) = max_records {
            sync_config = sync_config.with_max_records(max);
        }
        let mut engine = SyncEngine::new(state).with_config(sync_config);
        let mut sink = self.sink();

        let summary = self
            .connector
            .read(&config, &selection, &mut engine, &mut sink)
            .await?;

        if let Some(state_path) = &self.cli.state {
            engine
                .state()
                .save_to_file(state_path)
                .await
                .with_context(|| format!("saving state to {}", state_path.display()))?;
        }

        // Always emit final state so the caller can capture it
        sink.emit(&Message::state(engine.state().snapshot().await))?;
        sink.flush()?;

        self.output_message(&summary.to_json());
        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}
