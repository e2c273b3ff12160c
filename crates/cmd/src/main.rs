// Copyright 2025 Crrow
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::{collections::VecDeque, path::PathBuf, process::ExitCode, sync::Arc, time::Duration};

use castplay_common_telemetry::{init_global_logging, panic_hook::set_panic_hook, reload_level};
use castplay_error::{ErrorExt, StackError};
use castplay_player::{
    Command, MediaResource, Notification, PlaybackController, Settings, util::ResultExt as _,
};
use clap::{Args, Parser, Subcommand};
use parking_lot::RwLock;
use snafu::ResultExt;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    time::MissedTickBehavior,
};
use tracing::{debug, info};

mod err;
use err::{LoggingSnafu, ReadStdinSnafu, Result, ScriptSnafu, SettingsSnafu, SignalSnafu};

const APP_NAME: &str = "castplay";

const CONSOLE_HELP: &str =
    "commands: toggle | play | pause | seek <0-1> | volume <0-1> | rate <x> | select <row> | fav \
     <row> | log <filter>";

#[derive(Debug, Parser)]
#[clap(
name = "castplay",
about = "castplay-cmd",
author = env!("CARGO_PKG_AUTHORS"),
version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    commands: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Episodes(EpisodesArgs),
    Simulate(SimulateArgs),
}

#[derive(Debug, Clone, Args)]
#[command(flatten_help = true)]
#[command(long_about = r"

List the configured episodes with their favorite stars.
Examples:

castplay episodes
castplay episodes --config ./podcast.toml

")]
struct EpisodesArgs {
    /// Settings file merged over the built-in defaults
    #[arg(long)]
    config: Option<PathBuf>,
}

impl EpisodesArgs {
    fn run(&self) -> Result<()> {
        let settings = Settings::load(self.config.as_deref()).context(SettingsSnafu)?;
        let _guards = init_global_logging(APP_NAME, &settings.logging).context(LoggingSnafu)?;

        let playlist = settings.playlist();
        if playlist.is_empty() {
            println!("No episodes configured.");
            return Ok(());
        }
        for (index, episode) in playlist.episodes().iter().enumerate() {
            println!(
                "{index:>3}  {}  {:<40} {:<12} {:>8}",
                episode.star(),
                episode.title,
                episode.date,
                episode.duration
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Args)]
#[command(flatten_help = true)]
#[command(long_about = r"

Runs the player against a simulated audio clock.
Commands are read from stdin, one per line, unless --script is given.

Examples:

castplay simulate
castplay simulate --script 'select 0; toggle; seek 0.5' --duration-secs 10

")]
struct SimulateArgs {
    /// Settings file merged over the built-in defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Commands separated by ';', applied one per tick
    #[arg(long)]
    script: Option<String>,

    /// Stop after this many seconds of wall-clock time
    #[arg(long)]
    duration_secs: Option<u64>,
}

impl SimulateArgs {
    async fn run(&self) -> Result<()> {
        let settings = Settings::load(self.config.as_deref()).context(SettingsSnafu)?;
        let _guards = init_global_logging(APP_NAME, &settings.logging).context(LoggingSnafu)?;
        set_panic_hook();

        let mut script = match &self.script {
            Some(script) => parse_script(script)?,
            None => VecDeque::new(),
        };

        let media = Arc::new(RwLock::new(settings.simulation.build_media()));
        let mut console = Console::new(PlaybackController::new(
            Arc::clone(&media),
            settings.playlist(),
            settings.player.clone(),
        ));

        let step = settings.simulation.media_step();
        let mut ticker = tokio::time::interval(settings.simulation.tick());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdin_open = self.script.is_none();

        let limit = tokio::time::sleep(Duration::from_secs(self.duration_secs.unwrap_or_default()));
        tokio::pin!(limit);
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        info!(
            tick = ?settings.simulation.tick(),
            ?step,
            episodes = console.controller.playlist().len(),
            "simulation started"
        );
        if stdin_open {
            println!("{CONSOLE_HELP}");
        }
        console.render();

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let events = media.write().advance(step);
                    for event in events {
                        console.controller.on_media_event(event);
                    }
                    if let Some(command) = script.pop_front() {
                        console.apply(command);
                    }
                    console.render();
                }
                line = lines.next_line(), if stdin_open => {
                    match line.context(ReadStdinSnafu)? {
                        Some(line) if line.trim().is_empty() => {}
                        Some(line) => console.handle_line(&line),
                        None => {
                            debug!("stdin closed");
                            stdin_open = false;
                        }
                    }
                }
                () = &mut limit, if self.duration_secs.is_some() => {
                    info!("time limit reached");
                    break;
                }
                signal = &mut ctrl_c => {
                    signal.context(SignalSnafu)?;
                    info!("interrupted");
                    break;
                }
            }
        }
        Ok(())
    }
}

/// Splits a `;`-separated script into commands, failing on the first bad one.
fn parse_script(script: &str) -> Result<VecDeque<Command>> {
    script
        .split(';')
        .map(str::trim)
        .filter(|command| !command.is_empty())
        .map(|command| command.parse::<Command>().context(ScriptSnafu))
        .collect()
}

/// Applies commands and prints the player bar whenever it changes.
struct Console<M> {
    controller: PlaybackController<M>,
    last_line:  Option<String>,
}

impl<M: MediaResource> Console<M> {
    const fn new(controller: PlaybackController<M>) -> Self {
        Self {
            controller,
            last_line: None,
        }
    }

    fn handle_line(&mut self, line: &str) {
        if let Some(level) = line.trim().strip_prefix("log ") {
            if let Err(err) = reload_level(level.trim()) {
                println!("[log] {err}");
            }
            return;
        }
        if let Some(command) = line.parse::<Command>().log_err() {
            self.apply(command);
            self.render();
        }
    }

    fn apply(&mut self, command: Command) {
        match self.controller.dispatch(command).log_err() {
            Some(Some(notification)) => self.alert(&notification),
            Some(None) => {
                if let Command::ToggleFavorite(index) = command {
                    if let Some(episode) = self.controller.playlist().episodes().get(index) {
                        println!("{} {}", episode.star(), episode.title);
                    }
                }
            }
            None => {}
        }
    }

    fn alert(&self, notification: &Notification) {
        println!("[alert] {notification}");
        if let Some(info) = self.controller.now_playing() {
            println!("  {info}");
        }
    }

    fn render(&mut self) {
        let line = self.status_line();
        if self.last_line.as_deref() != Some(line.as_str()) {
            println!("{line}");
            self.last_line = Some(line);
        }
    }

    fn status_line(&self) -> String {
        format!(
            "{} | vol {:>3.0}% | {}",
            self.controller.view(),
            self.controller.volume() * 100.0,
            self.controller.rate()
        )
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match cli.commands {
        Commands::Episodes(args) => args.run(),
        Commands::Simulate(args) => args.run().await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let mut frames = Vec::new();
            err.debug_fmt(0, &mut frames);
            tracing::error!(status = %err.status_code(), ?frames, "castplay failed");
            eprintln!("error: {}", err.output_msg());
            ExitCode::from(u8::try_from(err.status_code().exit_code()).unwrap_or(1))
        }
    }
}
