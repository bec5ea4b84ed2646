//! Server alarm.
//!
//! Pings one host on a fixed schedule and, the moment it answers, raises a
//! blocking alert with a looped alarm sound.
//!
//! # Architecture Overview
//!
//! ```text
//!   stdin ──► frontend::console ──┐
//!                                 ├──► command::dispatch ──► monitor::controller
//!   SIGINT ──► lifecycle::signals ┘                              │
//!                                                                ▼
//!                                       probe (ping/tcp) ◄── poll worker
//!                                                                │ reachable
//!                                                                ▼
//!                                  alarm::presenter ◄── alarm::session ──► alarm::sound
//!
//!   monitor::controller ──(watch)──► frontend::console::print_status
//!   config::watcher ──(reload)──► monitor::controller
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::sync::mpsc;

use server_alarm::command::CommandDispatcher;
use server_alarm::config::loader::{default_config_path, load_with_fallback, report_fallback};
use server_alarm::config::watcher::ConfigWatcher;
use server_alarm::frontend::console;
use server_alarm::lifecycle::{self, signals, Mode, Shutdown};
use server_alarm::observability;
use server_alarm::Command;

#[derive(Parser)]
#[command(name = "server-alarm")]
#[command(about = "Raise an alarm the moment a server becomes reachable", long_about = None)]
struct Cli {
    /// Config file (default: server-alarm.toml beside the executable, else in the working directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log alerts instead of showing them, and play no sound
    #[arg(long)]
    headless: bool,

    /// Wait for a `start` command instead of monitoring immediately
    #[arg(long)]
    no_autostart: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(default_config_path);

    let (config, config_problem) = load_with_fallback(&config_path);
    observability::init_logging(&config.logging);
    if let Some(e) = &config_problem {
        report_fallback(&config_path, e);
    }

    tracing::info!(
        config = %config_path.display(),
        host = %config.server.hostname,
        interval_secs = config.server.ping_interval,
        method = ?config.server.method,
        "server-alarm v0.1.0 starting"
    );

    let mode = if cli.headless {
        Mode::Headless
    } else {
        Mode::Interactive
    };
    let assembly = lifecycle::assemble(config, mode);
    let controller = assembly.controller;

    let shutdown = Shutdown::new();
    let (command_tx, command_rx) = mpsc::channel::<Command>(16);

    // Hot reload; the watcher must stay alive for the whole run.
    let (watcher, mut config_updates) = ConfigWatcher::new(&config_path);
    let _watcher = match watcher.run() {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            tracing::warn!(error = %e, "Config hot reload unavailable");
            None
        }
    };
    let reload_target = controller.clone();
    tokio::spawn(async move {
        while let Some(config) = config_updates.recv().await {
            reload_target.update_config(config);
        }
    });

    tokio::spawn(signals::forward_interrupts(command_tx.clone()));
    tokio::spawn(console::print_status(controller.subscribe(), shutdown.subscribe()));

    println!("{}", console::HELP);
    tokio::spawn(console::read_commands(
        console::spawn_stdin_reader(),
        command_tx.clone(),
        assembly.console.clone(),
        controller.subscribe(),
        shutdown.subscribe(),
    ));

    if !cli.no_autostart {
        command_tx.send(Command::Start).await?;
    }
    drop(command_tx);

    CommandDispatcher::new(controller, command_rx).run().await;
    shutdown.trigger();

    tracing::info!("Shutdown complete");
    Ok(())
}
