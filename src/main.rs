//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

#![warn(rust_2018_idioms)]

use std::io::{self, BufRead};

use tracing_subscriber::EnvFilter;
use udprip::cli::{self, Command};
use udprip::{config, ConfigError, Router};

fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive("udprip=info".parse().unwrap())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cfg = match config::parse_args(std::env::args()) {
        Ok(cfg) => cfg,
        Err(error) => {
            error.log();
            std::process::exit(1);
        }
    };

    let router = match Router::bind(cfg.addr, cfg.period).await {
        Ok(router) => router,
        Err(error) => {
            error.log();
            std::process::exit(1);
        }
    };
    tracing::info!(addr = %router.self_addr(), period = ?cfg.period, "router started");

    if let Some(path) = &cfg.startup_file {
        match cli::read_startup_file(path) {
            Ok(commands) => {
                for cmd in commands {
                    router.apply_command(cmd).await;
                }
            }
            Err(io_error) => {
                ConfigError::StartupFileUnreadable(path.clone(), io_error).log();
                std::process::exit(1);
            }
        }
    }

    // Keep the background tasks alive for as long as the operator loop runs;
    // dropping this at the end of `main` aborts them.
    let _background = router.spawn_background();

    run_operator_loop(&router).await;
}

/// Reads one command per line from stdin until EOF or `quit`. Runs on
/// a blocking thread so it never holds up the tokio runtime while waiting
/// on input.
async fn run_operator_loop(router: &Router) {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<String>();
    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });

    while let Some(line) = rx.recv().await {
        match cli::parse_line(&line) {
            Ok(Some(Command::Quit)) => break,
            Ok(Some(cmd)) => router.apply_command(cmd).await,
            Ok(None) => {}
            Err(error) => println!("{error}"),
        }
    }
}
