/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! command line tool to check and update the local fire input datasets, e.g.
//! ```text
//!   firesync check --date 2024-08-01
//!   firesync --config firesync.ron sync VNP14IMGTDL VJ114IMGTDL
//! ```

use std::path::PathBuf;
use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use odin_firesync::{FireSyncConfig, SyncOrchestrator, load_config};

#[derive(Parser,Debug)]
#[command(version, about="check and update local fire input datasets")]
struct Args {
    /// RON config file (built-in defaults if not set)
    #[arg(long,short)]
    config: Option<PathBuf>,

    /// local root directory (overrides config)
    #[arg(long,short)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand,Debug)]
enum Cmd {
    /// report local availability
    Check {
        /// date to check (YYYY-MM-DD), default is today
        #[arg(long,short)]
        date: Option<NaiveDate>,
        /// datasets to check (all if none)
        datasets: Vec<String>,
    },
    /// show what a sync would fetch
    Plan {
        #[arg(long,short)]
        date: Option<NaiveDate>,
        datasets: Vec<String>,
    },
    /// fetch missing and updated files (terminate with Ctrl-C)
    Sync {
        /// datasets to sync (all with remote URL if none)
        datasets: Vec<String>,
    },
}

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::try_from_default_env().unwrap_or_else( |_| EnvFilter::new("info")))  // use RUST_LOG to set level
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => load_config( path)?,
        None => FireSyncConfig::default()
    };
    if let Some(root) = &args.root {
        config.local_root = root.clone();
    }

    let ids = |datasets: &Vec<String>, config: &FireSyncConfig| -> Vec<String> {
        if datasets.is_empty() { config.datasets.iter().map( |ds| ds.id.clone()).collect() } else { datasets.clone() }
    };

    let orchestrator = SyncOrchestrator::with_http( config)?;
    let today = Utc::now().date_naive();

    match &args.cmd {
        Cmd::Check { date, datasets } => {
            let as_of = date.unwrap_or(today);
            for id in ids( datasets, orchestrator.config()) {
                match orchestrator.check_availability( &id, as_of) {
                    Ok(report) => println!("{report}"),
                    Err(e) => println!("[ERR] {id}: {e}")
                }
            }
        }
        Cmd::Plan { date, datasets } => {
            let as_of = date.unwrap_or(today);
            for id in ids( datasets, orchestrator.config()) {
                match orchestrator.plan( &id, as_of) {
                    Ok(range) => println!("{id}: {} units {range}", range.len()),
                    Err(e) => println!("{id}: ERROR {e}")
                }
            }
        }
        Cmd::Sync { datasets } => {
            let cancel = orchestrator.cancel_token();
            tokio::spawn( async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    println!("cancelling, waiting for running transfers to finish..");
                    cancel.cancel();
                }
            });

            let results = if datasets.is_empty() {
                orchestrator.sync_all().await
            } else {
                let mut list = Vec::with_capacity( datasets.len());
                for id in datasets {
                    list.push( (id.clone(), orchestrator.sync_dataset( id).await));
                }
                list
            };

            for (id,res) in results {
                match res {
                    Ok(sync_result) => {
                        println!("{sync_result}");
                        for (date,e) in &sync_result.failures {
                            println!("    {date}: {e}");
                        }
                    }
                    Err(e) => println!("{id}: ERROR {e}")
                }
            }
        }
    }

    Ok(())
}
