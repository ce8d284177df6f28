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

use std::{fmt, fs, path::{Path,PathBuf}, sync::Arc, time::Duration};
use chrono::{Datelike, NaiveDate, Utc};
use futures::{future::join_all, stream::{self, StreamExt}};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug,info,warn};

use crate::{Cadence, DatasetSpec, DateRange, FetchOutcome, Fetcher, FireSyncConfig, HttpFetcher, TimeAxisReader};
use crate::{availability::{self, AvailabilityReport}, config::join_url, fetch::remove_stale_temp_files, inventory, planner, timeaxis::default_time_axis_reader};
use crate::errors::{Result, OdinFireSyncError, config_error, op_failed};

/// temp files of interrupted transfers older than this are removed before syncing a dataset
const STALE_TEMP_AGE: Duration = Duration::from_secs(3600);

/// outcome of syncing one dataset. Per-unit failures do not abort the sync, they are collected here
#[derive(Debug)]
pub struct SyncResult {
    pub dataset_id: String,
    pub planned: DateRange,
    /// successfully fetched units in date order
    pub fetched: Vec<(NaiveDate,FetchOutcome)>,
    /// failed units in date order
    pub failures: Vec<(NaiveDate,OdinFireSyncError)>,
    /// units that were not fetched because the sync was cancelled
    pub skipped: Vec<NaiveDate>,
}

impl SyncResult {
    fn new (dataset_id: &str, planned: DateRange)->Self {
        SyncResult { dataset_id: dataset_id.to_string(), planned, fetched: Vec::new(), failures: Vec::new(), skipped: Vec::new() }
    }

    pub fn fetched_dates (&self)->Vec<NaiveDate> {
        self.fetched.iter().map( |(d,_)| *d).collect()
    }

    /// number of units for which we wrote new local files
    pub fn n_downloaded (&self)->usize {
        self.fetched.iter().filter( |(_,o)| o.is_download()).count()
    }

    /// number of fetches that were issued
    pub fn n_attempted (&self)->usize {
        self.fetched.len() + self.failures.len()
    }

    pub fn is_complete (&self)->bool {
        self.failures.is_empty() && self.skipped.is_empty()
    }
}

impl fmt::Display for SyncResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: planned {}, {} fetched ({} downloaded), {} failed, {} skipped",
            self.dataset_id, self.planned, self.fetched.len(), self.n_downloaded(), self.failures.len(), self.skipped.len())
    }
}

/// the top level object to check and synchronize the configured datasets
pub struct SyncOrchestrator {
    config: Arc<FireSyncConfig>,
    fetcher: Arc<dyn Fetcher>,
    time_reader: Arc<dyn TimeAxisReader>,
    cancel: CancellationToken,
    /// shared by all datasets so that concurrent syncs stay within `max_concurrent_fetches`
    fetch_permits: Arc<Semaphore>,
}

impl SyncOrchestrator {
    pub fn new (config: FireSyncConfig, fetcher: Arc<dyn Fetcher>, time_reader: Arc<dyn TimeAxisReader>)->Result<Self> {
        config.validate()?;
        let fetch_permits = Arc::new( Semaphore::new( config.max_concurrent_fetches));
        Ok( SyncOrchestrator { config: Arc::new(config), fetcher, time_reader, cancel: CancellationToken::new(), fetch_permits } )
    }

    /// orchestrator using the [`HttpFetcher`] and the default time axis reader
    pub fn with_http (config: FireSyncConfig)->Result<Self> {
        SyncOrchestrator::with_http_cancel( config, CancellationToken::new())
    }

    /// orchestrator using the [`HttpFetcher`], which stops retrying running fetches once `cancel` is cancelled
    pub fn with_http_cancel (config: FireSyncConfig, cancel: CancellationToken)->Result<Self> {
        let fetcher = Arc::new( HttpFetcher::new( &config)?.with_cancel_token( cancel.clone()));
        Ok( SyncOrchestrator::new( config, fetcher, default_time_axis_reader())?.with_cancel_token( cancel) )
    }

    /// use an externally owned token to cancel syncs of this orchestrator. Fetchers have to observe
    /// the same token if they should also stop retries of running units
    pub fn with_cancel_token (mut self, cancel: CancellationToken)->Self {
        self.cancel = cancel;
        self
    }

    pub fn config (&self)->&FireSyncConfig { &self.config }

    /// cancelling this token stops issuing new fetches. In-flight fetches are completed
    pub fn cancel_token (&self)->CancellationToken { self.cancel.clone() }

    //--- availability

    pub fn check_availability (&self, dataset_id: &str, as_of: NaiveDate)->Result<AvailabilityReport> {
        let spec = self.config.dataset( dataset_id)?;
        let dir = self.config.dataset_dir( spec)?;
        availability::check_availability( &dir, spec, as_of, self.time_reader.as_ref())
    }

    /// check all configured datasets. A failed check only affects its own dataset
    pub fn check_all (&self, as_of: NaiveDate)->Vec<(String,Result<AvailabilityReport>)> {
        self.config.datasets.iter()
            .map( |ds| (ds.id.clone(), self.check_availability( &ds.id, as_of)))
            .collect()
    }

    //--- planning

    /// the units a sync of the dataset would fetch as of `today` (dry run)
    pub fn plan (&self, dataset_id: &str, today: NaiveDate)->Result<DateRange> {
        let spec = self.config.dataset( dataset_id)?;
        let dir = self.config.dataset_dir( spec)?;
        self.plan_spec( spec, &dir, today)
    }

    fn plan_spec (&self, spec: &DatasetSpec, dir: &Path, today: NaiveDate)->Result<DateRange> {
        match spec.cadence {
            // there is only one (growing) file per year
            Cadence::Annual => Ok( DateRange::single( today, Cadence::Annual)),
            cadence => {
                let latest = self.local_latest( spec, dir, today)?;
                Ok( planner::plan( latest, today, cadence))
            }
        }
    }

    fn local_latest (&self, spec: &DatasetSpec, dir: &Path, today: NaiveDate)->Result<Option<NaiveDate>> {
        let year = today.year();
        let mut latest = inventory::latest( dir, spec, year)?;

        if latest.is_none() && self.config.cross_year_lookback {
            latest = inventory::latest( dir, spec, year - 1)?;
            if let Some(date) = latest {
                info!("{}: no data for {}, continuing from {}", spec.id, year, date);
            }
        }
        Ok(latest)
    }

    //--- sync

    /// sync dataset up to the current (UTC) date
    pub async fn sync_dataset (&self, dataset_id: &str)->Result<SyncResult> {
        self.sync_dataset_as_of( dataset_id, Utc::now().date_naive()).await
    }

    pub async fn sync_dataset_as_of (&self, dataset_id: &str, today: NaiveDate)->Result<SyncResult> {
        let spec = self.config.dataset( dataset_id)?;
        self.sync_spec( spec, today).await
    }

    /// sync all datasets that have a remote URL, concurrently
    pub async fn sync_all (&self)->Vec<(String,Result<SyncResult>)> {
        self.sync_all_as_of( Utc::now().date_naive()).await
    }

    pub async fn sync_all_as_of (&self, today: NaiveDate)->Vec<(String,Result<SyncResult>)> {
        let syncs = self.config.datasets.iter()
            .filter( |ds| ds.remote_url.is_some())
            .map( |ds| async move { (ds.id.clone(), self.sync_spec( ds, today).await) });

        join_all( syncs).await
    }

    /// bring the local files of `spec` up to `today`. Only systemic problems (no remote URL, dataset dir
    /// not writable, unreadable inventory) are returned as errors
    pub async fn sync_spec (&self, spec: &DatasetSpec, today: NaiveDate)->Result<SyncResult> {
        let base_url = spec.remote_url.as_deref().ok_or( config_error( format!("dataset {} has no remote URL", spec.id)))?;
        let dir = self.config.dataset_dir( spec)?;
        ensure_writable_dir( &dir)?;
        let n_stale = remove_stale_temp_files( &dir, STALE_TEMP_AGE)?;
        if n_stale > 0 {
            info!("{}: removed {} stale temp files", spec.id, n_stale);
        }

        if spec.cadence == Cadence::Annual {
            match availability::check_availability( &dir, spec, today, self.time_reader.as_ref()) {
                Ok(report) => info!("{report}"),
                Err(e) => warn!("cannot determine last time of {}: {e}", spec.id)
            }
        }

        let planned = self.plan_spec( spec, &dir, today)?;
        info!("{}: syncing {} units {}", spec.id, planned.len(), planned);

        Ok( self.fetch_range( spec, base_url, &dir, planned).await )
    }

    async fn fetch_range (&self, spec: &DatasetSpec, base_url: &str, dir: &Path, planned: DateRange)->SyncResult {
        let cancel = &self.cancel;

        let outcomes: Vec<(NaiveDate,Option<Result<FetchOutcome>>)> = stream::iter( planned.iter())
            .map( |date| {
                let filename = spec.template.encode(date);
                let url = join_url( base_url, &filename);
                let dest: PathBuf = dir.join( &filename);
                let fetcher = self.fetcher.clone();
                let permits = self.fetch_permits.clone();

                async move {
                    let _permit = match permits.acquire().await {
                        Ok(permit) => permit,
                        Err(e) => return (date, Some( Err( op_failed(e))))
                    };
                    if cancel.is_cancelled() {
                        (date, None)
                    } else {
                        debug!("fetching {url}");
                        (date, Some( fetcher.fetch( &url, &dest).await))
                    }
                }
            })
            .buffered( self.config.max_concurrent_fetches)
            .collect().await;

        let mut result = SyncResult::new( &spec.id, planned);
        for (date,outcome) in outcomes {
            match outcome {
                Some(Ok(o)) => result.fetched.push( (date,o)),
                Some(Err(e)) => {
                    warn!("{} {}: {}", spec.id, date, e);
                    result.failures.push( (date,e))
                }
                None => result.skipped.push(date)
            }
        }

        info!("{result}");
        result
    }
}

/// check if dir exists and is writable, try to create it otherwise
fn ensure_writable_dir (dir: &Path)->Result<()> {
    if dir.is_dir() {
        if fs::metadata(dir)?.permissions().readonly() {
            Err( OdinFireSyncError::IOError( std::io::Error::new( std::io::ErrorKind::PermissionDenied, format!("{dir:?} not writable"))))
        } else {
            Ok(())
        }
    } else {
        Ok( fs::create_dir_all(dir)? )
    }
}
