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

//! time-stamped, atomic file retrieval

use std::{fs, io::Write, path::Path, time::{Duration,SystemTime}};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode, header::{HeaderMap,HeaderName,HeaderValue,IF_MODIFIED_SINCE,LAST_MODIFIED}};
use tempfile::Builder;
use tokio_util::sync::CancellationToken;
use tracing::{debug,info,warn};

use crate::FireSyncConfig;
use crate::errors::{Result, OdinFireSyncError, config_error, op_failed};

/// result of a successful fetch
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum FetchOutcome {
    /// new remote content was stored
    Downloaded { bytes: u64 },
    /// local file is already current, nothing was written
    NotModified
}

impl FetchOutcome {
    pub fn is_download (&self)->bool {
        matches!( self, FetchOutcome::Downloaded{..})
    }
}

/// the transfer abstraction used by the orchestrator. Implementations have to be idempotent (no write
/// if the remote resource did not change) and must only make `dest` visible once it is complete
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch (&self, url: &str, dest: &Path) -> Result<FetchOutcome>;
}

/// prefix of the temp files we download into. Leftovers of killed processes are removed by
/// [`remove_stale_temp_files`]
pub const TEMP_PREFIX: &str = ".firesync-";
pub const TEMP_SUFFIX: &str = ".part";

/// reqwest based [`Fetcher`] with If-Modified-Since time-stamping, stall detection and retries for
/// transient failures. Retries stop once the cancel token is cancelled
#[derive(Debug,Clone)]
pub struct HttpFetcher {
    client: Client,
    headers: HeaderMap,
    max_retry: u8,
    retry_delay: Duration,
    cancel: CancellationToken,
}

impl HttpFetcher {
    pub fn new (config: &FireSyncConfig)->Result<Self> {
        let mut builder = Client::builder()
            .connect_timeout( config.connect_timeout)
            .read_timeout( config.read_timeout); // only fails stalled transfers, not slow ones
        if let Some(max_time) = config.request_timeout {
            builder = builder.timeout( max_time);
        }
        let client = builder.build()?;
        let headers = get_headermap( &config.headers)?;

        Ok( HttpFetcher { client, headers, max_retry: config.max_retry, retry_delay: config.retry_delay, cancel: CancellationToken::new() } )
    }

    pub fn with_cancel_token (mut self, cancel: CancellationToken)->Self {
        self.cancel = cancel;
        self
    }

    async fn fetch_once (&self, url: &str, dest: &Path) -> Result<FetchOutcome> {
        let dir = dest.parent().ok_or( op_failed( format!("no parent dir for {dest:?}")))?;
        fs::create_dir_all(dir)?;

        let local_modified = fs::metadata(dest).ok().and_then( |md| md.modified().ok());

        let mut req = self.client.get(url).headers( self.headers.clone());
        if let Some(t) = local_modified {
            req = req.header( IF_MODIFIED_SINCE, to_http_date(t));
        }
        let mut response = req.send().await.map_err( |e| request_error( url, e))?;

        match response.status() {
            StatusCode::NOT_MODIFIED => {
                debug!("{url} not modified");
                Ok(FetchOutcome::NotModified)
            }
            StatusCode::OK => {
                let remote_modified = last_modified( &response);

                // server might not support conditional requests
                if let (Some(local),Some(remote)) = (local_modified,remote_modified) {
                    if remote <= local {
                        debug!("{url} not newer than local file");
                        return Ok(FetchOutcome::NotModified)
                    }
                }

                // don't use dest yet as that would expose partial downloads
                let mut file = Builder::new().prefix( TEMP_PREFIX).suffix( TEMP_SUFFIX).tempfile_in(dir)?;
                let mut len: u64 = 0;
                while let Some(chunk) = response.chunk().await.map_err( |e| request_error( url, e))? {
                    len += chunk.len() as u64;
                    file.write_all(&chunk)?;
                }
                file.flush()?;

                if let Some(t) = remote_modified {
                    file.as_file().set_modified(t)?;
                }
                file.persist(dest).map_err( |e| e.error)?; // now make it visible as a permanent file
                info!("{} bytes saved to {:?}", len, dest);

                Ok(FetchOutcome::Downloaded { bytes: len })
            }
            StatusCode::NOT_FOUND => {
                Err( OdinFireSyncError::RemoteNotFound( url.to_string()))
            }
            other => {
                Err( OdinFireSyncError::HttpStatusError { url: url.to_string(), status: other.as_u16() })
            }
        }
        // temp files of failed transfers are deleted when dropped
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch (&self, url: &str, dest: &Path) -> Result<FetchOutcome> {
        let mut retry = 0;
        loop {
            match self.fetch_once( url, dest).await {
                Ok(outcome) => return Ok(outcome),
                Err(e) => {
                    if e.is_retryable() && retry < self.max_retry && !self.cancel.is_cancelled() {
                        retry += 1;
                        info!("{url} failed with {e}, retry {retry}/{} in {} sec", self.max_retry, self.retry_delay.as_secs());
                        tokio::select! {
                            _ = tokio::time::sleep( self.retry_delay) => {}
                            _ = self.cancel.cancelled() => {
                                info!("{url} retry cancelled");
                                return Err(e)
                            }
                        }
                    } else {
                        return Err(e)
                    }
                }
            }
        }
    }
}

fn request_error (url: &str, e: reqwest::Error)->OdinFireSyncError {
    if e.is_timeout() {
        OdinFireSyncError::FetchTimeout( url.to_string())
    } else {
        OdinFireSyncError::HttpError(e)
    }
}

/// remove temp files in `dir` that have not been written to for `max_age`. Files of running
/// transfers are skipped since their mtime keeps getting updated
pub fn remove_stale_temp_files (dir: &Path, max_age: Duration)->Result<usize> {
    let now = SystemTime::now();
    let mut n = 0;

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let is_temp = entry.file_name().to_str().is_some_and( |f| f.starts_with(TEMP_PREFIX) && f.ends_with(TEMP_SUFFIX));
        if is_temp && entry.file_type()?.is_file() {
            let modified = entry.metadata()?.modified()?;
            if now.duration_since(modified).is_ok_and( |age| age > max_age) {
                match fs::remove_file( entry.path()) {
                    Ok(()) => n += 1,
                    Err(e) => warn!("cannot remove stale temp file {:?}: {e}", entry.path())
                }
            }
        }
    }
    Ok(n)
}

/// parse "<name>: <value>" header specs
pub fn get_headermap (headers: &[String]) -> Result<HeaderMap> {
    let mut hm = HeaderMap::new();
    for h in headers {
        let idx = h.find(':').ok_or( config_error( format!("invalid header spec {h:?}")))?;
        let k = h[0..idx].trim();
        let v = h[idx+1..].trim();
        hm.append(
            HeaderName::from_bytes( k.as_bytes()).map_err( |e| config_error( e))?,
            HeaderValue::from_str(v).map_err( |e| config_error( e))?
        );
    }
    Ok(hm)
}

/// IMF-fixdate as used by HTTP headers (e.g. "Sun, 06 Nov 1994 08:49:37 GMT")
pub fn to_http_date (t: SystemTime)->String {
    let dt: DateTime<Utc> = t.into();
    dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

pub fn parse_http_date (s: &str)->Option<SystemTime> {
    DateTime::parse_from_rfc2822(s).ok().map( |dt| dt.with_timezone(&Utc).into())
}

fn last_modified (response: &Response)->Option<SystemTime> {
    response.headers().get( LAST_MODIFIED)
        .and_then( |v| v.to_str().ok())
        .and_then( parse_http_date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_date() {
        let t = parse_http_date("Sun, 06 Nov 1994 08:49:37 GMT").expect("valid date");
        assert_eq!( to_http_date(t), "Sun, 06 Nov 1994 08:49:37 GMT");
    }

    #[test]
    fn test_remove_stale_temp_files() {
        let tmp = tempfile::TempDir::new().unwrap();
        let old = SystemTime::now() - Duration::from_secs(7200);

        for fname in [".firesync-a1b2.part", "fm1000_2024.nc", ".firesync-c3d4.tmp"] {
            let f = fs::File::create( tmp.path().join(fname)).unwrap();
            f.set_modified(old).unwrap();
        }
        fs::write( tmp.path().join(".firesync-e5f6.part"), "running").unwrap();

        assert_eq!( remove_stale_temp_files( tmp.path(), Duration::from_secs(3600)).unwrap(), 1);
        assert!( !tmp.path().join(".firesync-a1b2.part").exists());
        assert!( tmp.path().join(".firesync-e5f6.part").exists());
        assert!( tmp.path().join(".firesync-c3d4.tmp").exists());
        assert!( tmp.path().join("fm1000_2024.nc").exists());
    }

    #[test]
    fn test_headermap() {
        let hm = get_headermap( &vec!["Authorization: Bearer 42".to_string()]).unwrap();
        assert_eq!( hm.get("authorization").unwrap(), "Bearer 42");
        assert!( get_headermap( &vec!["no-colon".to_string()]).is_err());
    }
}
