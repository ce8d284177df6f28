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

use std::{collections::HashSet, env, path::{Path,PathBuf}, time::Duration};
use serde::{Serialize,Deserialize};
use ron;

use crate::{Cadence, FilenameTemplate};
use crate::errors::{Result, config_error};

/// description of a single synchronized dataset. These are created when the config is loaded and
/// never modified afterwards
#[derive(Clone,Serialize,Deserialize,Debug,PartialEq)]
pub struct DatasetSpec {
    /// unique name of the dataset (e.g. "VNP14IMGTDL")
    pub id: String,

    pub cadence: Cadence,

    /// provider filename pattern, e.g. `SUOMI_VIIRS_C2_Global_VNP14IMGTDL_NRT_${yyyyDDD}.txt`
    pub template: FilenameTemplate,

    /// base URL the filename gets appended to. Datasets without URL can only be checked, not synced
    #[serde(default)]
    pub remote_url: Option<String>,

    /// local directory of the dataset files. Relative paths are resolved against the `local_root`
    pub local_dir: PathBuf,

    /// name of the time variable for annual gridded datasets (CF default is "time")
    #[serde(default)]
    pub time_var: Option<String>,
}

impl DatasetSpec {
    pub fn new (id: &str, cadence: Cadence, pattern: &str, remote_url: Option<&str>, local_dir: impl AsRef<Path>)->Result<Self> {
        let spec = DatasetSpec {
            id: id.to_string(),
            cadence,
            template: FilenameTemplate::new(pattern)?,
            remote_url: remote_url.map(|s| s.to_string()),
            local_dir: local_dir.as_ref().to_path_buf(),
            time_var: None
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn with_time_var (mut self, var_name: &str)->Self {
        self.time_var = Some(var_name.to_string());
        self
    }

    pub fn validate (&self)->Result<()> {
        if self.id.is_empty() {
            return Err( config_error("empty dataset id"))
        }
        if self.template.cadence() != self.cadence {
            return Err( config_error( format!("dataset {} is {} but filename pattern {} is {}",
                self.id, self.cadence, self.template, self.template.cadence())))
        }
        if let Some(url) = &self.remote_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err( config_error( format!("dataset {} has no http(s) URL: {}", self.id, url)))
            }
        }
        Ok(())
    }

    /// full remote URL for a given filename of this dataset
    pub fn remote_file_url (&self, filename: &str)->Option<String> {
        self.remote_url.as_ref().map( |base| join_url( base, filename))
    }

    pub fn time_var (&self)->&str {
        self.time_var.as_deref().unwrap_or("time")
    }
}

/// general configuration of the sync process, including all datasets we know about
#[derive(Clone,Serialize,Deserialize,Debug)]
#[serde(default)]
pub struct FireSyncConfig {
    /// root directory for relative dataset dirs. Can use `~` and `$VAR` path elements
    pub local_root: PathBuf,

    /// additional request headers ("<name>: <value>"), e.g. for provider authorization
    pub headers: Vec<String>,

    pub connect_timeout: Duration,

    /// max time without receiving data before a transfer is considered stalled
    pub read_timeout: Duration,

    /// optional upper bound for a complete request including the body transfer. Large files on slow
    /// links can take a long time, hence this is not set by default
    pub request_timeout: Option<Duration>,

    /// max retry attempts for transient fetch failures
    pub max_retry: u8,

    /// delay between retry attempts
    pub retry_delay: Duration,

    /// max number of concurrent fetches over all datasets
    pub max_concurrent_fetches: usize,

    /// if there is no file for the current year yet, plan from the latest file of the previous year
    pub cross_year_lookback: bool,

    pub datasets: Vec<DatasetSpec>,
}

impl Default for FireSyncConfig {
    fn default() -> Self {
        FireSyncConfig {
            local_root: PathBuf::from("~/.odin/data/extdata"),
            headers: Vec::new(),
            connect_timeout: Duration::from_secs(20),
            read_timeout: Duration::from_secs(60),
            request_timeout: None,
            max_retry: 2,
            retry_delay: Duration::from_secs(10),
            max_concurrent_fetches: 4,
            cross_year_lookback: false,
            datasets: default_datasets(),
        }
    }
}

impl FireSyncConfig {
    /// a config with the built-in defaults for everything but the given datasets
    pub fn with_datasets (local_root: impl AsRef<Path>, datasets: Vec<DatasetSpec>)->Self {
        FireSyncConfig { local_root: local_root.as_ref().to_path_buf(), datasets, ..FireSyncConfig::default() }
    }

    pub fn validate (&self)->Result<()> {
        if self.max_concurrent_fetches == 0 || self.max_concurrent_fetches > tokio::sync::Semaphore::MAX_PERMITS {
            return Err( config_error( format!("invalid max_concurrent_fetches {}", self.max_concurrent_fetches)))
        }

        let mut ids: HashSet<&str> = HashSet::new();
        for ds in &self.datasets {
            ds.validate()?;
            if !ids.insert( ds.id.as_str()) {
                return Err( config_error( format!("duplicated dataset id {}", ds.id)))
            }
        }
        Ok(())
    }

    pub fn dataset (&self, id: &str)->Result<&DatasetSpec> {
        self.datasets.iter()
            .find( |ds| ds.id == id)
            .ok_or( crate::OdinFireSyncError::UnknownDataset( id.to_string()))
    }

    /// the (expanded) local directory of a dataset
    pub fn dataset_dir (&self, spec: &DatasetSpec)->Result<PathBuf> {
        let dir = expand_path( &spec.local_dir)?;
        if dir.is_absolute() {
            Ok(dir)
        } else {
            Ok( expand_path( &self.local_root)?.join(dir))
        }
    }
}

pub fn join_url (base: &str, filename: &str)->String {
    if base.ends_with('/') { format!("{base}{filename}") } else { format!("{base}/{filename}") }
}

/// load and validate a RON config file
pub fn load_config (path: impl AsRef<Path>)->Result<FireSyncConfig> {
    let data = std::fs::read_to_string( path.as_ref())?;
    let config: FireSyncConfig = ron::from_str( &data)?;
    config.validate()?;
    Ok(config)
}

/// replace leading `~` and `$<name>` path elements
pub fn expand_path (path: impl AsRef<Path>)->Result<PathBuf> {
    let path = path.as_ref();
    let mut p = PathBuf::new();

    for (i,c) in path.iter().enumerate() {
        let e = c.to_str().ok_or( config_error( format!("invalid path: {path:?}")))?;

        if e == "~" && i == 0 {
            p.push( env::var("HOME").map_err(|_| config_error("HOME not set"))?)
        } else if e.len() > 1 && e.starts_with('$') {
            p.push( env::var( &e[1..]).map_err(|_| config_error( format!("{e} not set")))?)
        } else {
            p.push(e)
        }
    }

    Ok(p)
}

/// the datasets used as fire event input: VIIRS NRT active fire for SNPP and NOAA-20, the monthly
/// VIIRS archive files (check only, they are distributed via sftp) and the annual GridMET fm1000
pub fn default_datasets ()->Vec<DatasetSpec> {
    let firms_nrt = "https://nrt3.modaps.eosdis.nasa.gov/api/v2/content/archives/FIRMS";
    let gridmet = "http://www.northwestknowledge.net/metdata/data";

    let list = vec![
        DatasetSpec::new( "VNP14IMGTDL", Cadence::Daily, "SUOMI_VIIRS_C2_Global_VNP14IMGTDL_NRT_${yyyyDDD}.txt",
                          Some(&format!("{firms_nrt}/suomi-npp-viirs-c2/Global")), "VIIRS/VNP14IMGTDL"),
        DatasetSpec::new( "VJ114IMGTDL", Cadence::Daily, "NOAA20_VIIRS_C2_Global_VJ114IMGTDL_NRT_${yyyyDDD}.txt",
                          Some(&format!("{firms_nrt}/noaa-20-viirs-c2/Global")), "VIIRS/VJ114IMGTDL"),
        DatasetSpec::new( "VNP14IMGML", Cadence::Monthly, "VNP14IMGML.${yyyyMM}.C1.05.txt", None, "VIIRS/VNP14IMGML"),
        DatasetSpec::new( "VJ114IMGML", Cadence::Monthly, "VJ114IMGML.${yyyyMM}.C1.05.txt", None, "VIIRS/VJ114IMGML"),
        DatasetSpec::new( "GridMET_fm1000", Cadence::Annual, "fm1000_${yyyy}.nc", Some(gridmet), "GridMET")
            .map( |ds| ds.with_time_var("day")),
    ];

    // the patterns above are constant and valid
    list.into_iter().filter_map( |r| r.ok()).collect()
}
