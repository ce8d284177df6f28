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

use std::{fmt, path::Path};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::{Cadence, DatasetSpec, TimeAxisReader, inventory};
use crate::errors::Result;

/// what we have locally for a dataset
#[derive(Debug,Clone,PartialEq,Eq,Serialize)]
pub struct AvailabilityReport {
    pub dataset_id: String,

    /// latest available unit (or last time axis date for gridded datasets)
    pub local_latest: Option<NaiveDate>,

    /// is there any local data for the requested year
    pub found: bool,

    /// is the file for the requested date/period present
    pub requested_present: bool,
}

impl AvailabilityReport {
    pub fn not_found (dataset_id: &str)->Self {
        AvailabilityReport { dataset_id: dataset_id.to_string(), local_latest: None, found: false, requested_present: false }
    }
}

impl fmt::Display for AvailabilityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.requested_present { "[Yes]" } else { "[No] " };
        match self.local_latest {
            Some(date) => write!(f, "{} {}: latest available {}", mark, self.dataset_id, date),
            None => write!(f, "{} {}: no local data", mark, self.dataset_id)
        }
    }
}

/// check local availability of a dataset in `dir` as of a given date.
/// Enumerable (daily/monthly) datasets are checked by filename, annual gridded datasets by reading
/// the last time value of the file for the year - which is only opened if it exists
pub fn check_availability (dir: &Path, spec: &DatasetSpec, as_of: NaiveDate, reader: &dyn TimeAxisReader) -> Result<AvailabilityReport> {
    let requested_path = dir.join( spec.template.encode(as_of));
    let requested_present = requested_path.is_file();

    match spec.cadence {
        Cadence::Daily | Cadence::Monthly => {
            let local_latest = inventory::latest( dir, spec, as_of.year())?;
            Ok( AvailabilityReport {
                dataset_id: spec.id.clone(),
                local_latest,
                found: local_latest.is_some(),
                requested_present
            })
        }
        Cadence::Annual => {
            if requested_present {
                let last = reader.last_time( &requested_path, spec.time_var())?;
                Ok( AvailabilityReport {
                    dataset_id: spec.id.clone(),
                    local_latest: Some(last.date()),
                    found: true,
                    requested_present
                })
            } else {
                debug!("no gridded file {:?}", requested_path);
                Ok( AvailabilityReport::not_found( &spec.id))
            }
        }
    }
}
