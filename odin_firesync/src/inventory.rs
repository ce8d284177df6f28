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

//! local inventory of dataset files, derived from filenames only

use std::{fs, io::ErrorKind, path::{Path,PathBuf}};
use chrono::{Datelike, NaiveDate};
use tracing::{debug,warn};

use crate::{DatasetSpec, FilenameTemplate};
use crate::errors::{Result, OdinFireSyncError};

/// a locally cached dataset file
#[derive(Debug,Clone,PartialEq,Eq)]
pub struct InventoryEntry {
    pub date: NaiveDate,
    pub path: PathBuf,
}

/// get all files of `year` in `dir` that decode with the given template, sorted by date (and path for
/// duplicated dates). Undecodable names are skipped.
/// A missing directory is reported as `InventoryNotFound`
pub fn scan_dir (dir: &Path, template: &FilenameTemplate, year: i32) -> Result<Vec<InventoryEntry>> {
    let read_dir = match fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err( OdinFireSyncError::InventoryNotFound( dir.to_string_lossy().to_string()))
        }
        Err(e) => return Err(e.into())
    };

    let year_prefix = template.year_prefix(year);
    let mut list: Vec<InventoryEntry> = Vec::new();

    for entry in read_dir {
        let entry = entry?;
        if let Some(fname) = entry.file_name().to_str() {
            if fname.starts_with( &year_prefix) && entry.path().is_file() {
                match template.decode( fname) {
                    Ok(date) if date.year() == year => list.push( InventoryEntry { date, path: entry.path() }),
                    Ok(_) => {}
                    Err(e) => debug!("skipping {fname}: {e}")
                }
            }
        }
    }

    list.sort_by( |a,b| a.date.cmp(&b.date).then_with( || a.path.cmp(&b.path)));
    Ok(list)
}

/// reduce inventory to the latest date it contains, warning about duplicated dates
pub fn latest_entry (entries: &[InventoryEntry]) -> Option<NaiveDate> {
    for w in entries.windows(2) {
        if w[0].date == w[1].date {
            warn!("duplicated data for {}: {:?} and {:?}", w[0].date, w[0].path, w[1].path);
        }
    }
    entries.iter().map( |e| e.date).max()
}

/// the local files of a dataset for a given year
pub fn scan (dir: &Path, spec: &DatasetSpec, year: i32) -> Result<Vec<InventoryEntry>> {
    scan_dir( dir, &spec.template, year)
}

/// latest locally available date of a dataset for a given year. Missing directories or years without
/// decodable files yield `None`
pub fn latest (dir: &Path, spec: &DatasetSpec, year: i32) -> Result<Option<NaiveDate>> {
    match scan( dir, spec, year) {
        Ok(entries) => Ok( latest_entry( &entries)),
        Err(OdinFireSyncError::InventoryNotFound(d)) => {
            debug!("no local inventory for {} in {}", spec.id, d);
            Ok(None)
        }
        Err(e) => Err(e)
    }
}
