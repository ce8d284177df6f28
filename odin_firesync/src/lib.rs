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

//! incremental synchronization of date-stamped external fire input datasets (VIIRS NRT/monthly
//! active fire files and GridMET annual time series) into a local cache.
//!
//! The central function is [`SyncOrchestrator::sync_dataset`], which finds the latest locally
//! available data, plans the units to (re-)fetch with [`planner::plan`] and retrieves them through a
//! [`Fetcher`]. [`SyncOrchestrator::check_availability`] reports what is locally present.

use std::fmt;
use chrono::{Datelike, Months, NaiveDate};
use serde::{Serialize,Deserialize};

mod errors;
pub use errors::*;

pub mod config;
pub use config::*;

pub mod codec;
pub use codec::FilenameTemplate;

pub mod inventory;
pub use inventory::InventoryEntry;

pub mod planner;
pub use planner::DateRange;

pub mod fetch;
pub use fetch::{Fetcher, FetchOutcome, HttpFetcher};

pub mod timeaxis;
pub use timeaxis::{TimeAxisReader, default_time_axis_reader};

pub mod availability;
pub use availability::AvailabilityReport;

pub mod orchestrator;
pub use orchestrator::{SyncOrchestrator, SyncResult};

/// the period in which a dataset publishes new files. Dates used for a given cadence are always
/// normalized to the first day of their unit (day, month or year)
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize)]
#[serde(rename_all="lowercase")]
pub enum Cadence {
    Daily,
    Monthly,
    Annual
}

impl Cadence {
    /// first day of the unit that contains `date`
    pub fn unit_start (&self, date: NaiveDate)->NaiveDate {
        match self {
            Cadence::Daily => date,
            Cadence::Monthly => date.with_day(1).unwrap_or(date), // day 1 always exists
            Cadence::Annual => first_day_of_year(date.year()).unwrap_or(date)
        }
    }

    pub fn next_unit (&self, date: NaiveDate)->Option<NaiveDate> {
        let d = self.unit_start(date);
        match self {
            Cadence::Daily => d.succ_opt(),
            Cadence::Monthly => d.checked_add_months( Months::new(1)),
            Cadence::Annual => first_day_of_year( d.year() + 1)
        }
    }

    pub fn prev_unit (&self, date: NaiveDate)->Option<NaiveDate> {
        let d = self.unit_start(date);
        match self {
            Cadence::Daily => d.pred_opt(),
            Cadence::Monthly => d.checked_sub_months( Months::new(1)),
            Cadence::Annual => first_day_of_year( d.year() - 1)
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cadence::Daily => write!(f, "daily"),
            Cadence::Monthly => write!(f, "monthly"),
            Cadence::Annual => write!(f, "annual")
        }
    }
}

#[inline]
pub fn first_day_of_year (year: i32)->Option<NaiveDate> {
    NaiveDate::from_ymd_opt( year, 1, 1)
}
