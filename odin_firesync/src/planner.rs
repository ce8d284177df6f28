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

//! computing the units a dataset has to (re-)fetch.
//!
//! The planning model for a dataset with cadence unit `u` is:
//! ```diagram
//!     L    : latest locally available unit (if any)
//!     T    : today's unit
//!     ◼︎    : unit to fetch
//!     ◻︎    : local unit that is not re-fetched
//!
//!     Jan 1                          L-1  L                  T
//!     │◻︎◻︎◻︎◻︎◻︎◻︎◻︎◻︎◻︎◻︎◻︎◻︎◻︎◻︎◻︎◻︎◻︎◻︎◻︎◻︎◻︎◻︎◻︎◻︎◻︎◻︎◻︎◻︎◻︎◻︎◻︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎     with L
//!     │◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎◼︎     without L
//! ```
//! Providers keep appending records to the file of a unit after it was first published, i.e. the
//! latest local file might be incomplete. We therefore always start one unit before `L`

use std::fmt;
use chrono::{Datelike, NaiveDate};

use crate::{Cadence, first_day_of_year};

/// inclusive, ordered range of cadence units to fetch
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub cadence: Cadence,
}

impl DateRange {
    /// both dates are normalized to their unit start. The range is empty if `start` > `end`
    pub fn new (start: NaiveDate, end: NaiveDate, cadence: Cadence)->Self {
        DateRange { start: cadence.unit_start(start), end: cadence.unit_start(end), cadence }
    }

    pub fn empty (today: NaiveDate, cadence: Cadence)->Self {
        let end = cadence.unit_start(today);
        let start = cadence.next_unit(end).unwrap_or(end);
        DateRange { start, end, cadence }
    }

    pub fn single (date: NaiveDate, cadence: Cadence)->Self {
        DateRange::new( date, date, cadence)
    }

    pub fn is_empty (&self)->bool {
        self.start > self.end
    }

    pub fn iter (&self)->DateRangeIter {
        DateRangeIter { next: if self.is_empty() { None } else { Some(self.start) }, end: self.end, cadence: self.cadence }
    }

    /// number of units in this range
    pub fn len (&self)->usize {
        self.iter().count()
    }

    pub fn contains (&self, date: NaiveDate)->bool {
        let d = self.cadence.unit_start(date);
        !self.is_empty() && d >= self.start && d <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "[] ({})", self.cadence)
        } else {
            write!(f, "[{} .. {}] ({})", self.start, self.end, self.cadence)
        }
    }
}

impl IntoIterator for &DateRange {
    type Item = NaiveDate;
    type IntoIter = DateRangeIter;
    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

pub struct DateRangeIter {
    next: Option<NaiveDate>,
    end: NaiveDate,
    cadence: Cadence,
}

impl Iterator for DateRangeIter {
    type Item = NaiveDate;

    fn next (&mut self)->Option<NaiveDate> {
        let d = self.next?;
        self.next = self.cadence.next_unit(d).filter( |n| *n <= self.end);
        Some(d)
    }
}

/// the first unit to fetch if `latest` is the latest local unit: the unit before it, since the
/// latest file might have been retrieved before the provider finished publishing its records
pub fn refetch_start (latest: NaiveDate, cadence: Cadence)->NaiveDate {
    let latest = cadence.unit_start(latest);
    cadence.prev_unit(latest).unwrap_or(latest)
}

/// the units to fetch given the latest local unit and today:
///  - no local data: from the first unit of today's year up to today
///  - local data: from the unit before `latest` up to today (see [`refetch_start`])
///  - `latest` is today (or later): nothing
pub fn plan (latest: Option<NaiveDate>, today: NaiveDate, cadence: Cadence)->DateRange {
    let end = cadence.unit_start(today);

    match latest {
        Some(latest) => {
            if cadence.unit_start(latest) >= end {
                DateRange::empty( today, cadence)
            } else {
                DateRange::new( refetch_start( latest, cadence), end, cadence)
            }
        }
        None => {
            let start = first_day_of_year( today.year()).unwrap_or(end);
            DateRange::new( start, end, cadence)
        }
    }
}
