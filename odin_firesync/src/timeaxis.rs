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

//! access to the time axis of gridded time series files (one growing file per year)

use std::{path::Path, sync::Arc};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::errors::{Result, format_open_error};

/// something that can tell us the last time value stored in a gridded dataset file
pub trait TimeAxisReader: Send + Sync {
    fn last_time (&self, path: &Path, var_name: &str) -> Result<NaiveDateTime>;
}

/// the reader to use for gridded datasets. Without the `netcdf` feature this is a reader that fails
/// for every file, which reports the dataset as not available
pub fn default_time_axis_reader ()->Arc<dyn TimeAxisReader> {
    #[cfg(feature="netcdf")]
    { Arc::new( NetcdfTimeAxisReader{}) }

    #[cfg(not(feature="netcdf"))]
    { Arc::new( UnsupportedTimeAxisReader{}) }
}

#[derive(Debug,Clone,Copy)]
pub struct UnsupportedTimeAxisReader {}

impl TimeAxisReader for UnsupportedTimeAxisReader {
    fn last_time (&self, path: &Path, _var_name: &str) -> Result<NaiveDateTime> {
        Err( format_open_error( format!("{path:?} (no NetCDF support, enable the 'netcdf' feature)")))
    }
}

#[cfg(feature="netcdf")]
#[derive(Debug,Clone,Copy)]
pub struct NetcdfTimeAxisReader {}

#[cfg(feature="netcdf")]
impl TimeAxisReader for NetcdfTimeAxisReader {
    fn last_time (&self, path: &Path, var_name: &str) -> Result<NaiveDateTime> {
        let file = netcdf::open(path).map_err( |e| format_open_error( format!("{path:?}: {e}")))?;
        let var = file.variable(var_name).ok_or( format_open_error( format!("{path:?}: no variable {var_name}")))?;

        let n = var.len();
        if n == 0 {
            return Err( format_open_error( format!("{path:?}: empty time axis {var_name}")))
        }
        let value: f64 = var.get_value::<f64,_>( [n-1]).map_err( |e| format_open_error( format!("{path:?}: {e}")))?;

        let units = match var.attribute("units").map( |a| a.value()) {
            Some(Ok(netcdf::AttributeValue::Str(s))) => s,
            _ => return Err( format_open_error( format!("{path:?}: no units for {var_name}")))
        };

        decode_cf_time( value, &units)
    }
}

/// convert a CF convention time value ("<unit> since <reference>") into a date time, e.g.
/// 45000 with units "days since 1900-01-01 00:00:00"
pub fn decode_cf_time (value: f64, units: &str) -> Result<NaiveDateTime> {
    let (unit, reference) = units.split_once(" since ").ok_or( format_open_error( format!("invalid time units {units:?}")))?;

    let unit_secs: f64 = match unit.trim().to_lowercase().as_str() {
        "days" | "day" | "d" => 86400.0,
        "hours" | "hour" | "hr" | "h" => 3600.0,
        "minutes" | "minute" | "min" => 60.0,
        "seconds" | "second" | "sec" | "s" => 1.0,
        other => return Err( format_open_error( format!("unsupported time unit {other:?}")))
    };

    if !value.is_finite() {
        return Err( format_open_error( format!("invalid time value {value}")))
    }

    let base = parse_cf_reference( reference.trim()).ok_or( format_open_error( format!("invalid time reference {reference:?}")))?;
    let offset = TimeDelta::try_milliseconds( (value * unit_secs * 1000.0).round() as i64)
        .ok_or( format_open_error( format!("time value out of range {value}")))?;

    base.checked_add_signed(offset).ok_or( format_open_error( format!("time value out of range {value}")))
}

fn parse_cf_reference (s: &str)->Option<NaiveDateTime> {
    let s = s.trim_end_matches('Z').trim_end_matches(" UTC");
    let mut parts = s.splitn(2, |c: char| c == ' ' || c == 'T');

    let date = NaiveDate::parse_from_str( parts.next()?, "%Y-%m-%d").ok()?;
    let time = match parts.next().map( |t| t.trim()) {
        Some(t) if !t.is_empty() => {
            NaiveTime::parse_from_str( t, "%H:%M:%S%.f")
                .or_else( |_| NaiveTime::parse_from_str( t, "%H:%M"))
                .ok()?
        }
        _ => NaiveTime::MIN
    };

    Some( date.and_time(time))
}
