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

//! dataset filename <-> date mapping
//!
//! Provider filenames are a stable external contract, hence we decode them by fixed-width slicing
//! of a single date field between a constant prefix and suffix, e.g.
//! ```text
//!   SUOMI_VIIRS_C2_Global_VNP14IMGTDL_NRT_${yyyyDDD}.txt   (daily:   year + day-of-year)
//!   VNP14IMGML.${yyyyMM}.C1.05.txt                         (monthly: year + month)
//!   fm1000_${yyyy}.nc                                      (annual:  year)
//! ```

use std::{fmt, str::FromStr};
use chrono::{Datelike, NaiveDate};
use serde::{Serialize,Deserialize};

use crate::Cadence;
use crate::errors::{Result, OdinFireSyncError, config_error, parse_error};

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
enum DateField {
    YearDoy,    // yyyyDDD
    YearMonth,  // yyyyMM
    Year        // yyyy
}

impl DateField {
    fn from_placeholder (name: &str)->Option<DateField> {
        match name {
            "yyyyDDD" => Some(DateField::YearDoy),
            "yyyyMM" => Some(DateField::YearMonth),
            "yyyy" => Some(DateField::Year),
            _ => None
        }
    }

    fn width (&self)->usize {
        match self {
            DateField::YearDoy => 7,
            DateField::YearMonth => 6,
            DateField::Year => 4
        }
    }

    fn cadence (&self)->Cadence {
        match self {
            DateField::YearDoy => Cadence::Daily,
            DateField::YearMonth => Cadence::Monthly,
            DateField::Year => Cadence::Annual
        }
    }
}

/// the filename pattern of a dataset, consisting of a constant prefix, one fixed-width date field and
/// a constant suffix. This is our FilenameDateCodec - each dataset owns exactly one template
#[derive(Debug,Clone,PartialEq,Eq,Serialize,Deserialize)]
#[serde(try_from="String", into="String")]
pub struct FilenameTemplate {
    pattern: String,
    prefix: String,
    suffix: String,
    field: DateField,
}

impl FilenameTemplate {
    pub fn new (pattern: &str)->Result<Self> {
        let i0 = pattern.find("${").ok_or( config_error( format!("no date placeholder in filename pattern {pattern:?}")))?;
        let len = pattern[i0..].find('}').ok_or( config_error( format!("unterminated placeholder in {pattern:?}")))?;
        let name = &pattern[i0+2..i0+len];
        let field = DateField::from_placeholder(name).ok_or( config_error( format!("unknown date placeholder ${{{name}}} in {pattern:?}")))?;

        let prefix = &pattern[..i0];
        let suffix = &pattern[i0+len+1..];
        if suffix.contains("${") {
            return Err( config_error( format!("more than one placeholder in {pattern:?}")))
        }

        Ok( FilenameTemplate { pattern: pattern.to_string(), prefix: prefix.to_string(), suffix: suffix.to_string(), field } )
    }

    pub fn pattern (&self)->&str { self.pattern.as_str() }

    /// the cadence implied by the date field of this template
    pub fn cadence (&self)->Cadence { self.field.cadence() }

    /// the filename for the cadence unit containing `date`
    pub fn encode (&self, date: NaiveDate)->String {
        let field = match self.field {
            DateField::YearDoy => format!("{:04}{:03}", date.year(), date.ordinal()),
            DateField::YearMonth => format!("{:04}{:02}", date.year(), date.month()),
            DateField::Year => format!("{:04}", date.year())
        };
        format!("{}{}{}", self.prefix, field, self.suffix)
    }

    /// get the (unit start) date of a filename. Names that do not exactly match the template length,
    /// prefix, suffix and numeric date field are rejected
    pub fn decode (&self, filename: &str)->Result<NaiveDate> {
        let w = self.field.width();
        let i0 = self.prefix.len();

        if filename.len() != i0 + w + self.suffix.len() || !filename.starts_with(&self.prefix) || !filename.ends_with(&self.suffix) {
            return Err( parse_error( format!("{filename:?} does not match {:?}", self.pattern)))
        }

        let field = filename.get(i0..i0+w).ok_or( parse_error( format!("invalid date field in {filename:?}")))?;
        if !field.bytes().all(|b| b.is_ascii_digit()) {
            return Err( parse_error( format!("non-numeric date field in {filename:?}")))
        }

        let year: i32 = parse_digits( &field[0..4], filename)?;
        let date = match self.field {
            DateField::YearDoy => NaiveDate::from_yo_opt( year, parse_digits( &field[4..7], filename)?),
            DateField::YearMonth => NaiveDate::from_ymd_opt( year, parse_digits( &field[4..6], filename)?, 1),
            DateField::Year => NaiveDate::from_ymd_opt( year, 1, 1)
        };

        date.ok_or( parse_error( format!("date field out of range in {filename:?}")))
    }

    /// the filename prefix shared by all files of a given year
    pub fn year_prefix (&self, year: i32)->String {
        format!("{}{:04}", self.prefix, year)
    }
}

fn parse_digits<T: FromStr> (s: &str, filename: &str)->Result<T> {
    s.parse::<T>().map_err(|_| parse_error( format!("invalid date field in {filename:?}")))
}

impl FromStr for FilenameTemplate {
    type Err = OdinFireSyncError;
    fn from_str (s: &str)->Result<Self> { FilenameTemplate::new(s) }
}

impl TryFrom<String> for FilenameTemplate {
    type Error = OdinFireSyncError;
    fn try_from (s: String)->Result<Self> { FilenameTemplate::new(&s) }
}

impl From<FilenameTemplate> for String {
    fn from (t: FilenameTemplate)->String { t.pattern }
}

impl fmt::Display for FilenameTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pattern)
    }
}
