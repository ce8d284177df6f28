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
#![allow(unused)]

use chrono::NaiveDate;
use odin_firesync::{Cadence, FilenameTemplate, OdinFireSyncError};

// run with "cargo test test_xx -- --nocapture"

fn date (y: i32, m: u32, d: u32)->NaiveDate { NaiveDate::from_ymd_opt(y,m,d).unwrap() }

#[test]
fn test_daily_codec() {
    let t = FilenameTemplate::new("SUOMI_VIIRS_C2_Global_VNP14IMGTDL_NRT_${yyyyDDD}.txt").unwrap();
    assert_eq!( t.cadence(), Cadence::Daily);

    let d = NaiveDate::from_yo_opt(2024, 45).unwrap();
    let fname = t.encode(d);
    assert_eq!( fname, "SUOMI_VIIRS_C2_Global_VNP14IMGTDL_NRT_2024045.txt");
    assert_eq!( t.decode(&fname).unwrap(), d);

    // leap year
    let d = date(2024, 12, 31);
    assert_eq!( t.encode(d), "SUOMI_VIIRS_C2_Global_VNP14IMGTDL_NRT_2024366.txt");
    assert_eq!( t.decode("SUOMI_VIIRS_C2_Global_VNP14IMGTDL_NRT_2024366.txt").unwrap(), d);
}

#[test]
fn test_monthly_codec() {
    let t = FilenameTemplate::new("VNP14IMGML.${yyyyMM}.C1.05.txt").unwrap();
    assert_eq!( t.cadence(), Cadence::Monthly);

    assert_eq!( t.encode( date(2023, 7, 19)), "VNP14IMGML.202307.C1.05.txt");
    assert_eq!( t.decode("VNP14IMGML.202307.C1.05.txt").unwrap(), date(2023, 7, 1));
}

#[test]
fn test_annual_codec() {
    let t: FilenameTemplate = "fm1000_${yyyy}.nc".parse().unwrap();
    assert_eq!( t.cadence(), Cadence::Annual);

    assert_eq!( t.encode( date(2025, 8, 3)), "fm1000_2025.nc");
    assert_eq!( t.decode("fm1000_2025.nc").unwrap(), date(2025, 1, 1));
    assert_eq!( t.year_prefix(2025), "fm1000_2025");
}

#[test]
fn test_invalid_filenames() {
    let t = FilenameTemplate::new("NOAA20_VIIRS_C2_Global_VJ114IMGTDL_NRT_${yyyyDDD}.txt").unwrap();

    let invalid = [
        "NOAA20_VIIRS_C2_Global_VJ114IMGTDL_NRT_2024045.txt.tmp",  // wrong suffix
        "NOAA20_VIIRS_C2_Global_VJ114IMGTDL_NRT_202404.txt",       // field too short
        "NOAA20_VIIRS_C2_Global_VJ114IMGTDL_NRT_20240450.txt",     // field too long
        "NOAA20_VIIRS_C2_Global_VJ114IMGTDL_NRT_2024x45.txt",      // not numeric
        "NOAA20_VIIRS_C2_Global_VJ114IMGTDL_NRT_2023366.txt",      // no day 366 in 2023
        "NOAA20_VIIRS_C2_Global_VJ114IMGTDL_NRT_2024000.txt",      // no day 0
        "SUOMI_VIIRS_C2_Global_VNP14IMGTDL_NRT_2024045.txt",       // other dataset
        "",
    ];

    for fname in invalid {
        match t.decode(fname) {
            Err(OdinFireSyncError::ParseError(msg)) => println!("rejected: {msg}"),
            other => panic!("{fname:?} should not decode: {other:?}")
        }
    }

    let t = FilenameTemplate::new("VNP14IMGML.${yyyyMM}.C1.05.txt").unwrap();
    assert!( t.decode("VNP14IMGML.202313.C1.05.txt").is_err());
    assert!( t.decode("VNP14IMGML.202300.C1.05.txt").is_err());
    assert!( t.decode("VNP14IMGML.202301.C1.04.txt").is_err());
}

#[test]
fn test_invalid_patterns() {
    assert!( FilenameTemplate::new("fm1000.nc").is_err());                // no placeholder
    assert!( FilenameTemplate::new("fm1000_${yyyy.nc").is_err());         // unterminated
    assert!( FilenameTemplate::new("fm1000_${yy}.nc").is_err());          // unknown field
    assert!( FilenameTemplate::new("${yyyy}_${yyyyMM}.nc").is_err());     // more than one field
}

#[test]
fn test_template_serde() {
    let t: FilenameTemplate = ron::from_str(r#""fm1000_${yyyy}.nc""#).unwrap();
    assert_eq!( t.pattern(), "fm1000_${yyyy}.nc");
    assert_eq!( ron::to_string(&t).unwrap(), r#""fm1000_${yyyy}.nc""#);

    assert!( ron::from_str::<FilenameTemplate>(r#""fm1000.nc""#).is_err());
}

#[test]
fn test_round_trip_all_units() {
    let daily = FilenameTemplate::new("SUOMI_VIIRS_C2_Global_VNP14IMGTDL_NRT_${yyyyDDD}.txt").unwrap();
    let monthly = FilenameTemplate::new("VJ114IMGML.${yyyyMM}.C1.05.txt").unwrap();
    let annual = FilenameTemplate::new("fm1000_${yyyy}.nc").unwrap();

    let mut n_days = 0;
    let mut d = date(2023, 1, 1);
    while d <= date(2024, 12, 31) {
        assert_eq!( daily.decode( &daily.encode(d)).unwrap(), d);
        assert_eq!( monthly.decode( &monthly.encode(d)).unwrap(), Cadence::Monthly.unit_start(d));
        assert_eq!( annual.decode( &annual.encode(d)).unwrap(), Cadence::Annual.unit_start(d));
        n_days += 1;
        d = d.succ_opt().unwrap();
    }
    assert_eq!( n_days, 365 + 366);

    // every month
    let mut m = date(2023, 1, 1);
    let mut n_months = 0;
    while m <= date(2024, 12, 1) {
        let fname = monthly.encode(m);
        assert_eq!( monthly.decode( &fname).unwrap(), m);
        n_months += 1;
        m = Cadence::Monthly.next_unit(m).unwrap();
    }
    assert_eq!( n_months, 24);
}
