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
use odin_firesync::{Cadence, DateRange, planner::{plan, refetch_start}};

fn doy (year: i32, ordinal: u32)->NaiveDate { NaiveDate::from_yo_opt(year, ordinal).unwrap() }
fn date (y: i32, m: u32, d: u32)->NaiveDate { NaiveDate::from_ymd_opt(y,m,d).unwrap() }

#[test]
fn test_no_local_data() {
    let range = plan( None, doy(2024,45), Cadence::Daily);
    println!("{range}");

    assert_eq!( range.start, date(2024,1,1));
    assert_eq!( range.end, doy(2024,45));
    assert_eq!( range.len(), 45);
}

#[test]
fn test_refetch_from_latest() {
    let range = plan( Some(doy(2023,300)), doy(2023,310), Cadence::Daily);
    println!("{range}");

    let dates: Vec<NaiveDate> = range.iter().collect();
    assert_eq!( dates.len(), 12);
    assert_eq!( dates.first(), Some(&doy(2023,299)));
    assert_eq!( dates.last(), Some(&doy(2023,310)));
    assert!( dates.windows(2).all( |w| w[0] < w[1]));

    assert!( range.contains( doy(2023,300)));
    assert!( !range.contains( doy(2023,298)));
}

#[test]
fn test_up_to_date() {
    let today = doy(2023,310);
    assert!( plan( Some(today), today, Cadence::Daily).is_empty());
    assert!( plan( Some(doy(2023,311)), today, Cadence::Daily).is_empty()); // clock skew
    assert_eq!( plan( Some(today), today, Cadence::Daily).len(), 0);

    // a monthly file is current for the whole month
    assert!( plan( Some(date(2024,6,1)), date(2024,6,20), Cadence::Monthly).is_empty());
}

#[test]
fn test_monthly_plan() {
    let range = plan( Some(date(2024,3,1)), date(2024,6,15), Cadence::Monthly);
    let dates: Vec<NaiveDate> = range.iter().collect();
    assert_eq!( dates, vec![date(2024,2,1), date(2024,3,1), date(2024,4,1), date(2024,5,1), date(2024,6,1)]);

    let range = plan( None, date(2024,3,10), Cadence::Monthly);
    assert_eq!( range.len(), 3);
}

#[test]
fn test_year_boundary() {
    assert_eq!( refetch_start( date(2024,1,1), Cadence::Daily), date(2023,12,31));
    assert_eq!( refetch_start( date(2024,1,1), Cadence::Monthly), date(2023,12,1));

    let range = plan( Some(date(2023,12,31)), date(2024,1,2), Cadence::Daily);
    let dates: Vec<NaiveDate> = range.iter().collect();
    assert_eq!( dates, vec![date(2023,12,30), date(2023,12,31), date(2024,1,1), date(2024,1,2)]);

    let range = DateRange::new( date(2023,11,5), date(2024,2,29), Cadence::Monthly);
    assert_eq!( range.len(), 4);
}

#[test]
fn test_empty_range() {
    let range = DateRange::empty( date(2024,5,5), Cadence::Daily);
    assert!( range.is_empty());
    assert_eq!( range.iter().next(), None);
    assert!( !range.contains( date(2024,5,5)));

    let single = DateRange::single( date(2024,5,5), Cadence::Annual);
    assert_eq!( single.iter().collect::<Vec<_>>(), vec![date(2024,1,1)]);
}
