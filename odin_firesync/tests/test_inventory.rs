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

use std::{fs, path::Path};
use chrono::NaiveDate;
use tempfile::TempDir;
use odin_firesync::{Cadence, DatasetSpec, OdinFireSyncError, inventory};

fn viirs_spec ()->DatasetSpec {
    DatasetSpec::new( "VNP14IMGTDL", Cadence::Daily, "SUOMI_VIIRS_C2_Global_VNP14IMGTDL_NRT_${yyyyDDD}.txt", None, "VIIRS/VNP14IMGTDL").unwrap()
}

fn touch (dir: &Path, fname: &str) {
    fs::write( dir.join(fname), "latitude,longitude\n").unwrap();
}

fn doy (year: i32, ordinal: u32)->NaiveDate { NaiveDate::from_yo_opt(year, ordinal).unwrap() }

#[test]
fn test_latest() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let spec = viirs_spec();

    touch( dir, "SUOMI_VIIRS_C2_Global_VNP14IMGTDL_NRT_2023100.txt");
    touch( dir, "SUOMI_VIIRS_C2_Global_VNP14IMGTDL_NRT_2023105.txt");
    touch( dir, "SUOMI_VIIRS_C2_Global_VNP14IMGTDL_NRT_2023103.txt");

    // noise that has to be ignored
    touch( dir, "SUOMI_VIIRS_C2_Global_VNP14IMGTDL_NRT_2023200.txt.part");
    touch( dir, "NOAA20_VIIRS_C2_Global_VJ114IMGTDL_NRT_2023250.txt");
    touch( dir, "README.md");
    touch( dir, "SUOMI_VIIRS_C2_Global_VNP14IMGTDL_NRT_2022360.txt"); // other year
    fs::create_dir( dir.join("SUOMI_VIIRS_C2_Global_VNP14IMGTDL_NRT_2023300.txt")).unwrap(); // not a file

    let entries = inventory::scan( dir, &spec, 2023).unwrap();
    let dates: Vec<NaiveDate> = entries.iter().map(|e| e.date).collect();
    assert_eq!( dates, vec![doy(2023,100), doy(2023,103), doy(2023,105)]);

    assert_eq!( inventory::latest( dir, &spec, 2023).unwrap(), Some(doy(2023,105)));
    assert_eq!( inventory::latest( dir, &spec, 2022).unwrap(), Some(doy(2022,360)));
    assert_eq!( inventory::latest( dir, &spec, 2024).unwrap(), None);
}

#[test]
fn test_empty_and_missing_dir() {
    let tmp = TempDir::new().unwrap();
    let spec = viirs_spec();

    assert_eq!( inventory::latest( tmp.path(), &spec, 2023).unwrap(), None);

    let missing = tmp.path().join("does_not_exist");
    assert!( matches!( inventory::scan( &missing, &spec, 2023), Err(OdinFireSyncError::InventoryNotFound(_))));
    assert_eq!( inventory::latest( &missing, &spec, 2023).unwrap(), None);
}

#[test]
fn test_monthly_inventory() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let spec = DatasetSpec::new( "VNP14IMGML", Cadence::Monthly, "VNP14IMGML.${yyyyMM}.C1.05.txt", None, "VIIRS/VNP14IMGML").unwrap();

    touch( dir, "VNP14IMGML.202301.C1.05.txt");
    touch( dir, "VNP14IMGML.202302.C1.05.txt");
    touch( dir, "VNP14IMGML.202311.C1.04.txt"); // wrong version

    assert_eq!( inventory::latest( dir, &spec, 2023).unwrap(), NaiveDate::from_ymd_opt(2023, 2, 1));
}
