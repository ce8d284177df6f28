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

use thiserror::Error;
use reqwest;

pub type Result<T> = std::result::Result<T, OdinFireSyncError>;

#[derive(Error,Debug)]
pub enum OdinFireSyncError {
    #[error("IO error {0}")]
    IOError( #[from] std::io::Error),

    #[error("config error {0}")]
    ConfigError(String),

    #[error("config parse error {0}")]
    ConfigParseError( #[from] ron::error::SpannedError),

    #[error("unknown dataset {0}")]
    UnknownDataset(String),

    /// filename does not match the dataset template
    #[error("filename parse error {0}")]
    ParseError(String),

    /// dataset directory does not exist (a normal "not found" outcome for callers)
    #[error("no local inventory at {0}")]
    InventoryNotFound(String),

    #[error("http error {0}")]
    HttpError( #[from] reqwest::Error),

    #[error("request for {url} failed with status {status}")]
    HttpStatusError { url: String, status: u16 },

    #[error("remote file not found {0}")]
    RemoteNotFound(String),

    #[error("request timed out {0}")]
    FetchTimeout(String),

    /// gridded time-series file cannot be opened or has no usable time axis
    #[error("cannot open {0}")]
    FormatOpenError(String),

    #[error("operation failed {0}")]
    OpFailed(String)
}

impl OdinFireSyncError {
    /// is this a transient fetch failure that might succeed if we try again later
    pub fn is_retryable (&self)->bool {
        match self {
            OdinFireSyncError::FetchTimeout(_) => true,
            OdinFireSyncError::HttpStatusError{status,..} => *status == 429 || *status >= 500,
            OdinFireSyncError::HttpError(e) => e.is_timeout() || e.is_connect() || e.is_request() || e.is_body(),
            _ => false
        }
    }
}

pub fn op_failed (msg: impl ToString)->OdinFireSyncError {
    OdinFireSyncError::OpFailed(msg.to_string())
}

pub fn config_error (msg: impl ToString)->OdinFireSyncError {
    OdinFireSyncError::ConfigError(msg.to_string())
}

pub fn parse_error (msg: impl ToString)->OdinFireSyncError {
    OdinFireSyncError::ParseError(msg.to_string())
}

pub fn format_open_error (msg: impl ToString)->OdinFireSyncError {
    OdinFireSyncError::FormatOpenError(msg.to_string())
}
