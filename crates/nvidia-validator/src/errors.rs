/*
 * SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: LicenseRef-NvidiaProprietary
 *
 * NVIDIA CORPORATION, its affiliates and licensors retain all intellectual
 * property and proprietary rights in and to this material, related
 * documentation and any modifications thereto. Any use, reproduction,
 * disclosure or distribution of this material and related documentation
 * without an express license agreement from NVIDIA CORPORATION or
 * its affiliates is strictly prohibited.
 */

use std::fmt;
use std::path::PathBuf;

use crate::component::Component;
use crate::feature_status::AdditionalFeature;
use crate::probe::ProbeError;

#[derive(thiserror::Error, Debug)]
pub enum ValidatorError {
    #[error("Feature status unavailable at {path}: {source}")]
    StatusUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Feature status file {path} is invalid: {reason}")]
    StatusInvalid { path: PathBuf, reason: String },
    #[error("Additional driver component validation failed: {}", FailureList(.0))]
    FeatureValidation(Vec<FeatureFailure>),
    #[error("Validation cancelled")]
    Cancelled,
    #[error("Invalid component '{0}'")]
    InvalidComponent(String),
    #[error("Component '{0}' is not validated by this binary")]
    UnsupportedComponent(Component),
    #[error("Unable to read config {path}: {reason}")]
    ConfigRead { path: PathBuf, reason: String },
    #[error("Unable to load pod template {path}: {reason}")]
    PodTemplate { path: PathBuf, reason: String },
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ValidatorError {
    /// True for failures to read or parse the feature status record, as opposed
    /// to a feature probe that ran and failed.
    pub fn is_status_error(&self) -> bool {
        matches!(
            self,
            ValidatorError::StatusUnavailable { .. } | ValidatorError::StatusInvalid { .. }
        )
    }

    /// Features whose probe failed, empty for every other error kind.
    pub fn failed_features(&self) -> Vec<AdditionalFeature> {
        match self {
            ValidatorError::FeatureValidation(failures) => {
                failures.iter().map(|f| f.feature).collect()
            }
            _ => Vec::new(),
        }
    }
}

/// One enabled feature whose probe did not pass.
#[derive(Debug)]
pub struct FeatureFailure {
    pub feature: AdditionalFeature,
    pub error: ProbeError,
}

impl fmt::Display for FeatureFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.feature, self.feature.component(), self.error)
    }
}

struct FailureList<'a>(&'a [FeatureFailure]);

impl fmt::Display for FailureList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}

pub type ValidatorResult<T> = Result<T, ValidatorError>;
