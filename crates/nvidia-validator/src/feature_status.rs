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

use std::path::Path;

use serde_yaml::{Mapping, Value};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::component::Component;
use crate::errors::{ValidatorError, ValidatorResult};

/// Written by the driver container once the driver and its optional features are installed.
pub const DRIVER_CONTAINER_STATUS_FILE: &str = "/run/nvidia/validations/.driver-ctr-ready";

pub const GDRCOPY_ENABLED: &str = "GDRCOPY_ENABLED";
pub const GDS_ENABLED: &str = "GDS_ENABLED";
pub const GPU_DIRECT_RDMA_ENABLED: &str = "GPU_DIRECT_RDMA_ENABLED";

/// Optional driver features that are only validated when the driver container enabled them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum AdditionalFeature {
    #[strum(serialize = "GDRCOPY")]
    Gdrcopy,
    #[strum(serialize = "GDS")]
    Gds,
    #[strum(serialize = "GPU_DIRECT_RDMA")]
    GpuDirectRdma,
}

impl AdditionalFeature {
    pub fn status_key(&self) -> &'static str {
        match self {
            AdditionalFeature::Gdrcopy => GDRCOPY_ENABLED,
            AdditionalFeature::Gds => GDS_ENABLED,
            AdditionalFeature::GpuDirectRdma => GPU_DIRECT_RDMA_ENABLED,
        }
    }

    pub fn component(&self) -> Component {
        match self {
            AdditionalFeature::Gdrcopy => Component::Gdrcopy,
            AdditionalFeature::Gds => Component::NvidiaFs,
            AdditionalFeature::GpuDirectRdma => Component::NvidiaPeermem,
        }
    }
}

/// Flat `KEY: value` record from the driver container status file.
///
/// Every entry is kept, recognised or not and whatever its key type. Only the
/// three feature flags are interpreted; anything else is left for newer consumers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureStatusRecord {
    entries: Mapping,
}

impl FeatureStatusRecord {
    /// Parses the status file contents. `path` is only used for error context.
    pub fn parse(path: &Path, contents: &str) -> ValidatorResult<Self> {
        let invalid = |reason: String| ValidatorError::StatusInvalid {
            path: path.to_path_buf(),
            reason,
        };

        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        let document: Value = serde_yaml::from_str(contents).map_err(|e| invalid(e.to_string()))?;
        let mapping = match document {
            // comment-only or explicit `~`
            Value::Null => return Ok(Self::default()),
            Value::Mapping(mapping) => mapping,
            other => {
                return Err(invalid(format!(
                    "expected a mapping of feature flags, found {}",
                    value_kind(&other)
                )));
            }
        };

        let record = Self { entries: mapping };
        for feature in AdditionalFeature::iter() {
            match record.entries.get(feature.status_key()) {
                None | Some(Value::Bool(_)) => {}
                Some(other) => {
                    return Err(invalid(format!(
                        "{} must be a boolean, found {}",
                        feature.status_key(),
                        value_kind(other)
                    )));
                }
            }
        }
        Ok(record)
    }

    /// Reads and parses the status file at `path`.
    pub async fn load(path: &Path) -> ValidatorResult<Self> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|source| ValidatorError::StatusUnavailable {
                path: path.to_path_buf(),
                source,
            })?;
        let contents = String::from_utf8(data).map_err(|e| ValidatorError::StatusInvalid {
            path: path.to_path_buf(),
            reason: format!("not valid UTF-8: {e}"),
        })?;
        let record = Self::parse(path, &contents)?;
        tracing::debug!(
            path = %path.display(),
            entries = record.len(),
            enabled = ?record.enabled_features(),
            "Loaded feature status"
        );
        Ok(record)
    }

    pub fn is_enabled(&self, feature: AdditionalFeature) -> bool {
        matches!(self.entries.get(feature.status_key()), Some(Value::Bool(true)))
    }

    /// Enabled features, in a fixed order.
    pub fn enabled_features(&self) -> Vec<AdditionalFeature> {
        AdditionalFeature::iter()
            .filter(|feature| self.is_enabled(*feature))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
