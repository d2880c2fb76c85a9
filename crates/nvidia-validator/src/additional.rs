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
use std::time::Instant;

use humantime::format_duration as dt;
use tokio_util::sync::CancellationToken;

use crate::errors::{FeatureFailure, ValidatorError, ValidatorResult};
use crate::feature_status::FeatureStatusRecord;
use crate::probe::{FeatureProbes, ProbeError};

/// Validates every additional driver feature that the driver container enabled.
///
/// Probes run one at a time in a fixed order. All enabled probes run even when an
/// earlier one fails so that a single pass reports every broken feature. A missing
/// or malformed status file fails before any probe runs.
pub async fn validate_additional_driver_components(
    cancel: &CancellationToken,
    status_file: &Path,
    probes: &FeatureProbes,
) -> ValidatorResult<()> {
    let record = FeatureStatusRecord::load(status_file).await?;
    let enabled = record.enabled_features();
    if enabled.is_empty() {
        tracing::info!(
            status_file = %status_file.display(),
            "No additional driver components enabled"
        );
        return Ok(());
    }

    let mut failures = Vec::new();
    for feature in enabled {
        if cancel.is_cancelled() {
            return Err(ValidatorError::Cancelled);
        }

        let started = Instant::now();
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ProbeError::Cancelled),
            result = probes.for_feature(feature).probe(cancel) => result,
        };

        match result {
            Ok(()) => {
                tracing::info!(
                    %feature,
                    component = %feature.component(),
                    elapsed = %dt(started.elapsed()),
                    "Additional driver component validated"
                );
            }
            Err(ProbeError::Cancelled) => return Err(ValidatorError::Cancelled),
            Err(error) => {
                tracing::error!(
                    %feature,
                    component = %feature.component(),
                    error = %error,
                    "Additional driver component validation failed"
                );
                failures.push(FeatureFailure { feature, error });
            }
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(ValidatorError::FeatureValidation(failures))
    }
}
