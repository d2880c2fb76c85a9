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

use std::io::ErrorKind;
use std::str::FromStr;

pub use additional::validate_additional_driver_components;
pub use command_line::Options;
pub use component::{Component, GDRCOPY, NVIDIA_FS, NVIDIA_PEERMEM, is_valid_component};
pub use config::ValidatorConfig;
pub use errors::{FeatureFailure, ValidatorError, ValidatorResult};
use eyre::WrapErr;
pub use feature_status::{AdditionalFeature, DRIVER_CONTAINER_STATUS_FILE, FeatureStatusRecord};
pub use metadata::apply_daemonset_metadata_to_pod;
pub use pod::{build_validator_pod, load_pod_template};
pub use probe::{CommandProbe, FeatureProbe, FeatureProbes, ProbeError};
use strum::IntoEnumIterator;
use tokio::signal::unix::{SignalKind, signal};
use tokio_util::sync::CancellationToken;

mod additional;
mod command_line;
pub mod component;
pub mod config;
mod errors;
pub mod feature_status;
pub mod metadata;
pub mod pod;
pub mod probe;

pub async fn start(cmdline: Options) -> eyre::Result<()> {
    let mut config = match &cmdline.config_path {
        None => ValidatorConfig::default(),
        Some(path) => ValidatorConfig::load_from(path)?,
    };
    if let Some(status_file) = cmdline.status_file {
        config.status_file = status_file;
    }
    if let Some(output_dir) = cmdline.output_dir {
        config.output_dir = output_dir;
    }
    tracing::info!("Using configuration: {config:?}");

    if !is_valid_component(&cmdline.component) {
        let valid: Vec<String> = Component::iter().map(|c| c.to_string()).collect();
        tracing::error!(
            component = %cmdline.component,
            valid = %valid.join(", "),
            "Invalid component"
        );
        return Err(ValidatorError::InvalidComponent(cmdline.component).into());
    }
    let component = Component::from_str(&cmdline.component)?;

    let cancel = CancellationToken::new();
    let mut term_signal = signal(SignalKind::terminate())?;
    let mut int_signal = signal(SignalKind::interrupt())?;
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = term_signal.recv() => tracing::info!("TERM signal received, cancelling validation"),
            _ = int_signal.recv() => tracing::info!("INT signal received, cancelling validation"),
        }
        on_signal.cancel();
    });

    run_component(component, &config, &cancel)
        .await
        .wrap_err(format!("{component} validation failed"))?;
    tracing::info!(%component, "Validation successful");
    Ok(())
}

/// Validates one component and records its ready marker on success.
pub async fn run_component(
    component: Component,
    config: &ValidatorConfig,
    cancel: &CancellationToken,
) -> ValidatorResult<()> {
    if !component.is_additional_feature() {
        return Err(ValidatorError::UnsupportedComponent(component));
    }

    let ready_file = config.ready_file(component);
    remove_ready_file(&ready_file).await?;

    let probes = config.feature_probes();
    validate_additional_driver_components(cancel, &config.status_file, &probes).await?;

    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .map_err(|source| ValidatorError::Io {
            context: format!("Failed to create {}", config.output_dir.display()),
            source,
        })?;
    tokio::fs::write(&ready_file, b"")
        .await
        .map_err(|source| ValidatorError::Io {
            context: format!("Failed to write {}", ready_file.display()),
            source,
        })?;
    Ok(())
}

async fn remove_ready_file(path: &std::path::Path) -> ValidatorResult<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "Removed stale ready marker");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(ValidatorError::Io {
            context: format!("Failed to remove {}", path.display()),
            source,
        }),
    }
}
