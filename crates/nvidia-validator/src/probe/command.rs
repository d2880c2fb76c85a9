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

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use super::{FeatureProbe, ProbeError};

/// Runs an operator supplied command and treats a zero exit status as a pass.
#[derive(Debug, Clone)]
pub struct CommandProbe {
    argv: Vec<String>,
    timeout: Duration,
}

impl CommandProbe {
    pub fn new(argv: Vec<String>, timeout: Duration) -> Self {
        Self { argv, timeout }
    }

    fn pretty_cmd(&self) -> String {
        self.argv.join(" ")
    }
}

#[async_trait]
impl FeatureProbe for CommandProbe {
    async fn probe(&self, cancel: &CancellationToken) -> Result<(), ProbeError> {
        let Some((program, args)) = self.argv.split_first() else {
            return Err(ProbeError::Failed("no probe command configured".to_string()));
        };

        tracing::debug!(command = %self.pretty_cmd(), "running feature probe");
        let child = TokioCommand::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // dropping the future on cancel or timeout must not leave the probe running
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ProbeError::Spawn(self.pretty_cmd(), e.to_string()))?;

        let output = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ProbeError::Cancelled),
            result = timeout(self.timeout, child.wait_with_output()) => result
                .map_err(|_| {
                    ProbeError::Timeout(
                        self.pretty_cmd(),
                        humantime::format_duration(self.timeout).to_string(),
                    )
                })?
                .map_err(|e| ProbeError::Spawn(self.pretty_cmd(), e.to_string()))?,
        };

        if output.status.success() {
            return Ok(());
        }

        let details = if output.stderr.is_empty() {
            String::from_utf8_lossy(&output.stdout).trim().to_string()
        } else {
            String::from_utf8_lossy(&output.stderr).trim().to_string()
        };
        Err(ProbeError::ExitStatus(
            self.pretty_cmd(),
            output.status.code().unwrap_or(-1),
            details,
        ))
    }
}
