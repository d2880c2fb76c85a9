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

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::feature_status::AdditionalFeature;

mod command;

pub use command::CommandProbe;

#[derive(thiserror::Error, Debug)]
pub enum ProbeError {
    #[error("{0}")]
    Failed(String),
    #[error("Error running '{0}': {1}")]
    Spawn(String, String),
    #[error("'{0}' exited with code {1}: {2}")]
    ExitStatus(String, i32, String),
    #[error("'{0}' timed out after {1}")]
    Timeout(String, String),
    #[error("Probe cancelled")]
    Cancelled,
}

/// Checks that one additional driver feature is actually working on this host.
///
/// Implementations should return promptly once `cancel` fires.
#[async_trait]
pub trait FeatureProbe: Send + Sync {
    async fn probe(&self, cancel: &CancellationToken) -> Result<(), ProbeError>;
}

/// One probe per additional feature, supplied by the caller.
pub struct FeatureProbes {
    pub gdrcopy: Box<dyn FeatureProbe>,
    pub gds: Box<dyn FeatureProbe>,
    pub gpu_direct_rdma: Box<dyn FeatureProbe>,
}

impl FeatureProbes {
    pub fn for_feature(&self, feature: AdditionalFeature) -> &dyn FeatureProbe {
        match feature {
            AdditionalFeature::Gdrcopy => self.gdrcopy.as_ref(),
            AdditionalFeature::Gds => self.gds.as_ref(),
            AdditionalFeature::GpuDirectRdma => self.gpu_direct_rdma.as_ref(),
        }
    }
}
