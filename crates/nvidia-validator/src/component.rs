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

use std::str::FromStr;

use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

pub const NVIDIA_FS: &str = "nvidia-fs";
pub const GDRCOPY: &str = "gdrcopy";
pub const NVIDIA_PEERMEM: &str = "nvidia-peermem";

/// The target of a single validation run.
///
/// The set is closed: adding a component means adding a variant here, and the
/// string form of each variant is what the `--component` flag accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString)]
pub enum Component {
    #[strum(serialize = "driver")]
    Driver,
    #[strum(serialize = "cuda")]
    Cuda,
    #[strum(serialize = "plugin")]
    Plugin,
    #[strum(serialize = "toolkit")]
    Toolkit,
    #[strum(serialize = "nvidia-fs")]
    NvidiaFs,
    #[strum(serialize = "gdrcopy")]
    Gdrcopy,
    #[strum(serialize = "nvidia-peermem")]
    NvidiaPeermem,
    #[strum(serialize = "mofed")]
    Mofed,
    #[strum(serialize = "vgpu-manager")]
    VgpuManager,
    #[strum(serialize = "vgpu-devices")]
    VgpuDevices,
    #[strum(serialize = "cc-manager")]
    CcManager,
}

impl Component {
    /// Components whose validation is driven by the driver container's feature status file.
    pub fn is_additional_feature(&self) -> bool {
        matches!(
            self,
            Component::NvidiaFs | Component::Gdrcopy | Component::NvidiaPeermem
        )
    }
}

pub fn is_valid_component(name: &str) -> bool {
    Component::from_str(name).is_ok()
}
