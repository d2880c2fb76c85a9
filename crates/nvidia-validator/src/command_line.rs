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
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[clap(
    name = "nvidia-validator",
    about = "Validates NVIDIA GPU driver components on this node"
)]
pub struct Options {
    /// Component to validate, e.g. driver, toolkit, nvidia-fs, gdrcopy, nvidia-peermem
    #[clap(short, long, env = "COMPONENT")]
    pub component: String,

    /// The path to the validator configuration file overrides.
    /// This file will hold data in the `ValidatorConfig` format.
    #[clap(long, env = "VALIDATOR_CONFIG")]
    pub config_path: Option<PathBuf>,

    #[clap(long, help = "Feature status file written by the driver container")]
    pub status_file: Option<PathBuf>,

    #[clap(long, help = "Directory for component ready markers")]
    pub output_dir: Option<PathBuf>,

    #[clap(long, default_value = "info", help = "Log filter, e.g. info or nvidia_validator=debug")]
    pub log_level: String,
}

impl Options {
    pub fn load() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options() {
        let options = Options::try_parse_from([
            "nvidia-validator",
            "--component",
            "nvidia-fs",
            "--status-file",
            "/tmp/.driver-ctr-ready",
        ])
        .unwrap();
        assert_eq!(options.component, "nvidia-fs");
        assert_eq!(
            options.status_file,
            Some(PathBuf::from("/tmp/.driver-ctr-ready"))
        );
        assert_eq!(options.config_path, None);
        assert_eq!(options.log_level, "info");
    }
}
