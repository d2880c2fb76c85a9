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

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::component::Component;
use crate::errors::{ValidatorError, ValidatorResult};
use crate::feature_status::DRIVER_CONTAINER_STATUS_FILE;
use crate::probe::{CommandProbe, FeatureProbes};

/// Where ready markers for validated components are written.
const DEFAULT_OUTPUT_DIR: &str = "/run/nvidia/validations";
const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// Describes the optional configuration file of the validator.
///
/// Every field defaults, so an absent file and an empty file behave the same.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ValidatorConfig {
    #[serde(default = "default_status_file")]
    pub status_file: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_probe_timeout", with = "humantime_serde")]
    pub probe_timeout: Duration,
    #[serde(default)]
    pub probes: ProbeCommands,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            status_file: default_status_file(),
            output_dir: default_output_dir(),
            probe_timeout: default_probe_timeout(),
            probes: ProbeCommands::default(),
        }
    }
}

impl ValidatorConfig {
    /// Loads the validator configuration file in toml format from the given path
    pub fn load_from(path: &Path) -> ValidatorResult<Self> {
        let config_error = |reason: String| ValidatorError::ConfigRead {
            path: path.to_path_buf(),
            reason,
        };
        let data = std::fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        toml::from_str(&data).map_err(|e| config_error(format!("Invalid toml data: {e}")))
    }

    pub fn feature_probes(&self) -> FeatureProbes {
        FeatureProbes {
            gdrcopy: Box::new(CommandProbe::new(
                self.probes.gdrcopy.clone(),
                self.probe_timeout,
            )),
            gds: Box::new(CommandProbe::new(
                self.probes.nvidia_fs.clone(),
                self.probe_timeout,
            )),
            gpu_direct_rdma: Box::new(CommandProbe::new(
                self.probes.nvidia_peermem.clone(),
                self.probe_timeout,
            )),
        }
    }

    pub fn ready_file(&self, component: Component) -> PathBuf {
        self.output_dir.join(format!("{component}-ready"))
    }
}

/// Command line run to probe each additional driver feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProbeCommands {
    #[serde(default = "default_gdrcopy_probe")]
    pub gdrcopy: Vec<String>,
    #[serde(default = "default_nvidia_fs_probe")]
    pub nvidia_fs: Vec<String>,
    #[serde(default = "default_nvidia_peermem_probe")]
    pub nvidia_peermem: Vec<String>,
}

// Called if no `[probes]` is provided at all.
// The serde defaults above are called if one or more fields are missing.
impl Default for ProbeCommands {
    fn default() -> Self {
        Self {
            gdrcopy: default_gdrcopy_probe(),
            nvidia_fs: default_nvidia_fs_probe(),
            nvidia_peermem: default_nvidia_peermem_probe(),
        }
    }
}

pub fn default_status_file() -> PathBuf {
    PathBuf::from(DRIVER_CONTAINER_STATUS_FILE)
}

pub fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

pub fn default_probe_timeout() -> Duration {
    DEFAULT_PROBE_TIMEOUT
}

fn module_loaded(module: &str) -> Vec<String> {
    vec![
        "grep".to_string(),
        "-q".to_string(),
        format!("^{module} "),
        "/proc/modules".to_string(),
    ]
}

pub fn default_gdrcopy_probe() -> Vec<String> {
    module_loaded("gdrdrv")
}

pub fn default_nvidia_fs_probe() -> Vec<String> {
    module_loaded("nvidia_fs")
}

pub fn default_nvidia_peermem_probe() -> Vec<String> {
    module_loaded("nvidia_peermem")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: ValidatorConfig = toml::from_str("").unwrap();
        assert_eq!(config, ValidatorConfig::default());
        assert_eq!(
            config.status_file,
            PathBuf::from("/run/nvidia/validations/.driver-ctr-ready")
        );
        assert_eq!(config.probe_timeout, Duration::from_secs(30));
        assert_eq!(
            config.probes.nvidia_fs,
            vec!["grep", "-q", "^nvidia_fs ", "/proc/modules"]
        );
    }

    #[test]
    fn test_partial_overrides() {
        let config: ValidatorConfig = toml::from_str(
            r#"
status-file = "/tmp/.driver-ctr-ready"
probe-timeout = "2m"

[probes]
gdrcopy = ["/usr/bin/gdrcopy_sanity"]
"#,
        )
        .unwrap();
        assert_eq!(config.status_file, PathBuf::from("/tmp/.driver-ctr-ready"));
        assert_eq!(config.output_dir, default_output_dir());
        assert_eq!(config.probe_timeout, Duration::from_secs(120));
        assert_eq!(config.probes.gdrcopy, vec!["/usr/bin/gdrcopy_sanity"]);
        assert_eq!(config.probes.nvidia_peermem, default_nvidia_peermem_probe());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("validator.toml");
        std::fs::write(&path, "output-dir = \"/var/run/validations\"\n").unwrap();
        let config = ValidatorConfig::load_from(&path).unwrap();
        assert_eq!(
            config.ready_file(Component::NvidiaPeermem),
            PathBuf::from("/var/run/validations/nvidia-peermem-ready")
        );

        std::fs::write(&path, "probe-timeout = 30\n").unwrap();
        assert!(matches!(
            ValidatorConfig::load_from(&path),
            Err(ValidatorError::ConfigRead { .. })
        ));
        assert!(matches!(
            ValidatorConfig::load_from(&dir.path().join("missing.toml")),
            Err(ValidatorError::ConfigRead { .. })
        ));
    }
}
