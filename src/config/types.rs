use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::{DatasetLoadRequest, DatasetSource};
use crate::generation::{GenerationParams, SubtaskParams, VqaParams};
use crate::http_client::HttpSettings;

/// Errors raised while loading or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config for {path}: {source}")]
    SerializeToml {
        path: PathBuf,
        source: toml::ser::Error,
    },
    #[error("No suitable config directory available")]
    NoConfigDir,
}

/// Everything persisted between launches. Missing keys take defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub server: ServerSettings,
    pub dataset: DatasetSettings,
    pub subtasks: SubtaskParams,
    pub fake_vqa: VqaParams,
    pub batch: BatchSettings,
}

impl AppSettings {
    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            subtasks: self.subtasks.clone(),
            fake_vqa: self.fake_vqa.clone(),
        }
    }

    pub fn set_generation_params(&mut self, params: &GenerationParams) {
        self.subtasks = params.subtasks.clone();
        self.fake_vqa = params.fake_vqa.clone();
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub base_url: String,
    pub connect_timeout_secs: u64,
    /// Unset leaves reads unbounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_timeout_secs: Option<u64>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".into(),
            connect_timeout_secs: 10,
            read_timeout_secs: None,
        }
    }
}

impl ServerSettings {
    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs.max(1)),
            read_timeout: self.read_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Last dataset the user loaded, restored into the dataset form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetSettings {
    pub source: DatasetSource,
    pub repo_id: String,
    pub revision: String,
    pub local_path: String,
    pub video_key: String,
    /// Fetch every episode's annotations in the background after loading.
    pub prefetch_annotations: bool,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            source: DatasetSource::Hub,
            repo_id: String::new(),
            revision: String::new(),
            local_path: String::new(),
            video_key: String::new(),
            prefetch_annotations: true,
        }
    }
}

impl DatasetSettings {
    /// Build a load request; blank fields are left for the server to default.
    pub fn load_request(&self) -> DatasetLoadRequest {
        let non_blank = |value: &str| {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };
        match self.source {
            DatasetSource::Hub => DatasetLoadRequest {
                source: DatasetSource::Hub,
                repo_id: non_blank(&self.repo_id),
                revision: non_blank(&self.revision),
                local_path: None,
                video_key: non_blank(&self.video_key),
            },
            DatasetSource::Local => DatasetLoadRequest {
                source: DatasetSource::Local,
                repo_id: None,
                revision: None,
                local_path: non_blank(&self.local_path),
                video_key: non_blank(&self.video_key),
            },
        }
    }

    pub fn video_key(&self) -> Option<&str> {
        let key = self.video_key.trim();
        (!key.is_empty()).then_some(key)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    /// Pause between consecutive batch items.
    pub pause_ms: u64,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self { pause_ms: 50 }
    }
}

impl BatchSettings {
    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_fills_defaults() {
        let settings: AppSettings = toml::from_str(
            "[server]\nbase_url = \"http://lab:9000\"\n[fake_vqa]\nstride_s = 4.0\n",
        )
        .unwrap();
        assert_eq!(settings.server.base_url, "http://lab:9000");
        assert_eq!(settings.server.connect_timeout_secs, 10);
        assert_eq!(settings.fake_vqa.stride_s, 4.0);
        assert_eq!(settings.fake_vqa.window_s, 2.0);
        assert_eq!(settings.batch.pause_ms, 50);
        assert!(settings.dataset.prefetch_annotations);
    }

    #[test]
    fn load_request_depends_on_source() {
        let mut dataset = DatasetSettings {
            repo_id: " org/set ".into(),
            local_path: "/data".into(),
            video_key: "".into(),
            ..Default::default()
        };
        let hub = dataset.load_request();
        assert_eq!(hub.repo_id.as_deref(), Some("org/set"));
        assert_eq!(hub.local_path, None);
        assert_eq!(hub.video_key, None);

        dataset.source = DatasetSource::Local;
        let local = dataset.load_request();
        assert_eq!(local.repo_id, None);
        assert_eq!(local.local_path.as_deref(), Some("/data"));
    }

    #[test]
    fn server_settings_map_to_http_settings() {
        let server = ServerSettings {
            read_timeout_secs: Some(30),
            ..Default::default()
        };
        let http = server.http_settings();
        assert_eq!(http.connect_timeout, Duration::from_secs(10));
        assert_eq!(http.read_timeout, Some(Duration::from_secs(30)));
    }
}
