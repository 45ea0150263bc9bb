use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use super::error::ApiError;
use super::types::*;
use super::{AnnotationStore, DatasetService, Generator};
use crate::annotations::{EpisodeAnnotations, EpisodeIndex};
use crate::http_client::{self, HttpSettings, RetryConfig};

const MAX_RESPONSE_BYTES: usize = 32 * 1024 * 1024;
const MAX_ERROR_BYTES: usize = 64 * 1024;

const FETCH_RETRY: RetryConfig = RetryConfig {
    max_attempts: 3,
    base_delay: Duration::from_millis(200),
    max_delay: Duration::from_secs(2),
};

/// [`Backend`](super::Backend) implementation speaking JSON over HTTP.
#[derive(Clone)]
pub struct HttpBackend {
    base_url: Url,
    agent: ureq::Agent,
}

impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl HttpBackend {
    pub fn new(base_url: &str, settings: HttpSettings) -> Result<Self, ApiError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            agent: http_client::agent(settings),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|err| ApiError::InvalidUrl(format!("{path}: {err}")))
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        tracing::debug!("GET {url}");
        let result = self.agent.get(url.as_str()).call();
        decode(result)
    }

    /// GET with retries on transport failures; only used for idempotent reads.
    fn get_json_retrying<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        http_client::retry_with_backoff(FETCH_RETRY, || self.get_json(path), ApiError::is_transport)
    }

    fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        tracing::debug!("{method} {url}");
        let result = self
            .agent
            .request(method, url.as_str())
            .set("Accept", "application/json")
            .send_json(body);
        decode(result)
    }
}

impl AnnotationStore for HttpBackend {
    fn fetch_annotations(&self, episode: EpisodeIndex) -> Result<EpisodeAnnotations, ApiError> {
        self.get_json_retrying(&format!("api/episodes/{episode}/annotations"))
    }

    fn save_annotations(
        &self,
        episode: EpisodeIndex,
        annotations: &EpisodeAnnotations,
    ) -> Result<(), ApiError> {
        let body = SaveAnnotationsBody {
            episode_index: episode,
            annotations,
        };
        let response: OkResponse =
            self.send_json("POST", &format!("api/episodes/{episode}/annotations"), &body)?;
        if response.ok {
            Ok(())
        } else {
            Err(ApiError::Json("Server did not acknowledge the save".into()))
        }
    }
}

impl Generator for HttpBackend {
    fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, ApiError> {
        match request {
            GenerationRequest::Subtasks(body) => self.send_json("POST", request.endpoint(), body),
            GenerationRequest::FakeVqa(body) => self.send_json("POST", request.endpoint(), body),
        }
    }
}

impl DatasetService for HttpBackend {
    fn load_dataset(&self, request: &DatasetLoadRequest) -> Result<DatasetSummary, ApiError> {
        self.send_json("POST", "api/dataset/load", request)
    }

    fn dataset_info(&self) -> Result<DatasetSummary, ApiError> {
        self.get_json_retrying("api/dataset/info")
    }

    fn video_timing(
        &self,
        episode: EpisodeIndex,
        video_key: Option<&str>,
    ) -> Result<VideoTiming, ApiError> {
        let mut url = self.endpoint(&format!("api/episodes/{episode}/video_timing"))?;
        if let Some(key) = video_key {
            url.query_pairs_mut().append_pair("video_key", key);
        }
        tracing::debug!("GET {url}");
        decode(self.agent.get(url.as_str()).call())
    }

    fn video_url(&self, episode: EpisodeIndex, video_key: Option<&str>) -> Result<String, ApiError> {
        let mut url = self.endpoint(&format!("api/video/{episode}"))?;
        if let Some(key) = video_key {
            url.query_pairs_mut().append_pair("video_key", key);
        }
        Ok(url.into())
    }

    fn export(&self, request: &ExportRequest) -> Result<ExportResult, ApiError> {
        self.send_json("POST", "api/export", request)
    }

    fn push_to_hub(&self, request: &PushToHubRequest) -> Result<PushToHubResult, ApiError> {
        self.send_json("POST", "api/push_to_hub", request)
    }

    fn import_from_root(
        &self,
        kind: ImportKind,
        root_path: &str,
    ) -> Result<ImportResult, ApiError> {
        self.send_json("POST", kind.endpoint(), &ImportRequest { root_path })
    }

    fn ai_status(&self) -> Result<AiStatus, ApiError> {
        self.get_json("api/ai/status")
    }

    fn ai_config(&self) -> Result<serde_json::Map<String, serde_json::Value>, ApiError> {
        let payload: ConfigPayload = self.get_json("api/ai/config")?;
        Ok(payload.config)
    }

    fn put_ai_config(
        &self,
        config: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<serde_json::Map<String, serde_json::Value>, ApiError> {
        let body = ConfigPayload {
            config: config.clone(),
        };
        let payload: ConfigPayload = self.send_json("PUT", "api/ai/config", &body)?;
        Ok(payload.config)
    }

    fn prompt(&self, kind: PromptKind) -> Result<String, ApiError> {
        let payload: PromptPayload = self.get_json(kind.endpoint())?;
        Ok(payload.text)
    }

    fn put_prompt(&self, kind: PromptKind, text: &str) -> Result<String, ApiError> {
        let body = PromptPayload {
            text: text.to_string(),
        };
        let payload: PromptPayload = self.send_json("PUT", kind.endpoint(), &body)?;
        Ok(payload.text)
    }
}

fn normalize_base_url(base_url: &str) -> Result<Url, ApiError> {
    let trimmed = base_url.trim();
    let mut url =
        Url::parse(trimmed).map_err(|err| ApiError::InvalidUrl(format!("{trimmed}: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::InvalidUrl(format!(
            "{trimmed}: expected http or https"
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn decode<T: DeserializeOwned>(result: Result<ureq::Response, ureq::Error>) -> Result<T, ApiError> {
    let response = match result {
        Ok(response) => response,
        Err(ureq::Error::Status(code, response)) => {
            let body = http_client::read_response_text(response, MAX_ERROR_BYTES)
                .unwrap_or_default();
            let err = ApiError::from_status_body(code, &body);
            tracing::warn!("Server returned HTTP {code}: {err}");
            return Err(err);
        }
        Err(ureq::Error::Transport(err)) => {
            tracing::warn!("Transport error: {err}");
            return Err(ApiError::Transport(err.to_string()));
        }
    };
    let body = http_client::read_response_bytes(response, MAX_RESPONSE_BYTES)
        .map_err(|err| ApiError::Transport(err.to_string()))?;
    serde_json::from_slice(&body).map_err(|err| ApiError::Json(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::SubtaskSegment;
    use crate::http_client::test_server::{json_response, serve_once};

    fn backend(url: &str) -> HttpBackend {
        HttpBackend::new(url, HttpSettings::default()).unwrap()
    }

    #[test]
    fn base_url_gains_trailing_slash_and_keeps_prefix() {
        let backend = backend("http://localhost:8000/annotate");
        assert_eq!(backend.base_url(), "http://localhost:8000/annotate/");
        let url = backend.video_url(3, Some("observation.images.top")).unwrap();
        assert_eq!(
            url,
            "http://localhost:8000/annotate/api/video/3?video_key=observation.images.top"
        );
    }

    #[test]
    fn rejects_non_http_urls() {
        assert!(HttpBackend::new("ftp://example.com", HttpSettings::default()).is_err());
        assert!(HttpBackend::new("not a url", HttpSettings::default()).is_err());
    }

    #[test]
    fn fetch_annotations_reads_lists() {
        let body = r#"{"episode_index": 2,
            "subtasks": [{"start": 0.0, "end": 1.5, "label": "reach"}],
            "high_levels": [], "qa_labels": []}"#;
        let (url, requests) = serve_once(json_response("200 OK", body));
        let annotations = backend(&url).fetch_annotations(2).unwrap();
        assert_eq!(
            annotations.subtasks,
            vec![SubtaskSegment {
                start: 0.0,
                end: 1.5,
                label: "reach".into()
            }]
        );
        let request = requests.recv().unwrap();
        assert!(request.starts_with("GET /api/episodes/2/annotations"));
    }

    #[test]
    fn save_annotations_posts_episode_payload() {
        let (url, requests) = serve_once(json_response("200 OK", r#"{"ok": true}"#));
        let annotations = EpisodeAnnotations::default();
        backend(&url).save_annotations(7, &annotations).unwrap();
        let request = requests.recv().unwrap();
        assert!(request.starts_with("POST /api/episodes/7/annotations"));
        assert!(request.contains(r#""episode_index":7"#));
    }

    #[test]
    fn server_detail_is_surfaced() {
        let (url, _) = serve_once(json_response(
            "400 Bad Request",
            r#"{"detail": "Dataset not loaded"}"#,
        ));
        let err = backend(&url).dataset_info().unwrap_err();
        assert_eq!(err.to_string(), "Dataset not loaded");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn generation_posts_to_kind_endpoint() {
        let (url, requests) = serve_once(json_response(
            "200 OK",
            r#"{"episode_index": 1, "count": 4, "subtasks": []}"#,
        ));
        let request = GenerationRequest::Subtasks(SubtasksRequest {
            episode_index: 1,
            stride_s: 2.0,
            summary_frames: 6,
            segment_frames: 8,
            max_steps: 200,
            mode: GenerationMode::Replace,
            resume_from_last: false,
            merge_adjacent: true,
            language: "auto".into(),
            start_time_s: None,
        });
        let result = backend(&url).generate(&request).unwrap();
        assert_eq!(result.count, 4);
        let raw = requests.recv().unwrap();
        assert!(raw.starts_with("POST /api/ai/subtasks"));
        assert!(raw.contains(r#""mode":"replace""#));
        assert!(!raw.contains("start_time_s"));
    }
}
