use sha2::{Digest, Sha256};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

use super::classifier::Classify;
use crate::config::InputLayout;
use crate::error::PipelineError;

/// Where the classifier artifact lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    Remote(Url),
    Local(PathBuf),
}

impl ModelSource {
    pub fn parse(raw: &str) -> Result<Self, PipelineError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(PipelineError::ModelUnavailable(
                "empty model source".to_string(),
            ));
        }

        match Url::parse(raw) {
            Ok(url) => match url.scheme() {
                "http" | "https" => Ok(ModelSource::Remote(url)),
                "file" => url.to_file_path().map(ModelSource::Local).map_err(|_| {
                    PipelineError::ModelUnavailable(format!("invalid file URL: {}", raw))
                }),
                scheme => Err(PipelineError::ModelUnavailable(format!(
                    "unsupported model source scheme: {}",
                    scheme
                ))),
            },
            Err(url::ParseError::RelativeUrlWithoutBase) => Ok(ModelSource::Local(PathBuf::from(raw))),
            Err(e) => Err(PipelineError::ModelUnavailable(format!(
                "invalid model source {}: {}",
                raw, e
            ))),
        }
    }
}

impl fmt::Display for ModelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelSource::Remote(url) => write!(f, "{}", url),
            ModelSource::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub source: String,
    pub bytes: usize,
    pub sha256: String,
}

impl ModelInfo {
    fn describe(source: &ModelSource, artifact: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(artifact);
        Self {
            source: source.to_string(),
            bytes: artifact.len(),
            sha256: hex::encode(hasher.finalize()),
        }
    }
}

pub struct LoadedModel {
    pub classifier: Arc<dyn Classify>,
    pub info: ModelInfo,
}

/// Fetches the artifact once and turns it into a ready classifier. No retries.
pub struct ModelProvider {
    client: reqwest::Client,
    layout: InputLayout,
}

impl ModelProvider {
    pub fn new(layout: InputLayout) -> Self {
        Self {
            client: reqwest::Client::new(),
            layout,
        }
    }

    pub async fn load(&self, source: &ModelSource) -> Result<LoadedModel, PipelineError> {
        log::info!("Fetching model from {}", source);
        let artifact = self.fetch(source).await?;
        if artifact.is_empty() {
            return Err(PipelineError::ModelCorrupt(
                "model artifact is empty".to_string(),
            ));
        }

        let info = ModelInfo::describe(source, &artifact);
        log::info!(
            "Model artifact: {} bytes, sha256 {}",
            info.bytes,
            info.sha256
        );

        let classifier = deserialize(&artifact, self.layout)?;
        Ok(LoadedModel { classifier, info })
    }

    pub async fn fetch(&self, source: &ModelSource) -> Result<Vec<u8>, PipelineError> {
        match source {
            ModelSource::Remote(url) => {
                let response = self
                    .client
                    .get(url.clone())
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| PipelineError::ModelUnavailable(e.to_string()))?;
                let body = response
                    .bytes()
                    .await
                    .map_err(|e| PipelineError::ModelUnavailable(e.to_string()))?;
                Ok(body.to_vec())
            }
            ModelSource::Local(path) => std::fs::read(path).map_err(|e| {
                PipelineError::ModelUnavailable(format!("{}: {}", path.display(), e))
            }),
        }
    }
}

#[cfg(feature = "torch")]
fn deserialize(artifact: &[u8], layout: InputLayout) -> Result<Arc<dyn Classify>, PipelineError> {
    let handle = super::classifier::ClassifierHandle::from_bytes(artifact, layout)?;
    Ok(Arc::new(handle))
}

#[cfg(not(feature = "torch"))]
fn deserialize(_artifact: &[u8], _layout: InputLayout) -> Result<Arc<dyn Classify>, PipelineError> {
    Err(PipelineError::ModelCorrupt(
        "no inference backend compiled in".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[rstest]
    #[case("https://models.example.org/glaucoma.pt", true)]
    #[case("http://localhost:8000/model.pt", true)]
    #[case("models/glaucoma.pt", false)]
    #[case("/srv/models/glaucoma.pt", false)]
    #[case("file:///srv/models/glaucoma.pt", false)]
    fn parses_sources(#[case] raw: &str, #[case] remote: bool) {
        let source = ModelSource::parse(raw).unwrap();
        assert_eq!(matches!(source, ModelSource::Remote(_)), remote);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("ftp://models.example.org/glaucoma.pt")]
    fn rejects_bad_sources(#[case] raw: &str) {
        assert!(matches!(
            ModelSource::parse(raw),
            Err(PipelineError::ModelUnavailable(_))
        ));
    }

    #[test]
    fn file_url_becomes_a_path() {
        assert_eq!(
            ModelSource::parse("file:///srv/models/glaucoma.pt").unwrap(),
            ModelSource::Local(PathBuf::from("/srv/models/glaucoma.pt"))
        );
    }

    #[actix_web::test]
    async fn missing_local_file_is_unavailable() {
        let provider = ModelProvider::new(InputLayout::Nhwc);
        let source = ModelSource::Local(PathBuf::from("/no/such/model.pt"));
        let err = provider.load(&source).await.err().unwrap();
        assert!(matches!(err, PipelineError::ModelUnavailable(_)));
    }

    #[actix_web::test]
    async fn empty_artifact_is_corrupt() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let provider = ModelProvider::new(InputLayout::Nhwc);
        let source = ModelSource::Local(file.path().to_path_buf());
        let err = provider.load(&source).await.err().unwrap();
        assert_eq!(
            err,
            PipelineError::ModelCorrupt("model artifact is empty".into())
        );
    }

    #[actix_web::test]
    async fn garbage_artifact_is_corrupt() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"this is an HTML landing page, not a model")
            .unwrap();
        let provider = ModelProvider::new(InputLayout::Nhwc);
        let source = ModelSource::Local(file.path().to_path_buf());
        let err = provider.load(&source).await.err().unwrap();
        assert!(matches!(err, PipelineError::ModelCorrupt(_)));
    }

    #[actix_web::test]
    async fn unreachable_host_is_unavailable() {
        let provider = ModelProvider::new(InputLayout::Nhwc);
        let source = ModelSource::parse("http://127.0.0.1:9/glaucoma.pt").unwrap();
        let err = provider.fetch(&source).await.unwrap_err();
        assert!(matches!(err, PipelineError::ModelUnavailable(_)));
    }

    #[test]
    fn digest_is_sha256_hex() {
        let source = ModelSource::Local(PathBuf::from("m.pt"));
        let info = ModelInfo::describe(&source, b"abc");
        assert_eq!(info.bytes, 3);
        assert_eq!(
            info.sha256,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
