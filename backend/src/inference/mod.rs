pub mod classifier;
pub mod preprocess;
pub mod provider;

use std::sync::Arc;

use classifier::{Classify, Prediction, classify};
use preprocess::{PreprocessOptions, decode_and_preprocess};

use crate::error::PipelineError;

/// Preprocessor and classifier bound together for per-upload use.
#[derive(Clone)]
pub struct Pipeline {
    classifier: Arc<dyn Classify>,
    options: PreprocessOptions,
}

impl Pipeline {
    pub fn new(classifier: Arc<dyn Classify>, options: PreprocessOptions) -> Self {
        Self {
            classifier,
            options,
        }
    }

    pub fn predict(&self, image: &[u8]) -> Result<Prediction, PipelineError> {
        let tensor = decode_and_preprocess(image, &self.options)?;
        classify(self.classifier.as_ref(), &tensor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::classifier::tests::ScriptedClassifier;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use shared::PredictionLabel;
    use std::io::Cursor;

    #[test]
    fn predicts_from_encoded_bytes() {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::new(8, 8))
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();

        let pipeline = Pipeline::new(
            Arc::new(ScriptedClassifier::new(&[(0.3, 0.7)])),
            PreprocessOptions::default(),
        );
        let prediction = pipeline.predict(buf.get_ref()).unwrap();
        assert_eq!(prediction.label, PredictionLabel::Normal);
    }

    #[test]
    fn undecodable_upload_never_reaches_the_model() {
        let pipeline = Pipeline::new(
            Arc::new(ScriptedClassifier::new(&[])),
            PreprocessOptions::default(),
        );
        assert!(matches!(
            pipeline.predict(b"GIF89a-but-truncated"),
            Err(PipelineError::UnsupportedImageFormat(_))
        ));
    }
}
