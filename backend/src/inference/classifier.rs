use shared::PredictionLabel;

use super::preprocess::ImageTensor;
use crate::error::PipelineError;

/// Raw model output for one image, in the model's own units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scores {
    pub glaucoma: f32,
    pub normal: f32,
}

impl Scores {
    pub fn new(glaucoma: f32, normal: f32) -> Self {
        Self { glaucoma, normal }
    }

    /// Reads the first two values of a flattened batch-of-one output.
    pub fn from_output(values: &[f32]) -> Result<Self, PipelineError> {
        match values {
            [glaucoma, normal, ..] => Ok(Self::new(*glaucoma, *normal)),
            _ => Err(PipelineError::InferenceError(format!(
                "expected two output scores, model produced {}",
                values.len()
            ))),
        }
    }

    pub fn as_array(&self) -> [f32; 2] {
        [self.glaucoma, self.normal]
    }
}

/// Glaucoma only when its score is strictly greater; ties and NaN go to Normal.
pub fn decide(scores: Scores) -> PredictionLabel {
    if scores.glaucoma > scores.normal {
        PredictionLabel::Glaucoma
    } else {
        PredictionLabel::Normal
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label: PredictionLabel,
    pub scores: Scores,
}

/// One forward pass over a single-image batch.
pub trait Classify: Send + Sync {
    fn scores(&self, tensor: &ImageTensor) -> Result<Scores, PipelineError>;
}

pub fn classify(classifier: &dyn Classify, tensor: &ImageTensor) -> Result<Prediction, PipelineError> {
    let scores = classifier.scores(tensor)?;
    Ok(Prediction {
        label: decide(scores),
        scores,
    })
}

#[cfg(feature = "torch")]
pub use torch::ClassifierHandle;

#[cfg(feature = "torch")]
mod torch {
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    use tch::{CModule, Device, Kind, Tensor};

    use super::{Classify, Scores};
    use crate::config::InputLayout;
    use crate::error::PipelineError;
    use crate::inference::preprocess::ImageTensor;

    /// TorchScript module loaded once at startup.
    #[derive(Clone)]
    pub struct ClassifierHandle {
        module: Arc<Mutex<CModule>>,
        device: Device,
        layout: InputLayout,
    }

    impl ClassifierHandle {
        pub fn from_bytes(bytes: &[u8], layout: InputLayout) -> Result<Self, PipelineError> {
            let device = Device::cuda_if_available();
            let module = CModule::load_data_on_device(&mut Cursor::new(bytes), device)
                .map_err(|e| PipelineError::ModelCorrupt(e.to_string()))?;
            log::info!("Loaded TorchScript model on {:?}", device);
            Ok(Self {
                module: Arc::new(Mutex::new(module)),
                device,
                layout,
            })
        }
    }

    impl Classify for ClassifierHandle {
        fn scores(&self, tensor: &ImageTensor) -> Result<Scores, PipelineError> {
            let side = tensor.side() as i64;
            let shape = match self.layout {
                InputLayout::Nhwc => [1, side, side, 3],
                InputLayout::Nchw => [1, 3, side, side],
            };
            let input = Tensor::from_slice(&tensor.to_layout(self.layout))
                .view(shape)
                .to_device(self.device);

            let module = self
                .module
                .lock()
                .map_err(|_| PipelineError::InferenceError("model lock poisoned".to_string()))?;
            let output = tch::no_grad(|| module.forward_ts(&[input]))?;

            let output_flat = output.to_kind(Kind::Float).to_device(Device::Cpu).view([-1]);
            let num_elements = output_flat.size()[0] as usize;
            let mut output_vec = vec![0.0f32; num_elements];
            output_flat.copy_data(&mut output_vec, num_elements);
            Scores::from_output(&output_vec)
        }
    }
}
