//! YOLOv8 ingredient detector via ONNX Runtime.
//!
//! Runs a trained YOLOv8 export (single `[1, 4+classes, anchors]` output
//! tensor) with letterbox preprocessing and NMS post-processing, and maps
//! class ids to canonical ingredient names.

use crate::labels::LabelTable;
use image::RgbImage;
use ndarray::Array4;
use ort::session::Session;
use ort::value::TensorRef;
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;

// --- Named constants (no magic numbers) ---
const YOLO_INPUT_SIZE: usize = 640;
const YOLO_CONFIDENCE_THRESHOLD: f32 = 0.25;
const YOLO_NMS_THRESHOLD: f32 = 0.45;
/// Box attributes per anchor column: cx, cy, w, h.
const YOLO_BOX_ATTRS: usize = 4;
/// Ultralytics letterbox padding gray.
const YOLO_PAD_VALUE: f32 = 114.0;

#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("model file not found: {0} — train and export the ingredient model first")]
    ModelNotFound(String),
    #[error("inference failed: {0}")]
    InferenceFailed(String),
    #[error("model has {model} classes but label table has {table} names")]
    LabelMismatch { model: usize, table: usize },
    #[error("ort: {0}")]
    Ort(#[from] ort::Error),
}

impl From<ort::Error<ort::session::builder::SessionBuilder>> for DetectorError {
    fn from(e: ort::Error<ort::session::builder::SessionBuilder>) -> Self {
        DetectorError::Ort(e.into())
    }
}

/// Metadata for coordinate de-mapping after letterbox resize.
struct LetterboxInfo {
    scale: f32,
    pad_x: f32,
    pad_y: f32,
}

/// A single detected ingredient instance.
#[derive(Debug, Clone)]
pub struct Detection {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub confidence: f32,
    pub class_id: usize,
    /// Canonical (lower-cased) ingredient name for `class_id`.
    pub label: String,
}

/// YOLOv8-based ingredient detector.
pub struct IngredientDetector {
    session: Session,
    labels: LabelTable,
    input_size: usize,
    confidence_threshold: f32,
    nms_threshold: f32,
}

impl IngredientDetector {
    /// Load the YOLOv8 ONNX export from the given path.
    pub fn load(model_path: &str, labels: LabelTable) -> Result<Self, DetectorError> {
        if !Path::new(model_path).exists() {
            return Err(DetectorError::ModelNotFound(model_path.to_string()));
        }

        let session = Session::builder()?
            .with_intra_threads(2)?
            .commit_from_file(model_path)?;

        tracing::info!(
            path = model_path,
            classes = labels.len(),
            inputs = ?session.inputs().iter().map(|i| (i.name(), i.dtype())).collect::<Vec<_>>(),
            outputs = ?session.outputs().iter().map(|o| o.name()).collect::<Vec<_>>(),
            "loaded ingredient detection model"
        );

        Ok(Self {
            session,
            labels,
            input_size: YOLO_INPUT_SIZE,
            confidence_threshold: YOLO_CONFIDENCE_THRESHOLD,
            nms_threshold: YOLO_NMS_THRESHOLD,
        })
    }

    /// Override the default confidence / NMS IoU thresholds.
    pub fn with_thresholds(mut self, confidence: f32, nms: f32) -> Self {
        self.confidence_threshold = confidence;
        self.nms_threshold = nms;
        self
    }

    /// Detect ingredient instances in one RGB image, sorted by confidence.
    pub fn detect(&mut self, image: &RgbImage) -> Result<Vec<Detection>, DetectorError> {
        let (input, letterbox) = self.preprocess(image);

        let outputs = self
            .session
            .run(ort::inputs![TensorRef::from_array_view(input.view())?])?;

        let (shape, raw) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| DetectorError::InferenceFailed(format!("output extraction: {e}")))?;

        let dims: Vec<usize> = shape.iter().map(|&d| d as usize).collect();
        if dims.len() != 3 || dims[0] != 1 || dims[1] <= YOLO_BOX_ATTRS {
            return Err(DetectorError::InferenceFailed(format!(
                "unexpected output shape {dims:?}, want [1, 4+classes, anchors]"
            )));
        }
        let num_classes = dims[1] - YOLO_BOX_ATTRS;
        let num_anchors = dims[2];
        if num_classes != self.labels.len() {
            return Err(DetectorError::LabelMismatch {
                model: num_classes,
                table: self.labels.len(),
            });
        }

        let detections = decode_output(
            raw,
            num_classes,
            num_anchors,
            &letterbox,
            self.confidence_threshold,
            &self.labels,
        );

        let mut result = nms(detections, self.nms_threshold);
        result.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(result)
    }

    /// Detect across many images and return the deduplicated set of
    /// canonical ingredient names seen in any of them.
    ///
    /// An empty image list, or images with nothing recognized, yields an
    /// empty set — never an error.
    pub fn detect_ingredients(
        &mut self,
        images: &[RgbImage],
    ) -> Result<BTreeSet<String>, DetectorError> {
        let mut found = BTreeSet::new();
        for (i, image) in images.iter().enumerate() {
            let detections = self.detect(image)?;
            tracing::debug!(image = i, count = detections.len(), "image processed");
            for det in detections {
                found.insert(det.label);
            }
        }
        tracing::info!(images = images.len(), ingredients = found.len(), "detection pass done");
        Ok(found)
    }

    /// Preprocess an RGB image into a NCHW float tensor with letterbox padding.
    fn preprocess(&self, image: &RgbImage) -> (Array4<f32>, LetterboxInfo) {
        let (width, height) = image.dimensions();
        let size = self.input_size;

        // Compute letterbox scale (fit within size × size)
        let scale_w = size as f32 / width as f32;
        let scale_h = size as f32 / height as f32;
        let scale = scale_w.min(scale_h);

        let new_w = ((width as f32 * scale).round() as u32).clamp(1, size as u32);
        let new_h = ((height as f32 * scale).round() as u32).clamp(1, size as u32);
        let pad_x = (size as f32 - new_w as f32) / 2.0;
        let pad_y = (size as f32 - new_h as f32) / 2.0;

        let letterbox = LetterboxInfo { scale, pad_x, pad_y };

        let resized =
            image::imageops::resize(image, new_w, new_h, image::imageops::FilterType::Triangle);

        let pad_x_start = pad_x.floor() as usize;
        let pad_y_start = pad_y.floor() as usize;

        // Pad with the letterbox gray, scale pixels to [0, 1]
        let mut tensor = Array4::<f32>::from_elem((1, 3, size, size), YOLO_PAD_VALUE / 255.0);
        for y in 0..new_h as usize {
            for x in 0..new_w as usize {
                let pixel = resized.get_pixel(x as u32, y as u32);
                for c in 0..3 {
                    tensor[[0, c, y + pad_y_start, x + pad_x_start]] = pixel[c] as f32 / 255.0;
                }
            }
        }

        (tensor, letterbox)
    }
}

/// Decode the raw `[1, 4+classes, anchors]` output into detections.
///
/// Layout is attribute-major: `raw[attr * anchors + anchor]`. Per anchor,
/// the best class score above the threshold yields one candidate box,
/// mapped from letterboxed space back to original image coordinates.
fn decode_output(
    raw: &[f32],
    num_classes: usize,
    num_anchors: usize,
    letterbox: &LetterboxInfo,
    threshold: f32,
    labels: &LabelTable,
) -> Vec<Detection> {
    let mut detections = Vec::new();

    for idx in 0..num_anchors {
        let mut best_class = 0usize;
        let mut best_score = 0.0f32;
        for c in 0..num_classes {
            let score = raw
                .get((YOLO_BOX_ATTRS + c) * num_anchors + idx)
                .copied()
                .unwrap_or(0.0);
            if score > best_score {
                best_score = score;
                best_class = c;
            }
        }
        if best_score <= threshold {
            continue;
        }
        let Some(label) = labels.get(best_class) else {
            continue;
        };

        let cx = raw[idx];
        let cy = raw[num_anchors + idx];
        let w = raw[2 * num_anchors + idx];
        let h = raw[3 * num_anchors + idx];

        // Map center-format box from letterboxed space to image space
        let x = (cx - w / 2.0 - letterbox.pad_x) / letterbox.scale;
        let y = (cy - h / 2.0 - letterbox.pad_y) / letterbox.scale;

        detections.push(Detection {
            x,
            y,
            width: w / letterbox.scale,
            height: h / letterbox.scale,
            confidence: best_score,
            class_id: best_class,
            label: label.to_string(),
        });
    }

    detections
}

/// Class-aware Non-Maximum Suppression: remove overlapping detections of
/// the same class. Overlaps between different classes are kept (two
/// ingredients can sit in the same spot of the photo).
fn nms(mut detections: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
    detections.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut keep = Vec::new();
    let mut suppressed = vec![false; detections.len()];

    for i in 0..detections.len() {
        if suppressed[i] {
            continue;
        }
        keep.push(detections[i].clone());

        for j in (i + 1)..detections.len() {
            if suppressed[j] || detections[j].class_id != detections[i].class_id {
                continue;
            }
            if iou(&detections[i], &detections[j]) > iou_threshold {
                suppressed[j] = true;
            }
        }
    }

    keep
}

/// Compute Intersection-over-Union between two detections.
fn iou(a: &Detection, b: &Detection) -> f32 {
    let x1 = a.x.max(b.x);
    let y1 = a.y.max(b.y);
    let x2 = (a.x + a.width).min(b.x + b.width);
    let y2 = (a.y + a.height).min(b.y + b.height);

    let inter_w = (x2 - x1).max(0.0);
    let inter_h = (y2 - y1).max(0.0);
    let inter_area = inter_w * inter_h;

    let area_a = a.width * a.height;
    let area_b = b.width * b.height;
    let union_area = area_a + area_b - inter_area;

    if union_area > 0.0 {
        inter_area / union_area
    } else {
        0.0
    }
}
