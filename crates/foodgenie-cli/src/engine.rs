//! Detector engine on a dedicated OS thread.
//!
//! The loaded ONNX session lives on one thread for the whole run; requests
//! arrive over an mpsc channel and answer on oneshot channels. This keeps
//! model loading explicit and single-owner instead of hiding it behind a
//! process-wide cache.

use crate::config::Config;
use foodgenie_core::detector::{DetectorError, IngredientDetector};
use foodgenie_core::labels::{LabelError, LabelTable};
use image::RgbImage;
use std::collections::BTreeSet;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("detector error: {0}")]
    Detector(#[from] DetectorError),
    #[error("label error: {0}")]
    Labels(#[from] LabelError),
    #[error("engine thread exited")]
    ChannelClosed,
}

/// Messages sent from command handlers to the engine thread.
enum EngineRequest {
    Detect {
        images: Vec<RgbImage>,
        reply: oneshot::Sender<Result<BTreeSet<String>, EngineError>>,
    },
}

/// Clone-safe handle to the engine thread.
#[derive(Clone)]
pub struct EngineHandle {
    tx: mpsc::Sender<EngineRequest>,
}

impl EngineHandle {
    /// Run detection over the given images and return the deduplicated
    /// canonical ingredient set.
    pub async fn detect(&self, images: Vec<RgbImage>) -> Result<BTreeSet<String>, EngineError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(EngineRequest::Detect {
                images,
                reply: reply_tx,
            })
            .await
            .map_err(|_| EngineError::ChannelClosed)?;
        reply_rx.await.map_err(|_| EngineError::ChannelClosed)?
    }
}

/// Spawn the engine on a dedicated OS thread.
///
/// Loads the label table and the ONNX model synchronously (fail-fast),
/// then enters a request loop.
pub fn spawn_engine(config: &Config) -> Result<EngineHandle, EngineError> {
    let labels = LabelTable::load(&config.labels_path_str())?;

    let mut detector = IngredientDetector::load(&config.model_path_str(), labels)?
        .with_thresholds(config.confidence_threshold, config.nms_threshold);
    tracing::info!(path = %config.model_path.display(), "ingredient detector loaded");

    let (tx, mut rx) = mpsc::channel::<EngineRequest>(4);

    std::thread::Builder::new()
        .name("foodgenie-engine".into())
        .spawn(move || {
            tracing::debug!("engine thread started");
            while let Some(req) = rx.blocking_recv() {
                match req {
                    EngineRequest::Detect { images, reply } => {
                        let result = detector
                            .detect_ingredients(&images)
                            .map_err(EngineError::from);
                        let _ = reply.send(result);
                    }
                }
            }
            tracing::debug!("engine thread exiting");
        })
        .expect("failed to spawn engine thread");

    Ok(EngineHandle { tx })
}
