//! Receipt pipeline state machine
//!
//! Drives one receipt from capture to upload:
//! `Idle -> Captured -> Editing -> Compressing -> Uploading -> Done | Failed`.
//!
//! The pipeline itself never awaits. `confirm_edit` hands out a [`ProcessJob`] and
//! `apply_processed` hands out an [`UploadJob`]; the caller runs them and feeds the
//! outcomes back. Every job carries the ticket of the attempt that created it, so an
//! outcome arriving after `cancel` or a new `capture` is discarded instead of applied.

mod jobs;
mod state;

pub use jobs::{Applied, ProcessJob, ProcessOutcome, UploadJob, UploadOutcome};
pub use state::PipelineState;

use chrono::NaiveDate;
use receipt_core::{
    CompressionConstraints, CropMode, EditParameters, ImageAsset, ReceiptConfig, ReceiptError,
    ReceiptResult, Rotation, UploadRequest, UploadResponse,
};

use crate::image::ImageEditor;
use crate::preview::{PreviewHandle, PreviewRegistry};
use crate::upload::ReceiptUploader;
use crate::validator::ImageValidator;

/// Record the receipt is filed against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    pub entity_id: String,
    pub date: NaiveDate,
}

impl UploadTarget {
    pub fn new(entity_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            entity_id: entity_id.into(),
            date,
        }
    }
}

/// Captured asset together with its preview. Dropping it releases the preview.
#[derive(Debug)]
struct HeldAsset {
    asset: ImageAsset,
    preview: PreviewHandle,
}

#[derive(Debug)]
pub struct ReceiptPipeline {
    state: PipelineState,
    target: UploadTarget,
    editor: ImageEditor,
    constraints: CompressionConstraints,
    previews: PreviewRegistry,
    held: Option<HeldAsset>,
    params: EditParameters,
    generation: u64,
    last_error: Option<ReceiptError>,
    response: Option<UploadResponse>,
}

impl ReceiptPipeline {
    pub fn new(target: UploadTarget, config: &ReceiptConfig) -> Self {
        Self {
            state: PipelineState::Idle,
            target,
            editor: ImageEditor::new(config.edit_quality, config.auto_orient),
            constraints: config.constraints.clone(),
            previews: PreviewRegistry::new(),
            held: None,
            params: EditParameters::default(),
            generation: 0,
            last_error: None,
            response: None,
        }
    }

    /// Share a preview registry with the caller (e.g. one per dialog host).
    ///
    /// A preview already held moves to the new registry.
    pub fn with_previews(mut self, previews: PreviewRegistry) -> Self {
        if let Some(held) = self.held.as_mut() {
            held.preview = previews.acquire(&held.asset);
        }
        self.previews = previews;
        self
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    pub fn target(&self) -> &UploadTarget {
        &self.target
    }

    pub fn params(&self) -> EditParameters {
        self.params
    }

    pub fn asset(&self) -> Option<&ImageAsset> {
        self.held.as_ref().map(|held| &held.asset)
    }

    pub fn preview_url(&self) -> Option<&str> {
        self.held.as_ref().map(|held| held.preview.url())
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    /// Error of the last failed attempt, for inline display.
    pub fn last_error(&self) -> Option<&ReceiptError> {
        self.last_error.as_ref()
    }

    /// Response of the last completed upload.
    pub fn response(&self) -> Option<&UploadResponse> {
        self.response.as_ref()
    }

    /// Take ownership of a newly captured asset.
    ///
    /// Any held asset is replaced and its preview released. Non-image assets are
    /// rejected and leave the pipeline untouched.
    pub fn capture(&mut self, asset: ImageAsset) -> ReceiptResult<()> {
        self.guard("capture", self.state.accepts_capture())?;
        ImageValidator::validate_asset(&asset)?;

        self.invalidate();
        let preview = self.previews.acquire(&asset);

        tracing::debug!(
            filename = %asset.filename,
            content_type = %asset.content_type,
            size_bytes = asset.size_bytes(),
            preview = %preview.url(),
            "Receipt captured"
        );

        self.held = Some(HeldAsset { asset, preview });
        self.params = EditParameters::default();
        self.last_error = None;
        self.response = None;
        self.state = PipelineState::Captured;
        Ok(())
    }

    pub fn begin_edit(&mut self) -> ReceiptResult<()> {
        self.guard("edit", self.state == PipelineState::Captured)?;
        self.state = PipelineState::Editing;
        Ok(())
    }

    pub fn set_rotation(&mut self, rotation: Rotation) -> ReceiptResult<()> {
        self.guard("rotate", self.state == PipelineState::Editing)?;
        self.params.rotation = rotation;
        Ok(())
    }

    pub fn rotate_clockwise(&mut self) -> ReceiptResult<Rotation> {
        self.set_rotation(self.params.rotation.clockwise())?;
        Ok(self.params.rotation)
    }

    pub fn rotate_counter_clockwise(&mut self) -> ReceiptResult<Rotation> {
        self.set_rotation(self.params.rotation.counter_clockwise())?;
        Ok(self.params.rotation)
    }

    pub fn set_crop_mode(&mut self, crop_mode: CropMode) -> ReceiptResult<()> {
        self.guard("crop", self.state == PipelineState::Editing)?;
        self.params.crop_mode = crop_mode;
        Ok(())
    }

    /// Accept the current edit parameters and start processing.
    pub fn confirm_edit(&mut self) -> ReceiptResult<ProcessJob> {
        self.guard("confirm", self.state == PipelineState::Editing)?;
        if self.target.entity_id.trim().is_empty() {
            return Err(ReceiptError::InputValidation(
                "Entity id is required".to_string(),
            ));
        }
        let asset = match &self.held {
            Some(held) => held.asset.clone(),
            None => return Err(self.invalid("confirm")),
        };

        self.generation += 1;
        self.last_error = None;
        self.state = PipelineState::Compressing;

        tracing::debug!(
            ticket = self.generation,
            rotation = self.params.rotation.degrees(),
            crop_mode = ?self.params.crop_mode,
            "Receipt edit confirmed"
        );

        Ok(ProcessJob {
            ticket: self.generation,
            asset,
            params: self.params,
            editor: self.editor,
            constraints: self.constraints.clone(),
        })
    }

    /// Apply the outcome of a [`ProcessJob`].
    pub fn apply_processed(&mut self, outcome: ProcessOutcome) -> Applied<UploadJob> {
        if !self.is_current(outcome.ticket, PipelineState::Compressing) {
            return Applied::Discarded;
        }

        match outcome.result {
            Ok(file) => {
                tracing::debug!(
                    ticket = outcome.ticket,
                    filename = %file.filename,
                    size_bytes = file.size_bytes(),
                    quality = file.quality,
                    within_limit = file.within_limit,
                    "Receipt compressed"
                );
                self.state = PipelineState::Uploading;
                Applied::Next(UploadJob {
                    ticket: outcome.ticket,
                    request: UploadRequest {
                        entity_id: self.target.entity_id.clone(),
                        date: self.target.date,
                        file,
                    },
                })
            }
            Err(e) => Applied::Failed(self.fail(e)),
        }
    }

    /// Apply the outcome of an [`UploadJob`].
    pub fn apply_uploaded(&mut self, outcome: UploadOutcome) -> Applied<UploadResponse> {
        if !self.is_current(outcome.ticket, PipelineState::Uploading) {
            return Applied::Discarded;
        }

        match outcome.result {
            Ok(response) => {
                tracing::info!(
                    entity_id = %self.target.entity_id,
                    path = %response.path,
                    "Receipt uploaded"
                );
                self.held = None;
                self.params = EditParameters::default();
                self.response = Some(response.clone());
                self.state = PipelineState::Done;
                Applied::Next(response)
            }
            Err(e) => Applied::Failed(self.fail(e)),
        }
    }

    /// Abandon the current attempt. Allowed from any state.
    pub fn cancel(&mut self) {
        if self.state != PipelineState::Idle {
            tracing::debug!(state = %self.state, "Receipt pipeline cancelled");
        }
        self.invalidate();
        self.held = None;
        self.params = EditParameters::default();
        self.last_error = None;
        self.response = None;
        self.state = PipelineState::Idle;
    }

    /// Go back to the captured asset after a failure, or to `Idle` if it is gone.
    pub fn retry(&mut self) -> ReceiptResult<PipelineState> {
        self.guard("retry", self.state == PipelineState::Failed)?;
        self.last_error = None;
        self.state = if self.held.is_some() {
            PipelineState::Captured
        } else {
            PipelineState::Idle
        };
        Ok(self.state)
    }

    /// Drive confirm, process and upload to completion.
    ///
    /// Starts from `Captured` or `Editing` with the current edit parameters.
    pub async fn run(&mut self, uploader: &dyn ReceiptUploader) -> ReceiptResult<UploadResponse> {
        if self.state == PipelineState::Captured {
            self.begin_edit()?;
        }

        let job = self.confirm_edit()?;
        let outcome = job.run_blocking().await;
        let upload = match self.apply_processed(outcome) {
            Applied::Next(job) => job,
            Applied::Failed(e) => return Err(e),
            Applied::Discarded => return Err(self.invalid("upload")),
        };

        let outcome = upload.run(uploader).await;
        match self.apply_uploaded(outcome) {
            Applied::Next(response) => Ok(response),
            Applied::Failed(e) => Err(e),
            Applied::Discarded => Err(self.invalid("finish")),
        }
    }

    fn guard(&self, action: &'static str, allowed: bool) -> ReceiptResult<()> {
        if allowed {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn invalid(&self, action: &'static str) -> ReceiptError {
        ReceiptError::InvalidTransition {
            state: self.state.name(),
            action,
        }
    }

    /// Any job handed out before this call becomes stale.
    fn invalidate(&mut self) {
        self.generation += 1;
    }

    fn is_current(&self, ticket: u64, expected: PipelineState) -> bool {
        let current = ticket == self.generation && self.state == expected;
        if !current {
            tracing::debug!(
                ticket,
                generation = self.generation,
                state = %self.state,
                "Discarding stale receipt outcome"
            );
        }
        current
    }

    fn fail(&mut self, error: ReceiptError) -> ReceiptError {
        error.log();
        // The captured bytes are unreadable, retrying them cannot succeed
        if matches!(error, ReceiptError::Decode(_)) {
            self.held = None;
        }
        self.last_error = Some(error.clone());
        self.state = PipelineState::Failed;
        error
    }
}
