//! The conversion pipeline: detect, load, normalize, save.
//!
//! Conversions never go format-to-format. Every request loads into the
//! canonical document model, passes through color normalization when the
//! target mandates a colorspace, and saves through the target's plugin.
//! Everything either format could not keep lands in the report's loss
//! manifest.

use crate::error::ConversionError;
use crate::report::ConversionReport;
use log::{debug, info};
use quiver_cms::{ColorManager, RenderingIntent};
use quiver_executor::{Executor, ExecutorImpl};
use quiver_formats::{FormatId, FormatRegistry};
use quiver_types::{CancelToken, LossManifest};
use std::path::Path;
use std::sync::Arc;

/// One conversion job: raw bytes plus everything needed to resolve the
/// source format and drive the save.
#[derive(Clone)]
pub struct ConversionRequest {
    pub data: Vec<u8>,
    /// Original file name, used for extension-based detection and error
    /// messages.
    pub filename: Option<String>,
    /// Caller-asserted source format. Takes priority over extension and
    /// magic detection.
    pub source_hint: Option<FormatId>,
    pub target: FormatId,
    pub intent: Option<RenderingIntent>,
    pub cancel: CancelToken,
}

impl ConversionRequest {
    pub fn new(data: Vec<u8>, target: FormatId) -> Self {
        Self {
            data,
            filename: None,
            source_hint: None,
            target,
            intent: None,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_source_hint(mut self, hint: FormatId) -> Self {
        self.source_hint = Some(hint);
        self
    }

    pub fn with_intent(mut self, intent: RenderingIntent) -> Self {
        self.intent = Some(intent);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// Output bytes plus the report describing what the conversion did.
#[derive(Debug)]
pub struct Conversion {
    pub bytes: Vec<u8>,
    pub report: ConversionReport,
}

pub struct ConverterBuilder {
    registry: Option<FormatRegistry>,
    cms: Option<ColorManager>,
    executor: ExecutorImpl,
}

impl ConverterBuilder {
    pub fn with_registry(mut self, registry: FormatRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_color_manager(mut self, cms: ColorManager) -> Self {
        self.cms = Some(cms);
        self
    }

    pub fn with_executor(mut self, executor: ExecutorImpl) -> Self {
        self.executor = executor;
        self
    }

    pub fn build(self) -> Converter {
        Converter {
            registry: Arc::new(self.registry.unwrap_or_else(FormatRegistry::builtin)),
            cms: Arc::new(self.cms.unwrap_or_default()),
            executor: self.executor,
        }
    }
}

/// The conversion engine.
///
/// Cheap to clone; clones share the registry, the color manager (and
/// thereby its transform cache) and the executor.
#[derive(Clone)]
pub struct Converter {
    registry: Arc<FormatRegistry>,
    cms: Arc<ColorManager>,
    executor: ExecutorImpl,
}

impl Default for Converter {
    fn default() -> Self {
        Converter::builder().build()
    }
}

impl Converter {
    pub fn builder() -> ConverterBuilder {
        ConverterBuilder {
            registry: None,
            cms: None,
            executor: ExecutorImpl::default(),
        }
    }

    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    /// Resolves the source format of a request: explicit hint first,
    /// then the filename extension, then magic sniffing.
    pub fn resolve_source(&self, request: &ConversionRequest) -> Result<FormatId, ConversionError> {
        if let Some(hint) = request.source_hint {
            return Ok(hint);
        }
        if let Some(name) = &request.filename
            && let Some(descriptor) = self.registry.resolve_by_extension(name)
        {
            return Ok(descriptor.id);
        }
        if let Some(descriptor) = self.registry.detect(&request.data) {
            return Ok(descriptor.id);
        }
        Err(ConversionError::Unrecognized {
            filename: request.filename.clone(),
        })
    }

    /// Runs one conversion end to end.
    pub fn convert(&self, request: ConversionRequest) -> Result<Conversion, ConversionError> {
        let source = self.resolve_source(&request)?;
        let target = request.target;
        debug!("converting {source} -> {target}");

        let loader = self.registry.loader_for(source)?;
        let saver = self.registry.saver_for(target)?;

        check(&request.cancel)?;
        let mut doc = loader
            .load(&request.data)
            .map_err(|e| ConversionError::Load { format: source, source: e })?;

        let mut losses = LossManifest::new();
        check(&request.cancel)?;
        if let Some(descriptor) = self.registry.descriptor(target)
            && let Some(space) = descriptor.mandated_colorspace
        {
            self.cms.normalize_document(&mut doc, space, &mut losses)?;
        }

        check(&request.cancel)?;
        let output = saver
            .save(&doc)
            .map_err(|e| ConversionError::Save { format: target, source: e })?;
        losses.merge(output.losses);

        let report = ConversionReport::new(source, target, losses);
        info!(
            "converted {source} -> {target}: {} bytes, {} losses",
            output.bytes.len(),
            report.losses.len()
        );
        Ok(Conversion { bytes: output.bytes, report })
    }

    /// Converts a file on disk, inferring both formats from the file
    /// extensions.
    pub fn convert_file(
        &self,
        input: &Path,
        output: &Path,
    ) -> Result<ConversionReport, ConversionError> {
        let target = self
            .registry
            .resolve_by_extension(&output.to_string_lossy())
            .map(|d| d.id)
            .ok_or_else(|| ConversionError::Unrecognized {
                filename: Some(output.to_string_lossy().into_owned()),
            })?;
        let data = std::fs::read(input)?;
        let request = ConversionRequest::new(data, target)
            .with_filename(input.to_string_lossy().into_owned());
        let conversion = self.convert(request)?;
        std::fs::write(output, &conversion.bytes)?;
        Ok(conversion.report)
    }

    /// Converts a batch of independent requests.
    ///
    /// Results come back in input order and one request's failure never
    /// affects another. Parallelism follows the configured executor.
    pub fn convert_batch(
        &self,
        requests: Vec<ConversionRequest>,
    ) -> Vec<Result<Conversion, ConversionError>> {
        debug!(
            "batch of {} requests on '{}' executor ({} workers, {} cores)",
            requests.len(),
            self.executor.name(),
            self.executor.parallelism(),
            num_cpus::get()
        );
        let converter = self.clone();
        self.executor
            .execute_all_fallible(requests, move |request| converter.convert(request))
    }

    /// Like [`Converter::convert_batch`], but flattens failures into
    /// `Failed` reports so callers get one report per input, in input
    /// order. Output bytes of failed items are `None`.
    pub fn convert_batch_reports(
        &self,
        requests: Vec<ConversionRequest>,
    ) -> Vec<(Option<Vec<u8>>, ConversionReport)> {
        let converter = self.clone();
        self.executor.execute_all(requests, move |request| {
            let source = converter.resolve_source(&request).ok();
            let target = request.target;
            match converter.convert(request) {
                Ok(conversion) => (Some(conversion.bytes), conversion.report),
                Err(e) => (None, ConversionReport::failed(source, target, &e)),
            }
        })
    }
}

fn check(cancel: &CancelToken) -> Result<(), ConversionError> {
    if cancel.is_cancelled() {
        return Err(ConversionError::Cancelled);
    }
    Ok(())
}
