use std::sync::Arc;

use log::{info, warn};

use crate::activity::{ActivityEvent, ActivitySink, LogSink};
use crate::chart::{self, ChartRequest, ChartSpec};
use crate::config::{ConfigError, PipelineConfig};
use crate::data::cache::{CachedTables, ExtractionCache};
use crate::data::document::Document;
use crate::data::loader;
use crate::data::model::Dataset;
use crate::data::normalize::normalize;
use crate::data::pdf::{PdfBackend, TextLayoutBackend};
use crate::error::Result;
use crate::recommend::{self, PriorityCategory, RecommendationSet};

// ---------------------------------------------------------------------------
// Session context
// ---------------------------------------------------------------------------

/// Who is acting. Supplied by the caller after it has authorized the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub user: Option<String>,
}

impl SessionContext {
    pub fn for_user(user: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Upload → tables → dataset → chart spec / recommendations.
///
/// `Pipeline` is `Send + Sync`; one instance (or one shared cache) serves
/// every session in the process.
pub struct Pipeline {
    config: PipelineConfig,
    cache: Arc<ExtractionCache>,
    pdf: Arc<dyn PdfBackend>,
    sink: Arc<dyn ActivitySink>,
}

impl Pipeline {
    /// Build a pipeline with the default PDF backend and a log-backed sink.
    pub fn new(config: PipelineConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let cache = Arc::new(ExtractionCache::new(config.cache_capacity()?));
        let pdf: Arc<dyn PdfBackend> = Arc::new(TextLayoutBackend::new(config.pdf_min_columns));
        Ok(Self {
            config,
            cache,
            pdf,
            sink: Arc::new(LogSink),
        })
    }

    pub fn with_pdf_backend(mut self, pdf: Arc<dyn PdfBackend>) -> Self {
        self.pdf = pdf;
        self
    }

    pub fn with_activity_sink(mut self, sink: Arc<dyn ActivitySink>) -> Self {
        self.sink = sink;
        self
    }

    /// Share an existing cache, e.g. between pipelines with different sinks.
    pub fn with_cache(mut self, cache: Arc<ExtractionCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<ExtractionCache> {
        &self.cache
    }

    /// Extract a document's tables. PDF results come from the cache when the
    /// same bytes were extracted before; CSV is always parsed afresh.
    pub fn extract(&self, document: &Document) -> Result<CachedTables> {
        loader::extract_with(document, |doc| {
            self.cache
                .get_or_extract(doc.id(), || loader::extract_pdf(doc, self.pdf.as_ref()))
        })
    }

    /// Extract and normalize a document into a [`Dataset`].
    pub fn load(&self, document: &Document) -> Result<Dataset> {
        let dataset = self
            .extract(document)
            .and_then(|tables| normalize(&tables))
            .inspect_err(|e| warn!("loading {} failed: {e}", document.name()))?;

        info!(
            "loaded {}: {} rows, {} columns ({} numeric)",
            document.name(),
            dataset.len(),
            dataset.all_columns().len(),
            dataset.numeric_columns().len()
        );
        Ok(dataset)
    }

    /// Resolve a chart and record a `chart_created` event.
    pub fn create_chart(
        &self,
        ctx: &SessionContext,
        dataset: &Dataset,
        request: &ChartRequest,
    ) -> Result<ChartSpec> {
        let spec = chart::resolve(dataset, request)?;
        self.sink.record(&ActivityEvent::ChartCreated {
            chart_kind: spec.kind,
            user: ctx.user.clone(),
        });
        Ok(spec)
    }

    /// Look up advice for `priority` and record a `recommendations_viewed` event.
    ///
    /// The dataset is accepted so that a caller can only ask for advice once a
    /// document has loaded; its contents do not affect the advice.
    pub fn recommendations(
        &self,
        ctx: &SessionContext,
        _dataset: &Dataset,
        priority: PriorityCategory,
    ) -> RecommendationSet {
        let set = recommend::recommend(priority);
        self.sink.record(&ActivityEvent::RecommendationsViewed {
            priority,
            user: ctx.user.clone(),
        });
        set
    }
}
