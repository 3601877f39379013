//! The analysis pipeline.
//!
//! ```text
//! bytes ──► entropy ─┐
//!       ──► PE normalize ──► packed ─┐
//! report ──► behavior alerts ────────┼──► trust score ──► AnalysisSummary
//! rules/metrics ──► ML assessment ───┘
//! ```
//!
//! Every stage has a defined result for bad input, so the synchronous entry
//! points return a summary rather than a `Result`; only decoding a report
//! document can fail.

use crate::core::artifact::{display_name, BinaryArtifact};
use crate::core::summary::AnalysisSummary;
use crate::core::Alert;
use crate::entropy::entropy_score;
use crate::error::Result;
use crate::hashing::{is_sha256_hex, sha256_digest};
use crate::ml::{self, MlAssessment, MlRequest, MlSource, RiskModel};
use crate::pe::{ObjectPeProvider, PeMetadata, PeMetadataProvider, PeNormalizer, ReportPeProvider};
use crate::strings::{extract_ascii_strings, extract_static_iocs};
use crate::triage::behavior::scan_report;
use crate::triage::config::AnalysisConfig;
use crate::triage::iocs::{extract_report_iocs, IocReport};
use crate::triage::packed::PackedHeuristic;
use crate::triage::report::{has_signers, parse_report, ReportMetrics};
use crate::triage::score::TrustScoreAggregator;
use rayon::prelude::*;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Results of collaborators that ran outside this crate.
#[derive(Debug, Clone, Default)]
pub struct ExternalFindings {
    /// Matched YARA rule names.
    pub yara_rules: Vec<String>,
    /// Sandbox behavior report for the same artifact.
    pub behavior_report: Option<Value>,
    pub cuckoo_score: Option<f64>,
    pub fuzzy_hash: Option<String>,
}

/// Everything computed before the ML call.
struct StaticStage {
    filename: String,
    sha256: String,
    size: u64,
    entropy: f64,
    fuzzy_hash: Option<String>,
    rules: Vec<String>,
    pe: PeMetadata,
    packed: bool,
    signed: bool,
    alerts: Vec<Alert>,
    iocs: IocReport,
    request: MlRequest,
}

pub struct Analyzer {
    config: AnalysisConfig,
    provider: Arc<dyn PeMetadataProvider>,
    model: Option<Arc<dyn RiskModel>>,
    normalizer: PeNormalizer,
    packed: PackedHeuristic,
    scorer: TrustScoreAggregator,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl Analyzer {
    /// An analyzer reading PE images with `object` and no ML model.
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            normalizer: PeNormalizer::new(&config.pe),
            packed: PackedHeuristic::new(&config.packed),
            scorer: TrustScoreAggregator::new(&config.scoring),
            provider: Arc::new(ObjectPeProvider::new()),
            model: None,
            config,
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn PeMetadataProvider>) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_model(mut self, model: Arc<dyn RiskModel>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn analyze_artifact(&self, artifact: &BinaryArtifact, findings: &ExternalFindings) -> AnalysisSummary {
        let span = crate::span_trace!("analyze_artifact", file = %artifact.display_name());
        let _guard = span.enter();

        let stage = self.static_stage(artifact, findings);
        let assessment = ml::assess(self.model.as_deref(), &stage.request, &self.config.ml);
        self.finish(stage, assessment)
    }

    /// Like [`Analyzer::analyze_artifact`], with the model call bounded by
    /// `ml.deadline_secs`.
    pub async fn analyze_artifact_with_deadline(
        &self,
        artifact: &BinaryArtifact,
        findings: &ExternalFindings,
    ) -> AnalysisSummary {
        let stage = self.static_stage(artifact, findings);
        let deadline = Duration::from_secs(self.config.ml.deadline_secs);
        let assessment =
            ml::assess_with_deadline(self.model.clone(), stage.request.clone(), &self.config.ml, deadline).await;
        self.finish(stage, assessment)
    }

    /// Analyze a sandbox report on its own. Header data comes from the
    /// report's `static.pe` block.
    pub fn analyze_report(&self, filename: &str, report: &Value) -> AnalysisSummary {
        let bytes = serde_json::to_vec(report).unwrap_or_default();
        self.report_pipeline(filename, report, &bytes)
    }

    pub fn analyze_report_bytes(&self, filename: &str, bytes: &[u8]) -> Result<AnalysisSummary> {
        let report = parse_report(bytes).map_err(|e| crate::log_error!(e, "report rejected"))?;
        Ok(self.report_pipeline(filename, &report, bytes))
    }

    /// Analyze independent artifacts in parallel. Output order matches input.
    pub fn analyze_batch(&self, items: &[(BinaryArtifact, ExternalFindings)]) -> Vec<AnalysisSummary> {
        info!(count = items.len(), "batch analysis");
        items
            .par_iter()
            .map(|(artifact, findings)| self.analyze_artifact(artifact, findings))
            .collect()
    }

    fn static_stage(&self, artifact: &BinaryArtifact, findings: &ExternalFindings) -> StaticStage {
        let data = artifact.bytes();
        let entropy = entropy_score(data);

        let (pe, alerts) = rayon::join(
            || self.normalizer.extract(self.provider.as_ref(), data),
            || findings.behavior_report.as_ref().map(scan_report).unwrap_or_default(),
        );
        let packed = self.packed.evaluate(&pe.header).packed;

        let mut iocs = findings
            .behavior_report
            .as_ref()
            .map(extract_report_iocs)
            .unwrap_or_default();
        let strings = extract_ascii_strings(data, self.config.strings.min_length);
        iocs.static_indicators = extract_static_iocs(&strings, self.config.strings.max_indicators);

        let sha256 = artifact.sha256();
        let rules: Vec<String> = findings
            .yara_rules
            .iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();
        let cuckoo_score = findings.cuckoo_score.or(iocs.score);
        let request = MlRequest::new(
            entropy,
            artifact.size(),
            sha256.clone(),
            artifact.display_name(),
            cuckoo_score,
            &rules,
            &pe.imports,
        );
        let signed = pe.signed == Some(true)
            || findings.behavior_report.as_ref().is_some_and(has_signers);

        StaticStage {
            filename: artifact.display_name().to_string(),
            sha256,
            size: artifact.size(),
            entropy,
            fuzzy_hash: findings.fuzzy_hash.clone(),
            rules,
            pe,
            packed,
            signed,
            alerts,
            iocs,
            request,
        }
    }

    fn report_pipeline(&self, filename: &str, report: &Value, raw: &[u8]) -> AnalysisSummary {
        let span = crate::span_trace!("analyze_report", file = %display_name(filename));
        let _guard = span.enter();

        let metrics = ReportMetrics::from_report(report);
        let (pe, alerts) = rayon::join(
            || match ReportPeProvider::new().describe_report(report) {
                Ok(header) => self.normalizer.metadata(&header),
                Err(e) => {
                    debug!(error = %e, "report carries no PE metadata");
                    PeMetadata::unparsed()
                }
            },
            || scan_report(report),
        );
        let packed = self.packed.evaluate(&pe.header).packed;

        let sha256 = metrics
            .sha256
            .clone()
            .filter(|h| is_sha256_hex(h))
            .unwrap_or_else(|| sha256_digest(raw));
        let size = metrics.size.unwrap_or(raw.len() as u64);
        let request = MlRequest::new(
            metrics.entropy,
            size,
            sha256.clone(),
            display_name(filename),
            metrics.cuckoo_score,
            &metrics.yara_rules,
            &pe.imports,
        );

        let stage = StaticStage {
            filename: display_name(filename).to_string(),
            sha256,
            size,
            entropy: metrics.entropy,
            fuzzy_hash: metrics.fuzzy_hash,
            rules: request.yara_hits.clone(),
            signed: metrics.signed || pe.signed == Some(true),
            pe,
            packed,
            alerts,
            iocs: extract_report_iocs(report),
            request,
        };
        let assessment = ml::assess(self.model.as_deref(), &stage.request, &self.config.ml);
        self.finish(stage, assessment)
    }

    fn finish(&self, stage: StaticStage, assessment: MlAssessment) -> AnalysisSummary {
        let blend = match assessment.source {
            MlSource::Model => true,
            MlSource::Fallback { .. } => self.config.scoring.blend_fallback_score,
        };
        let trust = self.scorer.aggregate(
            &stage.alerts,
            stage.signed,
            blend.then_some(assessment.risk_score),
        );

        info!(
            file = %stage.filename,
            entropy = stage.entropy,
            packed = stage.packed,
            alerts = stage.alerts.len(),
            ml_fallback = assessment.is_fallback(),
            trust = trust.value,
            risk = %trust.risk_level,
            "analysis complete"
        );

        let header = stage.pe.header;
        AnalysisSummary {
            binary_id: uuid::Uuid::new_v4().to_string(),
            filename: stage.filename,
            timestamp: chrono::Utc::now(),
            sha256: stage.sha256,
            fuzzy_hash: stage.fuzzy_hash,
            size: stage.size,
            entropy: stage.entropy,
            yara_matched: !stage.rules.is_empty(),
            matched_rules: stage.rules,
            ml_risk_score: assessment.risk_score,
            classification: assessment.classification,
            ml_source: assessment.source,
            machine_type: header.machine_type,
            entry_point: header.entry_point,
            image_base: header.image_base,
            subsystem: header.subsystem,
            sections: header.sections,
            packed: stage.packed,
            signed: stage.signed,
            trust_score: trust.value,
            risk_level: trust.risk_level,
            alerts: stage.alerts,
            imports: stage.pe.imports,
            exports: stage.pe.exports,
            iocs: stage.iocs,
        }
    }
}
