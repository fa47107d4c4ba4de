//! The full build: combine, clean, normalize and export every tier.

use dtp_merge::{TierSources, TokenSource};
use dtp_normalize::{clean_tool_tokens, Normalizer};
use dtp_resolve::BaseIndex;
use dtp_types::{PipelineConfig, Tier, TokenTree, Variant};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ExportResult;
use crate::exporter::{Artifact, PlatformExporter};
use crate::sink::TokenSink;

// ---------------------------------------------------------------------------
// BuildReport
// ---------------------------------------------------------------------------

/// What a build wrote.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BuildReport {
    pub artifacts: Vec<Artifact>,
    /// Tiers with no tokens at all, main or deprecated.
    pub skipped: Vec<Tier>,
}

impl BuildReport {
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Written locations in build order.
    pub fn locations(&self) -> Vec<&str> {
        self.artifacts.iter().map(|a| a.location.as_str()).collect()
    }
}

// ---------------------------------------------------------------------------
// BuildPipeline
// ---------------------------------------------------------------------------

/// Builds export artifacts from a token source.
pub struct BuildPipeline {
    config: PipelineConfig,
    normalizer: Normalizer,
    exporter: PlatformExporter,
}

impl BuildPipeline {
    pub fn new(config: PipelineConfig) -> ExportResult<Self> {
        let normalizer = Normalizer::with_default_stages(config.rem_base)?;
        let exporter = PlatformExporter::new(config.platforms.clone());
        Ok(Self {
            config,
            normalizer,
            exporter,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Build `tiers` from `source` into `sink`.
    ///
    /// The base index references are classified against is built once, from
    /// cleaned main and deprecated base tokens. Per tier the main artifact is written
    /// when the tier has tokens, and the deprecated artifact when the
    /// deprecated folder has tokens.
    pub fn run(
        &self,
        source: &dyn TokenSource,
        sink: &dyn TokenSink,
        tiers: &[Tier],
    ) -> ExportResult<BuildReport> {
        let base_index = base_index(source)?;
        let mut report = BuildReport::default();

        for &tier in tiers {
            let sources = TierSources::load(source, tier)?;
            let main = sources.main_export(self.config.include_deprecated_in_main);
            if main.is_empty() && sources.deprecated.is_empty() {
                debug!(tier = %tier, "no tokens, skipping tier");
                report.skipped.push(tier);
                continue;
            }
            if !main.is_empty() {
                let artifacts = self.build_variant(sink, &base_index, tier, Variant::Main, main)?;
                report.artifacts.extend(artifacts);
            }
            if !sources.deprecated.is_empty() {
                let artifacts = self.build_variant(
                    sink,
                    &base_index,
                    tier,
                    Variant::Deprecated,
                    sources.deprecated,
                )?;
                report.artifacts.extend(artifacts);
            }
        }

        info!(
            source = %source.describe(),
            sink = %sink.describe(),
            artifacts = report.len(),
            "build finished"
        );
        Ok(report)
    }

    fn build_variant(
        &self,
        sink: &dyn TokenSink,
        base_index: &BaseIndex,
        tier: Tier,
        variant: Variant,
        tree: TokenTree,
    ) -> ExportResult<Vec<Artifact>> {
        let cleaned = clean_tool_tokens(tree);
        let normalized = self.normalizer.normalize(&cleaned, base_index)?;
        self.exporter.export(sink, tier, variant, &normalized)
    }
}

/// Cleaned `merge(deprecated base, main base)`, so `{unit}` classifies the
/// same way it is exported.
pub fn base_index(source: &dyn TokenSource) -> ExportResult<BaseIndex> {
    let merged = TierSources::load(source, Tier::Base)?.merged();
    Ok(BaseIndex::from_tree(&clean_tool_tokens(merged)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{FsSink, InMemorySink};
    use dtp_merge::{FsTokenSource, InMemoryTokenSource};
    use dtp_types::TokenNode;
    use serde_json::json;

    fn source() -> InMemoryTokenSource {
        InMemoryTokenSource::new()
            .with_json(
                "base.json",
                json!({"base": {
                    "palette": {"blue": {"100": {"value": {"colorSpace": "oklch", "components": [0.5, 0.1, 250], "alpha": 1, "hex": "#3366cc"}, "type": "color"}}},
                    "base": {"unit": {"value": 8}}
                }}),
            )
            .with_json("deprecated/base.json", json!({"base": {"legacy": {"value": "#000", "type": "color"}}}))
            .with_json("sys/brand/canvas.json", json!({"brand": {"primary": {"value": "{palette.blue.100}", "type": "color"}}}))
            .with_json(
                "sys/shape.json",
                json!({"sys": {
                    "shape": {"x2": {"value": "{unit}"}, "x4": {"value": 4}},
                    "More styles": {"h1": {"value": 1}}
                }}),
            )
            .with_json("deprecated/sys/shape.json", json!({"sys": {"shape": {"x4": {"value": 5, "deprecated": true}, "old": {"value": "{legacy}"}}}}))
            .with_json("sys/type.json", json!({"sys": {"type": {"body": {"fontSize": {"value": 24, "description": "Body\ntext"}}}}}))
    }

    fn value_at(tree: &TokenTree, path: &str) -> serde_json::Value {
        tree.root()
            .lookup(path)
            .and_then(TokenNode::as_token)
            .map(|t| t.value().clone())
            .unwrap_or(serde_json::Value::Null)
    }

    #[test]
    fn base_index_covers_both_variants_after_cleanup() {
        use dtp_resolve::PathClassifier;
        let index = base_index(&source()).unwrap();
        assert!(index.is_base_token("unit"));
        assert!(index.is_base_token("legacy"));
        assert!(index.is_base_token("palette.blue.100"));
        assert!(!index.is_base_token("base.unit"));
        assert!(!index.is_base_token("shape.x2"));
    }

    #[test]
    fn builds_every_artifact() {
        let sink = InMemorySink::new();
        let pipeline = BuildPipeline::new(PipelineConfig::default()).unwrap();
        let report = pipeline.run(&source(), &sink, &Tier::ALL).unwrap();

        assert_eq!(
            report.locations(),
            vec![
                "base.json",
                "deprecated/base.json",
                "web/brand.json",
                "web/sys.json",
                "deprecated/web/sys.json"
            ]
        );
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn base_export_is_normalized_and_cleaned() {
        let sink = InMemorySink::new();
        BuildPipeline::new(PipelineConfig::default())
            .unwrap()
            .run(&source(), &sink, &[Tier::Base])
            .unwrap();

        let base = sink.get("base.json").unwrap();
        assert_eq!(value_at(&base, "base.palette.blue.100"), json!("oklch(0.5 0.1 250 / 1)"));
        assert_eq!(value_at(&base, "base.unit"), json!(8));
        assert!(base.root().lookup("base.base").is_none());
        // Deprecated tokens are folded into main.
        assert_eq!(value_at(&base, "base.legacy"), json!("#000"));

        let deprecated = sink.get("deprecated/base.json").unwrap();
        let keys: Vec<&str> = deprecated.root().keys().collect();
        assert_eq!(keys, vec!["_comment", "_description", "base"]);
    }

    #[test]
    fn sys_references_are_qualified_and_web_filtered() {
        let sink = InMemorySink::new();
        BuildPipeline::new(PipelineConfig::default())
            .unwrap()
            .run(&source(), &sink, &[Tier::Brand, Tier::Sys])
            .unwrap();

        let brand = sink.get("web/brand.json").unwrap();
        assert_eq!(value_at(&brand, "brand.primary"), json!("{base.palette.blue.100}"));

        let sys = sink.get("web/sys.json").unwrap();
        assert_eq!(value_at(&sys, "sys.shape.x2"), json!("{base.unit}"));
        assert!(sys.root().lookup("sys.shape.x4").is_none());
        assert!(sys.root().lookup("sys.More styles").is_none());
        assert_eq!(value_at(&sys, "sys.type.body.fontSize"), json!("1.5rem"));
        assert_eq!(value_at(&sys, "sys.shape.old"), json!("{base.legacy}"));

        let deprecated = sink.get("deprecated/web/sys.json").unwrap();
        assert_eq!(value_at(&deprecated, "sys.shape.x4"), json!(5));
        assert!(deprecated.root().lookup("sys.shape.x2").is_none());
    }

    #[test]
    fn deprecated_can_be_kept_out_of_main() {
        let sink = InMemorySink::new();
        let config = PipelineConfig {
            include_deprecated_in_main: false,
            ..PipelineConfig::default()
        };
        BuildPipeline::new(config)
            .unwrap()
            .run(&source(), &sink, &[Tier::Base])
            .unwrap();
        let base = sink.get("base.json").unwrap();
        assert!(base.root().lookup("base.legacy").is_none());
    }

    #[test]
    fn empty_tiers_are_skipped() {
        let sink = InMemorySink::new();
        let source = InMemoryTokenSource::new().with_json("base.json", json!({"base": {"unit": {"value": 8}}}));
        let report = BuildPipeline::new(PipelineConfig::default())
            .unwrap()
            .run(&source, &sink, &Tier::ALL)
            .unwrap();
        assert_eq!(report.locations(), vec!["base.json"]);
        assert_eq!(report.skipped, vec![Tier::Brand, Tier::Sys]);
    }

    #[test]
    fn builds_from_and_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let tokens = dir.path().join("tokens");
        std::fs::create_dir_all(tokens.join("sys")).unwrap();
        std::fs::write(tokens.join("base.json"), r#"{"base": {"unit": {"value": 8}}}"#).unwrap();
        std::fs::write(
            tokens.join("sys/space.json"),
            r#"{"sys": {"space": {"x1": {"value": "{unit}"}, "half": {"value": 4}}}}"#,
        )
        .unwrap();

        let export = dir.path().join("export");
        BuildPipeline::new(PipelineConfig::default())
            .unwrap()
            .run(&FsTokenSource::new(&tokens), &FsSink::new(&export), &Tier::ALL)
            .unwrap();

        let sys = std::fs::read_to_string(export.join("web/sys.json")).unwrap();
        let sys = TokenTree::parse(&sys).unwrap();
        assert_eq!(value_at(&sys, "sys.space.x1"), json!("{base.unit}"));
        assert!(sys.root().lookup("sys.space.half").is_none());
        assert!(export.join("base.json").is_file());
    }
}
