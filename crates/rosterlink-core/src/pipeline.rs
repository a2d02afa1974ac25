//! End-to-end run: resolve a batch, then export its links

use serde::Serialize;

use crate::config::RosterConfig;
use crate::error::Result;
use crate::export::{ExportStore, ExportSummary, LinkRecord};
use crate::record::RawRecord;
use crate::resolve::{Pool, Resolution, ResolutionSummary, Resolver};

/// One batch of inputs
#[derive(Debug, Clone, Default)]
pub struct PipelineInput {
    pub queries: Vec<String>,
    pub pool: Pool,
    pub records: Vec<RawRecord>,
}

impl PipelineInput {
    /// Batch whose pool is the display labels of `records`
    pub fn from_records<S: AsRef<str>>(
        queries: Vec<String>,
        records: Vec<RawRecord>,
        name_fields: &[S],
    ) -> Self {
        let pool = Pool::from_records(&records, name_fields);
        Self {
            queries,
            pool,
            records,
        }
    }

    /// Replace the derived pool with an explicit name list
    pub fn with_pool<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pool = Pool::new(names);
        self
    }
}

/// Everything a run produced
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub resolution: Resolution,
    pub links: Vec<LinkRecord>,
    pub export: ExportSummary,
}

impl RunReport {
    pub fn summary(&self) -> ResolutionSummary {
        self.resolution.summary()
    }
}

/// Resolver and store wired from one configuration
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: RosterConfig,
    resolver: Resolver,
    store: ExportStore,
}

impl Pipeline {
    pub fn new(config: RosterConfig) -> Result<Self> {
        let resolver = Resolver::new(&config)?;
        let store = ExportStore::new(config.export.store_path.clone(), config.identity.clone());
        Ok(Self {
            config,
            resolver,
            store,
        })
    }

    pub fn config(&self) -> &RosterConfig {
        &self.config
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn store(&self) -> &ExportStore {
        &self.store
    }

    /// Resolve `input` and export every link.
    ///
    /// With `export.dry_run` set the store is only read. Only a failed store
    /// write aborts the run.
    pub fn run(&self, input: &PipelineInput) -> Result<RunReport> {
        let resolution = self
            .resolver
            .resolve(&input.queries, &input.pool, &input.records);

        let name_fields = self.config.records.name_fields.as_slice();
        let links: Vec<LinkRecord> = resolution
            .links
            .iter()
            .map(|link| LinkRecord::from_link(link, self.store.policy(), name_fields))
            .collect();

        let export = self.store.export_all(&links, self.config.export.dry_run)?;

        let summary = resolution.summary();
        tracing::info!(
            queries = summary.queries,
            exact = summary.exact,
            fuzzy = summary.fuzzy,
            unresolved = summary.unresolved,
            added = export.added,
            skipped = export.skipped,
            dry_run = export.dry_run,
            "run complete"
        );

        Ok(RunReport {
            resolution,
            links,
            export,
        })
    }
}
