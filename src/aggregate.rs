//! Accumulation of scanned records into per-repository and combined buckets.

use std::collections::BTreeMap;
use tracing::warn;

use crate::classify::normalize_type;
use crate::error::OrganizeError;
use crate::models::{Category, SourceRecord};
use crate::scan::ScanItem;

/// One ordered collection of records per category
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryBuckets {
    buckets: [Vec<SourceRecord>; 5],
}

impl CategoryBuckets {
    pub fn get(&self, category: Category) -> &[SourceRecord] {
        &self.buckets[category.index()]
    }

    pub fn push(&mut self, record: SourceRecord) {
        self.buckets[record.category.index()].push(record);
    }

    /// Total records across all categories
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate `(category, records)` in [`Category::ALL`] order, empty buckets included
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[SourceRecord])> {
        Category::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }

    fn sort_by_key<K, F>(&mut self, mut key: F)
    where
        K: Ord,
        F: FnMut(&SourceRecord) -> K,
    {
        for bucket in &mut self.buckets {
            bucket.sort_by_key(|record| key(record));
        }
    }
}

/// Record counts keyed by category, always holding all five categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCounts(BTreeMap<Category, usize>);

impl Default for CategoryCounts {
    fn default() -> Self {
        Self(Category::ALL.into_iter().map(|c| (c, 0)).collect())
    }
}

impl CategoryCounts {
    pub fn get(&self, category: Category) -> usize {
        self.0.get(&category).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, category: Category) {
        *self.0.entry(category).or_insert(0) += 1;
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }
}

/// Tallies for one repository
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryStats {
    pub url: Option<String>,
    /// Descriptor files seen, parsed or not
    pub files_found: usize,
    pub files_failed: usize,
    pub counts: CategoryCounts,
    /// Records per normalized declared type
    pub declared_types: BTreeMap<String, usize>,
}

impl RepositoryStats {
    /// Grand total of records for the repository
    pub fn total(&self) -> usize {
        self.counts.total()
    }
}

/// Tallies across the whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    pub repositories: BTreeMap<String, RepositoryStats>,
    pub combined: CategoryCounts,
}

impl Stats {
    pub fn grand_total(&self) -> usize {
        self.combined.total()
    }

    pub fn files_found(&self) -> usize {
        self.repositories.values().map(|r| r.files_found).sum()
    }

    pub fn files_failed(&self) -> usize {
        self.repositories.values().map(|r| r.files_failed).sum()
    }

    pub fn files_processed(&self) -> usize {
        self.repositories.values().map(RepositoryStats::total).sum()
    }
}

/// Fully accumulated state handed to the report writer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregate {
    pub per_repository: BTreeMap<String, CategoryBuckets>,
    pub combined: CategoryBuckets,
    pub stats: Stats,
}

/// Single-pass accumulator threaded across repositories.
///
/// Buckets are put into their final order by [`Aggregator::finish`]:
/// per-repository buckets by lower-cased `sourceName` then relative path,
/// combined buckets by repository name first. The output is therefore
/// independent of filesystem traversal order and of the order in which
/// repositories were absorbed.
#[derive(Debug, Default)]
pub struct Aggregator {
    state: Aggregate,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a repository so it gets outputs even when it holds no records
    pub fn begin_repository(&mut self, repository: &str, url: Option<&str>) {
        self.state
            .per_repository
            .entry(repository.to_string())
            .or_default();
        let stats = self
            .state
            .stats
            .repositories
            .entry(repository.to_string())
            .or_default();
        if url.is_some() {
            stats.url = url.map(str::to_string);
        }
    }

    /// Append one record to its repository bucket and the combined bucket
    pub fn add(&mut self, record: SourceRecord) {
        let repository = record.origin_repository.clone();
        self.begin_repository(&repository, None);

        if let Some(stats) = self.state.stats.repositories.get_mut(&repository) {
            stats.files_found += 1;
            stats.counts.increment(record.category);
            *stats
                .declared_types
                .entry(normalize_type(record.declared_type.as_deref()))
                .or_insert(0) += 1;
        }
        self.state.stats.combined.increment(record.category);

        self.state.combined.push(record.clone());
        if let Some(buckets) = self.state.per_repository.get_mut(&repository) {
            buckets.push(record);
        }
    }

    /// Count a descriptor file that could not be turned into a record
    pub fn add_failure(&mut self, repository: &str) {
        self.begin_repository(repository, None);
        if let Some(stats) = self.state.stats.repositories.get_mut(repository) {
            stats.files_found += 1;
            stats.files_failed += 1;
        }
    }

    /// Consume one repository's scan results in a single pass.
    ///
    /// Returns the per-file errors so the caller can report them.
    pub fn absorb<I>(&mut self, repository: &str, items: I) -> Vec<OrganizeError>
    where
        I: IntoIterator<Item = ScanItem>,
    {
        self.begin_repository(repository, None);

        let mut errors = Vec::new();
        for item in items {
            match item {
                Ok(record) => self.add(record),
                Err(e) => {
                    warn!("{e}");
                    self.add_failure(repository);
                    errors.push(e);
                }
            }
        }
        errors
    }

    /// Sort every bucket and hand over the accumulated state
    pub fn finish(mut self) -> Aggregate {
        for buckets in self.state.per_repository.values_mut() {
            buckets.sort_by_key(|r| {
                let (name, path) = r.sort_key();
                (name, path.to_string())
            });
        }
        self.state.combined.sort_by_key(|r| {
            let (name, path) = r.sort_key();
            (r.origin_repository.clone(), name, path.to_string())
        });
        self.state
    }
}

/// Aggregate a flat sequence of records in one pass
pub fn aggregate<I>(records: I) -> Aggregate
where
    I: IntoIterator<Item = SourceRecord>,
{
    let mut aggregator = Aggregator::new();
    for record in records {
        aggregator.add(record);
    }
    aggregator.finish()
}
