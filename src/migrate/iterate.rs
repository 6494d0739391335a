//! Partial-failure iteration and progress cadence.
//!
//! Entities are processed one at a time; an entity-scoped failure is
//! logged with enough context to identify the offending record and the
//! loop proceeds — a single bad record never aborts the batch.

use crate::error::Result;
use crate::report::Reporter;

/// Outcome counts for one iteration pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassCounts {
    /// Items that completed.
    pub processed: usize,
    /// Items skipped after an entity-scoped failure.
    pub skipped: usize,
}

/// Run `apply` over every item, skipping entity-scoped failures.
///
/// Only a non-entity-scoped error (a fatal precondition) propagates out.
pub fn try_each<T>(
    items: Vec<T>,
    describe: impl Fn(&T) -> String,
    mut apply: impl FnMut(T) -> Result<()>,
) -> Result<PassCounts> {
    let mut counts = PassCounts::default();
    for item in items {
        let label = describe(&item);
        match apply(item) {
            Ok(()) => counts.processed += 1,
            Err(err) if err.is_entity_scoped() => {
                counts.skipped += 1;
                tracing::warn!("skipping {label}: {err}");
            }
            Err(err) => return Err(err),
        }
    }
    Ok(counts)
}

/// Emits a "so far" line at a fixed cadence.
pub struct ProgressTicker<'a> {
    reporter: &'a dyn Reporter,
    label: &'static str,
    interval: usize,
    count: usize,
}

impl<'a> ProgressTicker<'a> {
    pub fn new(reporter: &'a dyn Reporter, label: &'static str, interval: usize) -> Self {
        Self {
            reporter,
            label,
            interval,
            count: 0,
        }
    }

    pub fn tick(&mut self) {
        self.count += 1;
        if self.interval > 0 && self.count % self.interval == 0 {
            self.reporter.report(&format!(
                "Migrated {} {} so far.",
                self.count, self.label
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::report::CollectingReporter;

    #[test]
    fn test_try_each_skips_entity_failures() {
        let items = vec![1, 2, 3, 4];
        let counts = try_each(
            items,
            |n| format!("item {n}"),
            |n| {
                if n == 3 {
                    Err(Error::MalformedRecord("bad".into()))
                } else {
                    Ok(())
                }
            },
        )
        .unwrap();

        assert_eq!(counts.processed, 3);
        assert_eq!(counts.skipped, 1);
    }

    #[test]
    fn test_try_each_propagates_fatal_errors() {
        let result = try_each(
            vec![1],
            |n| format!("item {n}"),
            |_| Err(Error::SourceUnavailable("gone".into())),
        );

        assert!(matches!(result, Err(Error::SourceUnavailable(_))));
    }

    #[test]
    fn test_ticker_cadence() {
        let reporter = CollectingReporter::new();
        let mut ticker = ProgressTicker::new(&reporter, "users", 2);

        for _ in 0..5 {
            ticker.tick();
        }

        assert_eq!(
            reporter.lines(),
            ["Migrated 2 users so far.", "Migrated 4 users so far."]
        );
    }
}
