//! World-load reload protocol: clear everything, then re-register every source.

use bestiary_content::DefinitionSource;
use bestiary_core::GameError;
use tracing::{error, info};

use crate::BestiaryError;
use crate::registry::{DefinitionRegistry, RegisteredEntry, SourceRef};

/// Outcome of one full reload.
#[derive(Debug, Default)]
pub struct ReloadReport {
    /// Definitions registered across all sources.
    pub loaded: usize,
    /// Registrations that replaced an earlier one with the same id.
    pub conflicts: Vec<BestiaryError>,
    /// Sources that contributed nothing because they failed to load.
    pub failures: Vec<BestiaryError>,
}

impl ReloadReport {
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty() && self.failures.is_empty()
    }
}

/// Clears `registry` and re-registers every definition of every source.
///
/// Each source is read in isolation; a failing source is logged and recorded in
/// the report while the remaining sources still load.
pub fn reload_all(registry: &mut DefinitionRegistry, sources: &[DefinitionSource]) -> ReloadReport {
    registry.clear();
    let mut report = ReloadReport::default();

    for source in sources {
        let records = match source.load() {
            Ok(records) => records,
            Err(e) => {
                let failure = BestiaryError::SourceRead {
                    owner: source.owner.clone(),
                    document: source.document.clone(),
                    reason: format!("{e:#}"),
                };
                error!(
                    target: "bestiary::reload",
                    owner = %source.owner,
                    code = failure.error_code(),
                    "{failure}"
                );
                report.failures.push(failure);
                continue;
            }
        };

        let source_ref = SourceRef::new(source.owner.clone(), source.base_dir.clone());
        for (id, definition) in records {
            let entry = RegisteredEntry::new(definition, source_ref.clone());
            if let Some(conflict) = registry.register(id, entry) {
                report.conflicts.push(conflict);
            }
            report.loaded += 1;
        }
    }

    info!(
        target: "bestiary::reload",
        loaded = report.loaded,
        registered = registry.len(),
        failed_sources = report.failures.len(),
        "reloaded definitions"
    );
    report
}
