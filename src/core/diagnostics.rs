use crate::storage::catalog::{Catalog, LoadedTables};
use serde::Serialize;

#[derive(Debug, PartialEq)]
pub enum HealthStatus {
    Healthy,
    Degraded(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableReport {
    pub name: &'static str,
    pub loaded: bool,
    pub rows: usize,
}

pub struct Diagnostics;

impl Diagnostics {
    /// Healthy only when every table loaded. Missing tables degrade
    /// recommendations but never stop the service.
    pub fn check_health(catalog: &Catalog) -> HealthStatus {
        let missing: Vec<&str> = Self::tables(catalog)
            .into_iter()
            .filter(|t| !t.loaded)
            .map(|t| t.name)
            .collect();

        if missing.is_empty() {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded(format!("Tables unavailable: {}", missing.join(", ")))
        }
    }

    pub fn tables(catalog: &Catalog) -> Vec<TableReport> {
        let report = |name: &'static str, flag: LoadedTables, rows: usize| TableReport {
            name,
            loaded: catalog.loaded.contains(flag),
            rows,
        };

        vec![
            report("encoding", LoadedTables::ENCODING, catalog.encodings.len()),
            report("matrix", LoadedTables::MATRIX, catalog.matrix.len()),
            report("metadata", LoadedTables::METADATA, catalog.metadata.len()),
            report("narrative", LoadedTables::NARRATIVE, catalog.narratives.len()),
        ]
    }
}
