//! Whitelist of authorized plates, read once from a spreadsheet.

use std::collections::HashSet;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use log::{debug, error, info};

use crate::config::REGISTRY_COLUMN;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    plates: Vec<String>,
    index: HashSet<String>,
}

impl Registry {
    /// Builds a registry from raw values, normalizing them the way the loader does.
    pub fn from_plates<I, S>(plates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let plates: Vec<String> = plates
            .into_iter()
            .filter_map(|plate| normalize(plate.as_ref()))
            .collect();
        let index = plates.iter().cloned().collect();
        Self { plates, index }
    }

    /// Loads the registry, falling back to an empty one on any failure.
    ///
    /// Every detected plate is then reported as not registered, but the
    /// monitor keeps running.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(registry) => {
                info!(
                    "Loaded {} plates from {}",
                    registry.len(),
                    path.display()
                );
                debug!("Registered plates: {:?}", registry.plates());
                registry
            }
            Err(e) => {
                error!("Failed to load plates from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Reads the first worksheet and collects the non-empty values of the
    /// `Placa` column, in row order.
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self> {
        let mut workbook = open_workbook_auto(path.as_ref())?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| Error::Registry("the workbook has no worksheets".to_string()))??;

        let mut rows = range.rows();
        let header = rows
            .next()
            .ok_or_else(|| Error::MissingColumn(REGISTRY_COLUMN.to_string()))?;
        let column = header
            .iter()
            .position(|cell| matches!(cell, Data::String(name) if name == REGISTRY_COLUMN))
            .ok_or_else(|| Error::MissingColumn(REGISTRY_COLUMN.to_string()))?;

        let cells: Vec<&Data> = rows
            .map(|row| row.get(column).unwrap_or(&Data::Empty))
            .collect();
        let float_column = is_float_column(&cells);
        let values: Vec<String> = cells
            .into_iter()
            .filter_map(|cell| cell_to_string(cell, float_column))
            .collect();

        Ok(Self::from_plates(values))
    }

    pub fn contains(&self, plate: &str) -> bool {
        self.index.contains(plate)
    }

    pub fn plates(&self) -> &[String] {
        &self.plates
    }

    pub fn len(&self) -> usize {
        self.plates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plates.is_empty()
    }
}

fn normalize(raw: &str) -> Option<String> {
    let plate = raw.to_uppercase().trim().to_string();
    if plate.is_empty() {
        None
    } else {
        Some(plate)
    }
}

fn is_missing(cell: &Data) -> bool {
    matches!(cell, Data::Empty | Data::Error(_))
}

/// A dataframe column only turns whole numbers into floats when it is purely
/// numeric and holds at least one missing value.
fn is_float_column(cells: &[&Data]) -> bool {
    cells.iter().any(|cell| is_missing(cell))
        && cells
            .iter()
            .all(|cell| is_missing(cell) || matches!(cell, Data::Int(_) | Data::Float(_)))
}

/// String form of a cell as a dataframe would print it. Empty and error
/// cells count as missing.
fn cell_to_string(cell: &Data, float_column: bool) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) if float_column => Some(format!("{i}.0")),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 => {
            if float_column {
                Some(format!("{f:.1}"))
            } else {
                Some(format!("{f:.0}"))
            }
        }
        Data::Float(f) => Some(f.to_string()),
        Data::Bool(true) => Some("True".to_string()),
        Data::Bool(false) => Some("False".to_string()),
        other => Some(other.to_string()),
    }
}
