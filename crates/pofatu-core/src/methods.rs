//! Methods from the methodological metadata sheet.
//!
//! Columns 0-11 describe the method, columns 12-16 a reference sample
//! measured with it. Rows are grouped by code and parameter; the first row
//! of a group describes the method and every later row adds one reference.

use pofatu_ingest::{GroupKey, RowGroup, SheetRow};
use pofatu_model::{Method, MethodReference};
use tracing::debug;

use crate::fields::is_placeholder;

const CODE: usize = 0;
const PARAMETER: usize = 1;
const METHOD_COLUMNS: usize = 12;
const REFERENCE_START: usize = METHOD_COLUMNS;

pub(crate) fn method_key() -> GroupKey {
    GroupKey::new([CODE, PARAMETER])
}

pub(crate) fn build_method(group: &RowGroup) -> Option<Method> {
    let (seed, rest) = group.rows.split_first()?;
    if is_placeholder(seed.get(CODE)) {
        debug!(row = seed.index, "method row without code skipped");
        return None;
    }

    let mut method = Method {
        code: seed.text(CODE).unwrap_or_default(),
        parameter: seed.text(PARAMETER).unwrap_or_default(),
        technique: seed.text(2),
        instrument: seed.text(3),
        laboratory: seed.text(4),
        analyst: seed.text(5),
        date: seed.text(6),
        comment: seed.text(7),
        detection_limit: seed.text(8),
        detection_limit_unit: seed.text(9),
        total_procedural_blank: seed.text(10),
        total_procedural_blank_unit: seed.text(11),
        references: Vec::new(),
    };
    for row in rest {
        if (0..METHOD_COLUMNS).any(|column| row.get(column).is_some_and(|v| Some(v) != seed.get(column))) {
            debug!(method = %method.key(), row = row.index, "method description differs from first row");
        }
        method.references.push(method_reference(row));
    }
    Some(method)
}

fn method_reference(row: &SheetRow) -> MethodReference {
    MethodReference {
        sample_name: row.text(REFERENCE_START),
        sample_measured_value: row.text(REFERENCE_START + 1),
        uncertainty: row.text(REFERENCE_START + 2),
        uncertainty_unit: row.text(REFERENCE_START + 3),
        number_of_measurements: row.text(REFERENCE_START + 4),
    }
}
