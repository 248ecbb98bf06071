use quantiv_core::{IdentityKey, Individual};

use crate::model::{LegacyRow, UnparsedRow};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LegacyOutcome {
    pub individuals: Vec<Individual>,
    pub unparsed_rows: Vec<UnparsedRow>,
    pub nameless_rows: usize,
}

/// Parse the comma-joined numeric field of a legacy row.
///
/// All-or-nothing: one bad token (or an empty field) yields `None`.
pub fn parse_data_string(data: &str) -> Option<Vec<f64>> {
    data.split(',')
        .map(|token| {
            token
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
        })
        .collect()
}

/// Build individuals from legacy rows, verbatim and in file order.
///
/// Rows without a last or first name are dropped. Rows whose numeric field
/// does not parse keep the individual with no observations.
pub fn individuals_from_legacy(rows: &[LegacyRow]) -> LegacyOutcome {
    let mut out = LegacyOutcome::default();

    for (row_idx, row) in rows.iter().enumerate() {
        let last_name = row.last_name.trim();
        let first_name = row.first_name.trim();
        if last_name.is_empty() || first_name.is_empty() {
            out.nameless_rows += 1;
            continue;
        }

        let data = row.data.trim();
        let observations = match parse_data_string(data) {
            Some(values) => values,
            None => {
                if !data.is_empty() {
                    log::debug!("legacy row {row_idx}: unreadable data '{data}'");
                    out.unparsed_rows.push(UnparsedRow {
                        row: row_idx,
                        identity: IdentityKey::new(last_name, first_name),
                        data: data.to_string(),
                    });
                }
                Vec::new()
            }
        };

        out.individuals.push(Individual::new(
            last_name,
            first_name,
            row.group_name.trim(),
            observations,
        ));
    }

    out
}
