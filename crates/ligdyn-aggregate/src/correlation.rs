//! Correlation of per-residue contact counts with the experimental value.
use crate::fraction::{residue_sort_key, sort_residues};
use crate::group::SimulationData;
use ligdyn_io::InteractionType;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

pub const OVERALL: &str = "Overall";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationRow {
    pub interaction_type: String,
    pub residue: String,
    /// Pearson coefficient; `None` when either side has no variance.
    pub correlation: Option<f64>,
    /// Sample covariance.
    pub covariance: Option<f64>,
}

/// Pearson correlation and sample covariance of two equally long series.
pub fn pearson(x: &[f64], y: &[f64]) -> (Option<f64>, Option<f64>) {
    let n = x.len().min(y.len());
    if n < 2 {
        return (None, None);
    }
    let mean_x = x[..n].iter().sum::<f64>() / n as f64;
    let mean_y = y[..n].iter().sum::<f64>() / n as f64;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x[..n].iter().zip(&y[..n]) {
        let (dx, dy) = (a - mean_x, b - mean_y);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    let covariance = sxy / (n - 1) as f64;
    let correlation = (sxx > 0.0 && syy > 0.0).then(|| sxy / (sxx * syy).sqrt());
    (correlation, Some(covariance))
}

/// Rows for one interaction type (`None` = every type), sorted by decreasing
/// correlation with undefined values last.
pub fn correlate(simulations: &[SimulationData], filter: Option<InteractionType>) -> Vec<CorrelationRow> {
    let measured: Vec<(&SimulationData, f64)> = simulations
        .iter()
        .filter_map(|sim| sim.value.map(|value| (sim, value)))
        .collect();
    let values: Vec<f64> = measured.iter().map(|(_, value)| *value).collect();

    let counts: Vec<HashMap<String, usize>> = measured
        .iter()
        .map(|(sim, _)| {
            let mut counts = HashMap::new();
            for row in &sim.interactions {
                if filter.map_or(true, |t| row.record.interaction_type == t) {
                    *counts.entry(row.record.residue_label()).or_insert(0) += 1;
                }
            }
            counts
        })
        .collect();
    let residues = sort_residues(counts.iter().flat_map(|c| c.keys().cloned()));
    let label = filter.map_or_else(|| OVERALL.to_string(), |t| t.to_string());

    let mut rows: Vec<CorrelationRow> = residues
        .into_iter()
        .map(|residue| {
            let series: Vec<f64> = counts
                .iter()
                .map(|c| c.get(&residue).copied().unwrap_or(0) as f64)
                .collect();
            let (correlation, covariance) = pearson(&series, &values);
            CorrelationRow {
                interaction_type: label.clone(),
                residue,
                correlation,
                covariance,
            }
        })
        .collect();
    rows.sort_by(|a, b| match (a.correlation, b.correlation) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| residue_sort_key(&a.residue).cmp(&residue_sort_key(&b.residue))));
    rows
}

/// "Overall" followed by each interaction type present, by label.
pub fn correlation_table(simulations: &[SimulationData]) -> Vec<CorrelationRow> {
    let mut types: Vec<InteractionType> = simulations
        .iter()
        .flat_map(|sim| sim.interactions.iter().map(|row| row.record.interaction_type))
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    types.sort_by_key(|t| t.to_string());

    let mut rows = correlate(simulations, None);
    for itype in types {
        rows.extend(correlate(simulations, Some(itype)));
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fraction::tests::ser45_group;

    fn close(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn test_pearson() {
        let (r, cov) = pearson(&[3.0, 2.0, 0.0], &[7.5, 6.2, 5.0]);
        assert!(close(r, 0.9773555548504417));
        assert!(close(cov, 1.8666666666666667));

        let (r, cov) = pearson(&[1.0, 1.0, 1.0], &[7.5, 6.2, 5.0]);
        assert_eq!(r, None);
        assert!(close(cov, 0.0));
        assert_eq!(pearson(&[1.0], &[2.0]), (None, None));
    }

    #[test]
    fn test_overall_correlation() {
        let rows = correlate(&ser45_group(), None);
        let residues: Vec<&str> = rows.iter().map(|r| r.residue.as_str()).collect();
        // SER-45 counts [4, 2, 0]; LEU-112 [1, 0, 0]; ASP-9 [0, 0, 1]
        assert_eq!(residues, vec!["SER-45", "LEU-112", "ASP-9"]);
        assert!(rows.iter().all(|r| r.interaction_type == OVERALL));
        assert!(rows[0].correlation.unwrap() > rows[1].correlation.unwrap());
        assert!(rows[2].correlation.unwrap() < 0.0);
    }

    #[test]
    fn test_undefined_sorted_last() {
        let mut group = ser45_group();
        // every simulation now has exactly one ASP-9 contact
        for sim in group.iter_mut().take(2) {
            sim.interactions.push(crate::fraction::tests::contact(
                9,
                InteractionType::SaltBridge,
                "ASP",
                9,
            ));
        }
        let rows = correlate(&group, Some(InteractionType::SaltBridge));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].correlation, None);

        let table = correlation_table(&group);
        let last_overall = table.iter().filter(|r| r.interaction_type == OVERALL).last().unwrap();
        assert_eq!(last_overall.residue, "ASP-9");
        assert_eq!(last_overall.correlation, None);
    }
}
