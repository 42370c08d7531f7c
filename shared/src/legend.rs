use crate::colors::magnitude_color;

/// Magnitude grades the legend is keyed on.
pub const LEGEND_GRADES: [u32; 6] = [0, 1, 2, 3, 4, 5];

/// One legend row: a color swatch and an interval label.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendRow {
    pub color: &'static str,
    pub label: String,
}

/// Build the fixed legend: one row per grade, the swatch colored for the
/// band just above the grade value, labelled "g–g+1" (and "5+" for the
/// open-ended last row). Rebuilding is idempotent.
pub fn legend_rows() -> Vec<LegendRow> {
    LEGEND_GRADES
        .iter()
        .enumerate()
        .map(|(i, &grade)| {
            let label = match LEGEND_GRADES.get(i + 1) {
                Some(next) => format!("{grade}\u{2013}{next}"),
                None => format!("{grade}+"),
            };
            LegendRow {
                color: magnitude_color(f64::from(grade) + 1.0),
                label,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{LEGEND_GRADES, legend_rows};
    use crate::colors::magnitude_color;

    #[test]
    fn has_one_row_per_grade() {
        assert_eq!(legend_rows().len(), LEGEND_GRADES.len());
    }

    #[test]
    fn row_color_matches_the_band_above_the_grade() {
        for (row, &grade) in legend_rows().iter().zip(LEGEND_GRADES.iter()) {
            assert_eq!(row.color, magnitude_color(f64::from(grade) + 1.0));
        }
    }

    #[test]
    fn interval_labels() {
        let labels: Vec<_> = legend_rows().into_iter().map(|r| r.label).collect();
        assert_eq!(
            labels,
            ["0\u{2013}1", "1\u{2013}2", "2\u{2013}3", "3\u{2013}4", "4\u{2013}5", "5+"]
        );
    }

    #[test]
    fn rebuilding_yields_the_same_rows() {
        assert_eq!(legend_rows(), legend_rows());
    }
}
