use crate::analytics::DailyPoint;

/// Upper bound for the daily target/actual bar chart, never below one so an
/// empty range still draws axes.
pub fn daily_chart_max(points: &[DailyPoint]) -> u64 {
    points
        .iter()
        .map(|p| p.target_minutes.max(p.actual_minutes))
        .max()
        .unwrap_or(0)
        .max(1)
}

/// Bar width that fits `groups` groups of two bars into `width` columns.
pub fn bar_width(width: u16, groups: usize) -> u16 {
    if groups == 0 {
        return 1;
    }
    // two bars plus one gap per group
    let per_group = width as usize / groups;
    (per_group.saturating_sub(1) / 2).clamp(1, 8) as u16
}

/// One row of a ranked breakdown: label, share of the total in percent and
/// a bar length scaled to `bar_cols` against the largest value.
#[derive(Debug, Clone, PartialEq)]
pub struct ShareRow {
    pub label: String,
    pub seconds: u64,
    pub percent: f64,
    pub bar_len: usize,
}

pub fn share_rows(items: &[(String, u64)], bar_cols: usize) -> Vec<ShareRow> {
    let total: u64 = items.iter().map(|(_, v)| v).sum();
    let largest = items.iter().map(|(_, v)| *v).max().unwrap_or(0);
    items
        .iter()
        .map(|(label, secs)| ShareRow {
            label: label.clone(),
            seconds: *secs,
            percent: if total == 0 {
                0.0
            } else {
                *secs as f64 / total as f64 * 100.0
            },
            bar_len: if largest == 0 {
                0
            } else {
                ((*secs as f64 / largest as f64) * bar_cols as f64).round() as usize
            },
        })
        .collect()
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn point(target: u64, actual: u64) -> DailyPoint {
        DailyPoint {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            label: "01 Jan".into(),
            target_minutes: target,
            actual_minutes: actual,
        }
    }

    #[test]
    fn test_daily_chart_max() {
        assert_eq!(daily_chart_max(&[]), 1);
        assert_eq!(daily_chart_max(&[point(60, 0), point(30, 95)]), 95);
    }

    #[test]
    fn test_bar_width() {
        assert_eq!(bar_width(70, 7), 4);
        assert_eq!(bar_width(10, 31), 1);
        assert_eq!(bar_width(500, 1), 8);
        assert_eq!(bar_width(10, 0), 1);
    }

    #[test]
    fn test_share_rows() {
        let rows = share_rows(&[("Math".into(), 300), ("Art".into(), 100)], 20);
        assert_eq!(rows[0].bar_len, 20);
        assert_eq!(rows[1].bar_len, 7);
        assert!((rows[0].percent - 75.0).abs() < 1e-9);
        assert!(share_rows(&[], 20).is_empty());
    }

    #[test]
    fn test_format_label() {
        assert_eq!(format_label(1.0), "1");
        assert_eq!(format_label(1.26), "1.3");
    }
}
