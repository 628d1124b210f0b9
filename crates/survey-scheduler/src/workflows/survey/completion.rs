use super::domain::SurveyWindow;
use chrono::NaiveDate;

/// Flags windows already satisfied by the latest endorsement.
///
/// An endorsement inside a window satisfies it, and any endorsement after a
/// window's anchor satisfies that earlier obligation as well.
pub fn mark_completed(
    mut windows: Vec<SurveyWindow>,
    last_endorse: Option<NaiveDate>,
) -> Vec<SurveyWindow> {
    for window in &mut windows {
        window.completed = match last_endorse {
            Some(endorsed) => window.contains(endorsed) || endorsed > window.anchor_date,
            None => false,
        };
    }
    windows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::survey::domain::SurveyCategory;
    use crate::workflows::survey::windows::build_windows;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn cycle() -> Vec<SurveyWindow> {
        build_windows(
            SurveyCategory::AnnualCycle,
            Some(date(2023, 6, 28)),
            Some(date(2028, 6, 28)),
        )
        .expect("windows build")
    }

    fn completed_flags(windows: &[SurveyWindow]) -> Vec<bool> {
        windows.iter().map(|window| window.completed).collect()
    }

    #[test]
    fn endorsement_inside_window_completes_it_and_all_earlier_windows() {
        let windows = mark_completed(cycle(), Some(date(2025, 7, 16)));
        assert_eq!(
            completed_flags(&windows),
            vec![true, true, false, false, false]
        );
    }

    #[test]
    fn early_endorsement_inside_open_range_counts() {
        let windows = mark_completed(cycle(), Some(date(2026, 4, 1)));
        assert_eq!(
            completed_flags(&windows),
            vec![true, true, true, false, false]
        );
    }

    #[test]
    fn missing_endorsement_completes_nothing() {
        let windows = mark_completed(cycle(), None);
        assert!(windows.iter().all(|window| !window.completed));
    }

    #[test]
    fn re_evaluation_overwrites_stale_flags() {
        let windows = mark_completed(cycle(), Some(date(2027, 7, 1)));
        assert_eq!(
            completed_flags(&windows),
            vec![true, true, true, true, false]
        );

        let windows = mark_completed(windows, Some(date(2024, 7, 1)));
        assert_eq!(
            completed_flags(&windows),
            vec![true, false, false, false, false]
        );
    }
}
