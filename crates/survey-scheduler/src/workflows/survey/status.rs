use super::domain::{SurveyStatus, SurveyWindow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Day counts that move a pending survey between status bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusThresholds {
    pub due_soon_days: i64,
    pub critical_days: i64,
    /// Days past an annual window's close after which it escalates to critical.
    pub badly_overdue_days: i64,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            due_soon_days: 30,
            critical_days: 7,
            badly_overdue_days: 30,
        }
    }
}

/// What the status is measured against.
#[derive(Debug, Clone, Copy)]
pub enum StatusTarget<'a> {
    /// No usable validity data.
    NotApplicable,
    /// Nothing pending; only the certificate expiry matters.
    Expiry(NaiveDate),
    /// An outstanding window on a certificate expiring at `valid_date`.
    Window {
        window: &'a SurveyWindow,
        valid_date: NaiveDate,
    },
}

pub fn days_until(date: NaiveDate, today: NaiveDate) -> i64 {
    (date - today).num_days()
}

pub fn classify_status(
    target: StatusTarget<'_>,
    today: NaiveDate,
    thresholds: &StatusThresholds,
) -> SurveyStatus {
    match target {
        StatusTarget::NotApplicable => SurveyStatus::NotApplicable,
        StatusTarget::Expiry(valid_date) => {
            if today > valid_date {
                SurveyStatus::Overdue
            } else {
                SurveyStatus::Valid
            }
        }
        StatusTarget::Window { window, valid_date } => {
            if today > valid_date {
                return SurveyStatus::Overdue;
            }
            classify_window(window, today, thresholds)
        }
    }
}

fn classify_window(
    window: &SurveyWindow,
    today: NaiveDate,
    thresholds: &StatusThresholds,
) -> SurveyStatus {
    let days = days_until(window.close_date, today);

    if days < 0 {
        if window.ordinal.is_annual() && days < -thresholds.badly_overdue_days {
            return SurveyStatus::Critical;
        }
        return SurveyStatus::Overdue;
    }

    if days <= thresholds.critical_days {
        SurveyStatus::Critical
    } else if days <= thresholds.due_soon_days {
        SurveyStatus::DueSoon
    } else {
        SurveyStatus::Valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::survey::domain::SurveyOrdinal;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn annual(anchor: NaiveDate) -> SurveyWindow {
        SurveyWindow {
            ordinal: SurveyOrdinal::SecondAnnual,
            anchor_date: anchor,
            open_date: anchor - Duration::days(90),
            close_date: anchor + Duration::days(90),
            completed: false,
        }
    }

    fn special(valid_date: NaiveDate) -> SurveyWindow {
        SurveyWindow {
            ordinal: SurveyOrdinal::Special,
            anchor_date: valid_date,
            open_date: valid_date - Duration::days(90),
            close_date: valid_date,
            completed: false,
        }
    }

    fn status_on(window: &SurveyWindow, valid_date: NaiveDate, today: NaiveDate) -> SurveyStatus {
        classify_status(
            StatusTarget::Window { window, valid_date },
            today,
            &StatusThresholds::default(),
        )
    }

    #[test]
    fn annual_window_bands() {
        let valid_date = date(2028, 6, 28);
        let window = annual(date(2025, 6, 28));
        let close = window.close_date;

        assert_eq!(status_on(&window, valid_date, close - Duration::days(31)), SurveyStatus::Valid);
        assert_eq!(status_on(&window, valid_date, close - Duration::days(30)), SurveyStatus::DueSoon);
        assert_eq!(status_on(&window, valid_date, close - Duration::days(8)), SurveyStatus::DueSoon);
        assert_eq!(status_on(&window, valid_date, close - Duration::days(7)), SurveyStatus::Critical);
        assert_eq!(status_on(&window, valid_date, close), SurveyStatus::Critical);
        assert_eq!(status_on(&window, valid_date, close + Duration::days(1)), SurveyStatus::Overdue);
        assert_eq!(status_on(&window, valid_date, close + Duration::days(30)), SurveyStatus::Overdue);
        assert_eq!(status_on(&window, valid_date, close + Duration::days(31)), SurveyStatus::Critical);
    }

    #[test]
    fn special_window_has_no_grace_and_no_escalation() {
        let valid_date = date(2028, 6, 28);
        let window = special(valid_date);

        assert_eq!(status_on(&window, valid_date, date(2028, 6, 21)), SurveyStatus::Critical);
        assert_eq!(status_on(&window, valid_date, date(2028, 7, 1)), SurveyStatus::Overdue);
        assert_eq!(status_on(&window, valid_date, date(2028, 12, 1)), SurveyStatus::Overdue);
    }

    #[test]
    fn expired_certificate_is_overdue_even_with_a_pending_annual_window() {
        let window = annual(date(2024, 6, 28));
        assert_eq!(
            status_on(&window, date(2025, 1, 1), date(2025, 2, 1)),
            SurveyStatus::Overdue
        );
    }

    #[test]
    fn expiry_and_not_applicable_targets() {
        let thresholds = StatusThresholds::default();
        let today = date(2026, 1, 1);
        assert_eq!(
            classify_status(StatusTarget::Expiry(date(2026, 1, 1)), today, &thresholds),
            SurveyStatus::Valid
        );
        assert_eq!(
            classify_status(StatusTarget::Expiry(date(2025, 12, 31)), today, &thresholds),
            SurveyStatus::Overdue
        );
        assert_eq!(
            classify_status(StatusTarget::NotApplicable, today, &thresholds),
            SurveyStatus::NotApplicable
        );
    }

    #[test]
    fn custom_thresholds_shift_the_bands() {
        let thresholds = StatusThresholds {
            due_soon_days: 60,
            critical_days: 14,
            badly_overdue_days: 10,
        };
        let valid_date = date(2028, 6, 28);
        let window = annual(date(2025, 6, 28));
        let close = window.close_date;
        let target = StatusTarget::Window {
            window: &window,
            valid_date,
        };

        assert_eq!(
            classify_status(target, close - Duration::days(45), &thresholds),
            SurveyStatus::DueSoon
        );
        assert_eq!(
            classify_status(target, close - Duration::days(14), &thresholds),
            SurveyStatus::Critical
        );
        assert_eq!(
            classify_status(target, close + Duration::days(11), &thresholds),
            SurveyStatus::Critical
        );
    }
}
