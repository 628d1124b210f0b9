use super::domain::{SurveyCategory, SurveyOrdinal, SurveyWindow, ValidationError};
use chrono::{Duration, Months, NaiveDate};

/// Half-width of an annual window and lead time of terminal windows.
pub const WINDOW_DAYS: i64 = 90;

/// Length of a class cycle in years; annual anchors count back from its end.
pub const CYCLE_YEARS: u32 = 5;

/// Shifts `date` back by whole years on the same month/day.
///
/// Feb-29 anchors landing in a non-leap year clamp to Feb-28.
pub fn years_before(
    date: NaiveDate,
    years: u32,
    field: &'static str,
) -> Result<NaiveDate, ValidationError> {
    date.checked_sub_months(Months::new(years * 12))
        .ok_or(ValidationError::DateOutOfRange { field, date })
}

/// Shifts `date` by `days`, failing instead of overflowing the calendar.
fn shift_days(
    date: NaiveDate,
    days: i64,
    field: &'static str,
) -> Result<NaiveDate, ValidationError> {
    date.checked_add_signed(Duration::days(days))
        .ok_or(ValidationError::DateOutOfRange { field, date })
}

/// Builds the chronologically ordered survey windows for a certificate.
pub fn build_windows(
    category: SurveyCategory,
    issue_date: Option<NaiveDate>,
    valid_date: Option<NaiveDate>,
) -> Result<Vec<SurveyWindow>, ValidationError> {
    let (Some(issue_date), Some(valid_date)) = (issue_date, valid_date) else {
        return Ok(Vec::new());
    };

    if issue_date > valid_date {
        return Err(ValidationError::IssueAfterExpiry {
            issue_date,
            valid_date,
        });
    }

    let windows = match category {
        SurveyCategory::NoAnnualSurvey => Vec::new(),
        SurveyCategory::ConditionExpiry => vec![SurveyWindow {
            ordinal: SurveyOrdinal::ConditionExpiry,
            anchor_date: valid_date,
            open_date: issue_date,
            close_date: valid_date,
            completed: false,
        }],
        SurveyCategory::InitialStatutory => vec![SurveyWindow {
            ordinal: SurveyOrdinal::Initial,
            anchor_date: valid_date,
            open_date: shift_days(valid_date, -WINDOW_DAYS, "valid_date")?,
            close_date: valid_date,
            completed: false,
        }],
        SurveyCategory::AnnualCycle => {
            let mut windows = Vec::with_capacity(CYCLE_YEARS as usize);
            let offsets = (1..CYCLE_YEARS).rev();
            for (ordinal, years_back) in SurveyOrdinal::annual().into_iter().zip(offsets) {
                let anchor_date = years_before(valid_date, years_back, "valid_date")?;
                windows.push(SurveyWindow {
                    ordinal,
                    anchor_date,
                    open_date: shift_days(anchor_date, -WINDOW_DAYS, "valid_date")?,
                    close_date: shift_days(anchor_date, WINDOW_DAYS, "valid_date")?,
                    completed: false,
                });
            }
            windows.push(SurveyWindow {
                ordinal: SurveyOrdinal::Special,
                anchor_date: valid_date,
                open_date: shift_days(valid_date, -WINDOW_DAYS, "valid_date")?,
                close_date: valid_date,
                completed: false,
            });
            windows
        }
    };

    Ok(windows)
}
