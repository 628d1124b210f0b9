use super::domain::{ShipContext, SurveyOrdinal, SurveyWindow};
use chrono::NaiveDate;

pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// First window, in anchor order, that is still outstanding.
pub fn resolve(windows: &[SurveyWindow]) -> Option<&SurveyWindow> {
    windows.iter().find(|window| !window.completed)
}

/// Regulatory name for the resolved window.
///
/// The 3rd annual slot doubles as the intermediate survey until the ship
/// records an intermediate survey before that slot's anchor.
pub fn survey_type(window: &SurveyWindow, ship: &ShipContext) -> &'static str {
    match window.ordinal {
        SurveyOrdinal::ThirdAnnual => match ship.last_intermediate_survey {
            Some(done) if done < window.anchor_date => SurveyOrdinal::ThirdAnnual.label(),
            _ => "Intermediate Survey",
        },
        ordinal => ordinal.label(),
    }
}

pub fn display(ordinal: SurveyOrdinal, date: NaiveDate) -> String {
    let formatted = date.format(DISPLAY_DATE_FORMAT).to_string();
    match ordinal.tolerance_suffix() {
        Some(suffix) => format!("{formatted} {suffix}"),
        None => formatted,
    }
}
