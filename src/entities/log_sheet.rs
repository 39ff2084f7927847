use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogSheet {
    pub id: i64,
    pub trip: i64,
    #[serde(flatten)]
    pub fields: LogSheetFields,
}

impl LogSheet {
    pub fn total_hours(&self) -> f64 {
        self.fields.total_hours()
    }
}

impl fmt::Display for LogSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "log sheet for {} covering {} hours",
            self.fields.date,
            self.total_hours()
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
pub struct LogSheetFields {
    pub date: NaiveDate,
    #[serde(default)]
    pub off_duty_hours: f64,
    #[serde(default)]
    pub sleeper_berth_hours: f64,
    #[serde(default)]
    pub driving_hours: f64,
    #[serde(default)]
    pub on_duty_hours: f64,
}

impl LogSheetFields {
    pub fn total_hours(&self) -> f64 {
        self.off_duty_hours + self.sleeper_berth_hours + self.driving_hours + self.on_duty_hours
    }
}

#[derive(Debug, Deserialize)]
pub struct NewLogSheet {
    pub trip: i64,
    #[serde(flatten)]
    pub fields: LogSheetFields,
}

impl Validate for NewLogSheet {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.fields.validate()
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct LogSheetChanges {
    pub trip: Option<i64>,
    pub date: Option<NaiveDate>,
    pub off_duty_hours: Option<f64>,
    pub sleeper_berth_hours: Option<f64>,
    pub driving_hours: Option<f64>,
    pub on_duty_hours: Option<f64>,
}

impl LogSheetChanges {
    pub fn apply(self, trip: &mut i64, fields: &mut LogSheetFields) {
        if let Some(trip_id) = self.trip {
            *trip = trip_id;
        }
        if let Some(date) = self.date {
            fields.date = date;
        }
        if let Some(hours) = self.off_duty_hours {
            fields.off_duty_hours = hours;
        }
        if let Some(hours) = self.sleeper_berth_hours {
            fields.sleeper_berth_hours = hours;
        }
        if let Some(hours) = self.driving_hours {
            fields.driving_hours = hours;
        }
        if let Some(hours) = self.on_duty_hours {
            fields.on_duty_hours = hours;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn log_sheet(off: f64, sleeper: f64, driving: f64, on: f64) -> LogSheet {
        LogSheet {
            id: 1,
            trip: 1,
            fields: LogSheetFields {
                date: NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
                off_duty_hours: off,
                sleeper_berth_hours: sleeper,
                driving_hours: driving,
                on_duty_hours: on,
            },
        }
    }

    #[test]
    fn total_hours_sums_all_duty_statuses() {
        assert_eq!(log_sheet(8.0, 2.0, 10.0, 4.0).total_hours(), 24.0);
        assert_eq!(log_sheet(0.0, 0.0, 0.0, 0.0).total_hours(), 0.0);
        assert_eq!(log_sheet(0.5, 0.25, 11.0, 2.25).total_hours(), 14.0);
    }

    #[test]
    fn hours_default_to_zero() {
        let sheet: NewLogSheet =
            serde_json::from_value(json!({ "trip": 4, "date": "2025-03-07" })).unwrap();

        assert_eq!(sheet.trip, 4);
        assert_eq!(sheet.fields.total_hours(), 0.0);
    }

    #[test]
    fn malformed_date_is_rejected() {
        let result =
            serde_json::from_value::<NewLogSheet>(json!({ "trip": 4, "date": "07/03/2025" }));

        assert!(result.is_err());
    }

    #[test]
    fn changes_only_touch_given_fields() {
        let mut sheet = log_sheet(8.0, 2.0, 10.0, 4.0);
        let changes: LogSheetChanges =
            serde_json::from_value(json!({ "driving_hours": 9.5 })).unwrap();

        changes.apply(&mut sheet.trip, &mut sheet.fields);

        assert_eq!(sheet.trip, 1);
        assert_eq!(sheet.fields.driving_hours, 9.5);
        assert_eq!(sheet.total_hours(), 23.5);
        assert_eq!(sheet.to_string(), "log sheet for 2025-03-07 covering 23.5 hours");
    }
}
