//! Salon Settings Model
//!
//! Settings live in a key/value table. [`SalonSettings`] is the typed view
//! over those rows; operating hours are stored as a JSON document under
//! [`KEY_OPERATING_HOURS`].

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use super::Entity;

pub const KEY_SALON_NAME: &str = "salon_name";
pub const KEY_SALON_PHONE: &str = "salon_phone";
pub const KEY_SALON_ADDRESS: &str = "salon_address";
pub const KEY_OPERATING_HOURS: &str = "operating_hours";

/// One key/value settings row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

impl Entity for Setting {
    const TABLE: &'static str = "settings";
    const ID_COLUMN: &'static str = "key";
    type Fields = Setting;

    fn id(&self) -> &str {
        &self.key
    }
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}

/// Opening hours of one weekday
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
    #[serde(default)]
    pub closed: bool,
}

impl DayHours {
    pub fn open(start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            start,
            end,
            closed: false,
        }
    }

    pub fn closed() -> Self {
        Self {
            start: NaiveTime::MIN,
            end: NaiveTime::MIN,
            closed: true,
        }
    }

    /// Open for a non-empty window
    pub fn is_open(&self) -> bool {
        !self.closed && self.start < self.end
    }
}

/// Weekly operating hours
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingHours {
    pub monday: DayHours,
    pub tuesday: DayHours,
    pub wednesday: DayHours,
    pub thursday: DayHours,
    pub friday: DayHours,
    pub saturday: DayHours,
    pub sunday: DayHours,
}

impl Default for OperatingHours {
    /// Monday to Saturday 09:00-18:00, closed on Sunday
    fn default() -> Self {
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN);
        let six = NaiveTime::from_hms_opt(18, 0, 0).unwrap_or(NaiveTime::MIN);
        let workday = DayHours::open(nine, six);
        Self {
            monday: workday,
            tuesday: workday,
            wednesday: workday,
            thursday: workday,
            friday: workday,
            saturday: workday,
            sunday: DayHours::closed(),
        }
    }
}

impl OperatingHours {
    pub const WEEK: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    pub fn day(&self, weekday: Weekday) -> &DayHours {
        match weekday {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }

    pub fn day_mut(&mut self, weekday: Weekday) -> &mut DayHours {
        match weekday {
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
            Weekday::Sun => &mut self.sunday,
        }
    }
}

/// Lowercase english day name, also the translation key suffix (`common.days.*`)
pub fn weekday_key(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Problems found while reading settings rows; defaults are used instead
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsWarning {
    HoursMissing,
    HoursUnparsable(String),
}

/// Typed salon settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalonSettings {
    pub salon_name: String,
    pub phone: String,
    pub address: String,
    pub operating_hours: OperatingHours,
}

impl SalonSettings {
    /// Build from key/value rows. Unknown keys are ignored.
    pub fn from_rows(rows: &[Setting]) -> (Self, Vec<SettingsWarning>) {
        let mut settings = SalonSettings::default();
        let mut warnings = Vec::new();
        let mut hours_seen = false;

        for row in rows {
            match row.key.as_str() {
                KEY_SALON_NAME => settings.salon_name = row.value.clone(),
                KEY_SALON_PHONE => settings.phone = row.value.clone(),
                KEY_SALON_ADDRESS => settings.address = row.value.clone(),
                KEY_OPERATING_HOURS => {
                    hours_seen = true;
                    match serde_json::from_str::<OperatingHours>(&row.value) {
                        Ok(hours) => settings.operating_hours = hours,
                        Err(e) => warnings.push(SettingsWarning::HoursUnparsable(e.to_string())),
                    }
                }
                _ => {}
            }
        }

        if !hours_seen {
            warnings.push(SettingsWarning::HoursMissing);
        }
        (settings, warnings)
    }

    /// Rows to upsert
    pub fn to_rows(&self) -> Result<Vec<Setting>, serde_json::Error> {
        let row = |key: &str, value: String| Setting {
            key: key.to_string(),
            value,
        };
        Ok(vec![
            row(KEY_SALON_NAME, self.salon_name.clone()),
            row(KEY_SALON_PHONE, self.phone.clone()),
            row(KEY_SALON_ADDRESS, self.address.clone()),
            row(KEY_OPERATING_HOURS, serde_json::to_string(&self.operating_hours)?),
        ])
    }
}
