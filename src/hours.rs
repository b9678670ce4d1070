use chrono::{DateTime, Datelike, FixedOffset, Offset, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Asia/Makassar has no daylight saving, UTC+8 all year.
pub const MAKASSAR_OFFSET_SECONDS: i32 = 8 * 3600;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessHours {
    pub utc_offset_seconds: i32,
    pub open_hour: u32,
    pub close_hour: u32,
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            utc_offset_seconds: MAKASSAR_OFFSET_SECONDS,
            open_hour: 9,
            close_hour: 20,
        }
    }
}

impl BusinessHours {
    fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_seconds)
            .or_else(|| FixedOffset::east_opt(MAKASSAR_OFFSET_SECONDS))
            .unwrap_or_else(|| Utc.fix())
    }

    /// Closed all day Sunday, otherwise open from `open_hour` until just before `close_hour`.
    pub fn is_open_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        let local = now.with_timezone(&self.offset());
        let day = local.weekday().num_days_from_sunday();
        let hour = local.hour();
        day != 0 && hour >= self.open_hour && hour < self.close_hour
    }

    pub fn is_open_now(&self) -> bool {
        self.is_open_at(&Utc::now())
    }

    /// Human wording of the schedule, e.g. "9 AM – 8 PM, daily except Sunday".
    pub fn describe(&self) -> String {
        format!(
            "{} – {}, daily except Sunday",
            clock_hour(self.open_hour),
            clock_hour(self.close_hour)
        )
    }
}

fn clock_hour(hour: u32) -> String {
    let suffix = if hour % 24 < 12 { "AM" } else { "PM" };
    match hour % 12 {
        0 => format!("12 {suffix}"),
        h => format!("{h} {suffix}"),
    }
}

pub fn is_open<Tz: TimeZone>(now: &DateTime<Tz>) -> bool {
    BusinessHours::default().is_open_at(now)
}

pub fn label(open: bool) -> &'static str {
    if open {
        "open"
    } else {
        "closed"
    }
}
