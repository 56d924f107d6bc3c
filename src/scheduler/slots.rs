use serde::{Deserialize, Serialize};

use crate::config::SchedulerConfig;
use crate::errors::{Result, UniSystemError};

/// 每个时间格的长度（分钟）
pub const SLOT_MINUTES: u16 = 60;

/// 一周中的一个时间段，day 取 0..=6（0 为周日），时间为当天分钟数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    pub day: u8,
    #[serde(with = "hhmm")]
    pub start: u16,
    #[serde(with = "hhmm")]
    pub end: u16,
}

impl TimeSlot {
    pub fn new(day: u8, start: u16, end: u16) -> Self {
        Self { day, start, end }
    }

    pub fn duration(&self) -> u16 {
        self.end.saturating_sub(self.start)
    }

    /// 同一天且区间相交（首尾相接不算）
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.day == other.day && self.start < other.end && self.end > other.start
    }

    pub fn is_valid(&self) -> bool {
        self.day <= 6 && self.start < self.end && self.end <= 24 * 60
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "day {} {}-{}",
            self.day,
            format_hhmm(self.start),
            format_hhmm(self.end)
        )
    }
}

/// 工作时间
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingHours {
    pub day_start: u16,
    pub day_end: u16,
    pub working_days: Vec<u8>,
    /// (开始, 结束) 分钟数
    pub breaks: Vec<(u16, u16)>,
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            day_start: 8 * 60,
            day_end: 17 * 60,
            working_days: vec![0, 1, 2, 3, 4],
            breaks: vec![(12 * 60, 13 * 60)],
        }
    }
}

impl WorkingHours {
    pub fn from_config(config: &SchedulerConfig) -> Result<Self> {
        let day_start = parse_hhmm(&config.day_start).map_err(UniSystemError::validation)?;
        let day_end = parse_hhmm(&config.day_end).map_err(UniSystemError::validation)?;
        if day_start >= day_end {
            return Err(UniSystemError::validation(
                "scheduler.day_start must be before scheduler.day_end",
            ));
        }
        if let Some(day) = config.working_days.iter().find(|d| **d > 6) {
            return Err(UniSystemError::validation(format!(
                "Invalid working day {day}, expected 0..=6"
            )));
        }

        let mut breaks = Vec::with_capacity(config.breaks.len());
        for (start, end) in &config.breaks {
            let start = parse_hhmm(start).map_err(UniSystemError::validation)?;
            let end = parse_hhmm(end).map_err(UniSystemError::validation)?;
            if start >= end {
                return Err(UniSystemError::validation(format!(
                    "Break {}-{} ends before it starts",
                    format_hhmm(start),
                    format_hhmm(end)
                )));
            }
            breaks.push((start, end));
        }

        Ok(Self {
            day_start,
            day_end,
            working_days: config.working_days.clone(),
            breaks,
        })
    }

    /// 分钟数落在某个休息时段内时返回该时段结束
    fn break_containing(&self, minute: u16) -> Option<u16> {
        self.breaks
            .iter()
            .find(|(start, end)| *start <= minute && minute < *end)
            .map(|(_, end)| *end)
    }

    /// 与 [start, end) 相交的第一个休息时段的结束
    fn break_overlapping(&self, start: u16, end: u16) -> Option<u16> {
        self.breaks
            .iter()
            .find(|(b_start, b_end)| *b_start < end && start < *b_end)
            .map(|(_, b_end)| *b_end)
    }
}

/// 生成每周的小时格
///
/// 每个工作日从 day_start 起步，游标进入休息时段时跳到休息结束，
/// 只输出结束时间不晚于 day_end 且不跨越休息时段的格子。
pub fn generate_time_slots(hours: &WorkingHours) -> Vec<TimeSlot> {
    let mut slots = Vec::new();
    for &day in &hours.working_days {
        let mut cursor = hours.day_start;
        while cursor + SLOT_MINUTES <= hours.day_end {
            if let Some(resume) = hours.break_containing(cursor) {
                cursor = resume;
                continue;
            }
            let end = cursor + SLOT_MINUTES;
            if let Some(resume) = hours.break_overlapping(cursor, end) {
                cursor = resume;
                continue;
            }
            slots.push(TimeSlot::new(day, cursor, end));
            cursor = end;
        }
    }
    slots
}

/// 解析 "HH:MM"
pub fn parse_hhmm(value: &str) -> std::result::Result<u16, String> {
    let (h, m) = value
        .trim()
        .split_once(':')
        .ok_or_else(|| format!("Invalid time '{value}', expected HH:MM"))?;
    let hours: u16 = h
        .parse()
        .map_err(|_| format!("Invalid hour in '{value}'"))?;
    let minutes: u16 = m
        .parse()
        .map_err(|_| format!("Invalid minute in '{value}'"))?;
    if hours > 24 || minutes > 59 || (hours == 24 && minutes > 0) {
        return Err(format!("Time '{value}' is out of range"));
    }
    Ok(hours * 60 + minutes)
}

pub fn format_hhmm(minutes: u16) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

mod hhmm {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(minutes: &u16, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_hhmm(*minutes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u16, D::Error> {
        let value = String::deserialize(deserializer)?;
        super::parse_hhmm(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid() {
        let slots = generate_time_slots(&WorkingHours::default());
        assert_eq!(slots.len(), 40);

        let sunday: Vec<_> = slots.iter().filter(|s| s.day == 0).collect();
        assert_eq!(sunday.len(), 8);
        assert_eq!(sunday[0].start, 8 * 60);
        assert_eq!(sunday.last().map(|s| s.end), Some(17 * 60));
        // 午休不排课
        assert!(sunday.iter().all(|s| s.start != 12 * 60));
        assert!(slots.iter().all(|s| s.day <= 4));
    }

    #[test]
    fn test_break_not_on_hour_boundary() {
        let hours = WorkingHours {
            day_start: 8 * 60,
            day_end: 12 * 60,
            working_days: vec![1],
            breaks: vec![(9 * 60 + 30, 10 * 60)],
        };
        let slots = generate_time_slots(&hours);
        let starts: Vec<u16> = slots.iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![8 * 60, 10 * 60, 11 * 60]);
    }

    #[test]
    fn test_overlap() {
        let a = TimeSlot::new(1, 9 * 60, 10 * 60);
        assert!(a.overlaps(&TimeSlot::new(1, 9 * 60 + 30, 10 * 60 + 30)));
        assert!(!a.overlaps(&TimeSlot::new(1, 10 * 60, 11 * 60)));
        assert!(!a.overlaps(&TimeSlot::new(2, 9 * 60, 10 * 60)));
    }

    #[test]
    fn test_parse_and_serde() {
        assert_eq!(parse_hhmm("08:30"), Ok(510));
        assert!(parse_hhmm("8").is_err());
        assert!(parse_hhmm("25:00").is_err());

        let slot: TimeSlot =
            serde_json::from_str(r#"{"day":2,"start":"13:00","end":"14:00"}"#).unwrap();
        assert_eq!(slot, TimeSlot::new(2, 780, 840));
        let json = serde_json::to_string(&slot).unwrap();
        assert!(json.contains("\"start\":\"13:00\""));
    }

    #[test]
    fn test_from_config() {
        let config = SchedulerConfig {
            day_start: "08:00".into(),
            day_end: "17:00".into(),
            working_days: vec![0, 1, 2, 3, 4],
            breaks: vec![("12:00".into(), "13:00".into())],
        };
        assert_eq!(
            WorkingHours::from_config(&config).unwrap(),
            WorkingHours::default()
        );

        let bad = SchedulerConfig {
            day_start: "17:00".into(),
            ..config
        };
        assert!(WorkingHours::from_config(&bad).is_err());
    }
}
