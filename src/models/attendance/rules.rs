//! 考勤规则
//!
//! 签到窗口、迟到判定、积分、二维码有效性与地理围栏，全部为纯函数。

use chrono::{DateTime, Duration, Utc};

use super::{
    AttendanceQrCode, AttendanceSession, AttendanceStats, AttendanceStatus, QrCodeStatus,
    SessionStatus,
};

/// 地球平均半径（米）
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

pub const MIN_WINDOW_MINUTES: i32 = 1;
pub const MAX_WINDOW_MINUTES: i32 = 60;
pub const MAX_LATE_THRESHOLD_MINUTES: i32 = 30;
pub const MIN_RADIUS_METERS: i32 = 10;
pub const MAX_RADIUS_METERS: i32 = 500;
pub const MIN_QR_VALIDITY_MINUTES: i64 = 1;
pub const MAX_QR_VALIDITY_MINUTES: i64 = 30;

/// 场次进行中且当前时间位于 [开始 - 窗口, 结束 + 窗口]
pub fn can_take_attendance(session: &AttendanceSession, now: DateTime<Utc>) -> bool {
    if session.status != SessionStatus::Active {
        return false;
    }
    let window = Duration::minutes(session.attendance_window_minutes as i64);
    session.scheduled_start - window <= now && now <= session.scheduled_end + window
}

/// 到达时间不晚于开始 + 迟到阈值记为出勤，否则迟到
pub fn classify_arrival(session: &AttendanceSession, arrival: DateTime<Utc>) -> AttendanceStatus {
    let threshold = Duration::minutes(session.late_threshold_minutes as i64);
    if arrival <= session.scheduled_start + threshold {
        AttendanceStatus::Present
    } else {
        AttendanceStatus::Late
    }
}

/// 迟到分钟数，按开始时间计算，不足一分钟按 0
pub fn minutes_late(session: &AttendanceSession, arrival: DateTime<Utc>) -> i64 {
    (arrival - session.scheduled_start).num_minutes().max(0)
}

/// 考勤积分
pub fn points_for(status: AttendanceStatus, minutes_late: i64) -> f64 {
    match status {
        AttendanceStatus::Present => 10.0,
        AttendanceStatus::Late => match minutes_late {
            m if m <= 5 => 8.0,
            m if m <= 10 => 6.0,
            m if m <= 15 => 4.0,
            _ => 2.0,
        },
        AttendanceStatus::Excused => 5.0,
        AttendanceStatus::Absent => 0.0,
    }
}

/// 二维码拒绝原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QrRejection {
    Inactive,
    Expired,
    UsageExhausted,
}

pub fn check_qr_code(qr: &AttendanceQrCode, now: DateTime<Utc>) -> Result<(), QrRejection> {
    if qr.status != QrCodeStatus::Active {
        return Err(QrRejection::Inactive);
    }
    if now > qr.expires_at {
        return Err(QrRejection::Expired);
    }
    if let Some(max) = qr.max_usage
        && qr.usage_count >= max
    {
        return Err(QrRejection::UsageExhausted);
    }
    Ok(())
}

/// 使用一次后的状态，达到上限即标记已用完
pub fn status_after_use(max_usage: Option<i32>, usage_count_after: i32) -> QrCodeStatus {
    match max_usage {
        Some(max) if usage_count_after >= max => QrCodeStatus::Used,
        _ => QrCodeStatus::Active,
    }
}

/// 两点间球面距离（米）
pub fn haversine_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();
    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_METERS * c
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationCheck {
    /// 场次未设置坐标
    NotRequired,
    Within,
    Missing,
    OutOfRange,
}

pub fn check_location(
    session: &AttendanceSession,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> LocationCheck {
    let (Some(s_lat), Some(s_lon)) = (session.latitude, session.longitude) else {
        return LocationCheck::NotRequired;
    };
    let (Some(lat), Some(lon)) = (latitude, longitude) else {
        return LocationCheck::Missing;
    };
    if haversine_meters(s_lat, s_lon, lat, lon) <= session.radius_meters as f64 {
        LocationCheck::Within
    } else {
        LocationCheck::OutOfRange
    }
}

/// 统计考勤状态，出勤率 = (出勤 + 迟到) / 总数 × 100
pub fn summarize<I>(statuses: I) -> AttendanceStats
where
    I: IntoIterator<Item = AttendanceStatus>,
{
    let mut stats = AttendanceStats::default();
    for status in statuses {
        stats.total += 1;
        match status {
            AttendanceStatus::Present => stats.present += 1,
            AttendanceStatus::Late => stats.late += 1,
            AttendanceStatus::Absent => stats.absent += 1,
            AttendanceStatus::Excused => stats.excused += 1,
        }
    }
    if stats.total > 0 {
        let rate = (stats.present + stats.late) as f64 / stats.total as f64 * 100.0;
        stats.attendance_rate = (rate * 100.0).round() / 100.0;
    }
    stats
}

/// 场次参数范围校验
pub fn validate_session_settings(
    scheduled_start: DateTime<Utc>,
    scheduled_end: DateTime<Utc>,
    window_minutes: i32,
    late_threshold_minutes: i32,
    radius_meters: i32,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<(), &'static str> {
    if scheduled_start >= scheduled_end {
        return Err("Session start must be before its end");
    }
    if !(MIN_WINDOW_MINUTES..=MAX_WINDOW_MINUTES).contains(&window_minutes) {
        return Err("Attendance window must be between 1 and 60 minutes");
    }
    if !(0..=MAX_LATE_THRESHOLD_MINUTES).contains(&late_threshold_minutes) {
        return Err("Late threshold must be between 0 and 30 minutes");
    }
    if !(MIN_RADIUS_METERS..=MAX_RADIUS_METERS).contains(&radius_meters) {
        return Err("Radius must be between 10 and 500 meters");
    }
    match (latitude, longitude) {
        (None, None) => Ok(()),
        (Some(lat), Some(lon)) if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) => {
            Ok(())
        }
        (Some(_), Some(_)) => Err("Coordinates are out of range"),
        _ => Err("Latitude and longitude must be given together"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::SessionType;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 6, hour, minute, 0).unwrap()
    }

    fn session(status: SessionStatus) -> AttendanceSession {
        AttendanceSession {
            id: 1,
            course_id: 1,
            instructor_id: 2,
            title: "Lecture 1".into(),
            session_type: SessionType::Lecture,
            scheduled_start: at(9, 0),
            scheduled_end: at(10, 0),
            actual_start: None,
            actual_end: None,
            status,
            attendance_window_minutes: 15,
            late_threshold_minutes: 10,
            latitude: None,
            longitude: None,
            radius_meters: 50,
            created_at: at(8, 0),
            updated_at: at(8, 0),
        }
    }

    fn qr(status: QrCodeStatus, max_usage: Option<i32>, usage_count: i32) -> AttendanceQrCode {
        AttendanceQrCode {
            id: 1,
            session_id: 1,
            code: "abc".into(),
            expires_at: at(9, 5),
            max_usage,
            usage_count,
            status,
            created_at: at(9, 0),
        }
    }

    #[test]
    fn test_attendance_window() {
        let s = session(SessionStatus::Active);
        assert!(can_take_attendance(&s, at(8, 45)));
        assert!(!can_take_attendance(&s, at(8, 44)));
        assert!(can_take_attendance(&s, at(10, 15)));
        assert!(!can_take_attendance(&s, at(10, 16)));
        assert!(!can_take_attendance(&session(SessionStatus::Scheduled), at(9, 0)));
    }

    #[test]
    fn test_classification_and_points() {
        let s = session(SessionStatus::Active);
        assert_eq!(classify_arrival(&s, at(9, 10)), AttendanceStatus::Present);
        assert_eq!(classify_arrival(&s, at(9, 11)), AttendanceStatus::Late);
        assert_eq!(minutes_late(&s, at(8, 50)), 0);
        assert_eq!(minutes_late(&s, at(9, 12)), 12);

        assert_eq!(points_for(AttendanceStatus::Present, 0), 10.0);
        assert_eq!(points_for(AttendanceStatus::Late, 5), 8.0);
        assert_eq!(points_for(AttendanceStatus::Late, 6), 6.0);
        assert_eq!(points_for(AttendanceStatus::Late, 10), 6.0);
        assert_eq!(points_for(AttendanceStatus::Late, 15), 4.0);
        assert_eq!(points_for(AttendanceStatus::Late, 16), 2.0);
        assert_eq!(points_for(AttendanceStatus::Excused, 0), 5.0);
        assert_eq!(points_for(AttendanceStatus::Absent, 0), 0.0);
    }

    #[test]
    fn test_qr_validity() {
        assert_eq!(check_qr_code(&qr(QrCodeStatus::Active, None, 99), at(9, 1)), Ok(()));
        assert_eq!(
            check_qr_code(&qr(QrCodeStatus::Active, None, 0), at(9, 6)),
            Err(QrRejection::Expired)
        );
        assert_eq!(
            check_qr_code(&qr(QrCodeStatus::Active, Some(2), 2), at(9, 1)),
            Err(QrRejection::UsageExhausted)
        );
        assert_eq!(
            check_qr_code(&qr(QrCodeStatus::Used, Some(2), 2), at(9, 1)),
            Err(QrRejection::Inactive)
        );
        assert_eq!(status_after_use(Some(2), 2), QrCodeStatus::Used);
        assert_eq!(status_after_use(Some(2), 1), QrCodeStatus::Active);
        assert_eq!(status_after_use(None, 500), QrCodeStatus::Active);
    }

    #[test]
    fn test_haversine() {
        assert!(haversine_meters(24.7136, 46.6753, 24.7136, 46.6753) < 1e-6);
        // 纬度相差 0.001 度约 111 米
        let d = haversine_meters(24.7136, 46.6753, 24.7146, 46.6753);
        assert!((d - 111.2).abs() < 1.0, "distance was {d}");
    }

    #[test]
    fn test_location_check() {
        let mut s = session(SessionStatus::Active);
        assert_eq!(check_location(&s, None, None), LocationCheck::NotRequired);

        s.latitude = Some(24.7136);
        s.longitude = Some(46.6753);
        assert_eq!(check_location(&s, None, None), LocationCheck::Missing);
        assert_eq!(
            check_location(&s, Some(24.7137), Some(46.6753)),
            LocationCheck::Within
        );
        assert_eq!(
            check_location(&s, Some(24.7146), Some(46.6753)),
            LocationCheck::OutOfRange
        );
    }

    #[test]
    fn test_summarize() {
        use AttendanceStatus::*;
        let stats = summarize([Present, Present, Late, Absent, Excused, Absent]);
        assert_eq!(stats.total, 6);
        assert_eq!(stats.present, 2);
        assert_eq!(stats.late, 1);
        assert_eq!(stats.absent, 2);
        assert_eq!(stats.excused, 1);
        assert_eq!(stats.attendance_rate, 50.0);
        assert_eq!(summarize(Vec::new()).attendance_rate, 0.0);
    }

    #[test]
    fn test_session_settings_validation() {
        assert!(validate_session_settings(at(9, 0), at(10, 0), 15, 10, 50, None, None).is_ok());
        assert!(validate_session_settings(at(10, 0), at(9, 0), 15, 10, 50, None, None).is_err());
        assert!(validate_session_settings(at(9, 0), at(10, 0), 0, 10, 50, None, None).is_err());
        assert!(validate_session_settings(at(9, 0), at(10, 0), 15, 31, 50, None, None).is_err());
        assert!(validate_session_settings(at(9, 0), at(10, 0), 15, 10, 5, None, None).is_err());
        assert!(
            validate_session_settings(at(9, 0), at(10, 0), 15, 10, 50, Some(1.0), None).is_err()
        );
    }
}
