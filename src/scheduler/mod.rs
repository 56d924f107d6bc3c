//! 贪心排课
//!
//! 按工作时间生成每周的小时格，按优先级依次为每门课挑选得分最高、
//! 且不与教师、学生组、教室冲突的时间格。排不下的课整体失败，不做部分安排。
//!
//! - `slots`: 工作时间与时间格
//! - `request`: 排课请求与约束
//! - `engine`: 约束检查与贪心选择
//! - `report`: 统计、优化得分与建议

pub mod engine;
pub mod report;
pub mod request;
pub mod slots;

pub use engine::{FailedRequest, ScheduledSession, Scheduler};
pub use report::{ScheduleReport, ScheduleStatistics, TimeDistribution};
pub use request::{SchedulingConstraint, SchedulingRequest};
pub use slots::{TimeSlot, WorkingHours};
