//! 课表存储操作

use super::SeaOrmStorage;
use crate::entity::schedule_entries::{ActiveModel, Column, Entity as ScheduleEntries};
use crate::errors::{Result, UniSystemError};
use crate::models::schedules::{NewScheduleEntry, ScheduleEntry, ScheduleListParams};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 在一个事务内清空学期课表并写入新结果
    pub async fn replace_schedule_entries_impl(
        &self,
        semester_id: i64,
        entries: Vec<NewScheduleEntry>,
    ) -> Result<Vec<ScheduleEntry>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| UniSystemError::from_db("开启事务失败", e))?;

        ScheduleEntries::delete_many()
            .filter(Column::SemesterId.eq(semester_id))
            .exec(&txn)
            .await
            .map_err(|e| UniSystemError::from_db("清空学期课表失败", e))?;

        let now = chrono::Utc::now().timestamp();
        let mut saved = Vec::with_capacity(entries.len());
        for entry in entries {
            let model = ActiveModel {
                semester_id: Set(entry.semester_id),
                course_id: Set(entry.course_id),
                teacher_id: Set(entry.teacher_id),
                day: Set(entry.slot.day as i32),
                start_minute: Set(entry.slot.start as i32),
                end_minute: Set(entry.slot.end as i32),
                room_type: Set(entry.room_type),
                room_id: Set(entry.room_id),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| UniSystemError::from_db("写入课表失败", e))?;
            saved.push(model.into_schedule_entry());
        }

        txn.commit()
            .await
            .map_err(|e| UniSystemError::from_db("提交事务失败", e))?;

        Ok(saved)
    }

    pub async fn list_schedule_entries_impl(
        &self,
        query: ScheduleListParams,
    ) -> Result<Vec<ScheduleEntry>> {
        let mut select = ScheduleEntries::find();
        if let Some(semester_id) = query.semester_id {
            select = select.filter(Column::SemesterId.eq(semester_id));
        }
        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }
        if let Some(course_id) = query.course_id {
            select = select.filter(Column::CourseId.eq(course_id));
        }

        let items = select
            .order_by_asc(Column::Day)
            .order_by_asc(Column::StartMinute)
            .all(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("查询课表失败", e))?;

        Ok(items.into_iter().map(|m| m.into_schedule_entry()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{seed_catalog, test_storage};
    use crate::models::schedules::{NewScheduleEntry, ScheduleListParams};
    use crate::scheduler::TimeSlot;

    fn entry(semester_id: i64, course_id: i64, teacher_id: i64, day: u8) -> NewScheduleEntry {
        NewScheduleEntry {
            semester_id,
            course_id,
            teacher_id,
            slot: TimeSlot::new(day, 9 * 60, 10 * 60),
            room_type: None,
            room_id: Some(101),
        }
    }

    #[tokio::test]
    async fn test_replace_overwrites_semester_schedule() {
        let storage = test_storage().await;
        let seed = seed_catalog(&storage).await;
        let (sem, course, teacher) = (seed.semester_id, seed.course_id, seed.teacher_id);

        storage
            .replace_schedule_entries_impl(
                sem,
                vec![entry(sem, course, teacher, 0), entry(sem, course, teacher, 2)],
            )
            .await
            .unwrap();
        let saved = storage
            .replace_schedule_entries_impl(sem, vec![entry(sem, course, teacher, 1)])
            .await
            .unwrap();
        assert_eq!(saved.len(), 1);

        let listed = storage
            .list_schedule_entries_impl(ScheduleListParams {
                semester_id: Some(sem),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].slot, TimeSlot::new(1, 540, 600));
        assert_eq!(listed[0].room_id, Some(101));
    }
}
