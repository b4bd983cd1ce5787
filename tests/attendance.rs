#[cfg(test)]
mod tests {
    use backoffice::api::Backend;
    use backoffice::db::attendance::{Attendance, AttendanceEdit, AttendanceStatus};
    use backoffice::db::local::LocalStore;
    use backoffice::db::schema::MEMBERS;
    use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
    use serde_json::json;
    use tempfile::TempDir;
    use test_context::{test_context, AsyncTestContext};

    struct AttendanceTestContext {
        _temp_dir: TempDir,
        store: LocalStore,
        kim: i64,
        ola: i64,
    }

    async fn insert_member(store: &LocalStore, email: &str, name: &str) -> i64 {
        let row = store
            .insert(
                MEMBERS,
                json!({
                    "email": email,
                    "name": name,
                    "role": "employee",
                    "password_hash": "$argon2id$unused",
                    "is_active": true,
                    "login_count": 0,
                    "created_at": "2026-01-05T09:00:00Z",
                }),
            )
            .await
            .unwrap();
        row["id"].as_i64().unwrap()
    }

    impl AsyncTestContext for AttendanceTestContext {
        async fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let store = LocalStore::open(&temp_dir.path().join("backoffice.db")).unwrap();
            let kim = insert_member(&store, "kim@example.com", "Kim Tran").await;
            let ola = insert_member(&store, "ola@example.com", "Ola Berg").await;
            AttendanceTestContext {
                _temp_dir: temp_dir,
                store,
                kim,
                ola,
            }
        }
    }

    impl AttendanceTestContext {
        fn attendance(&self) -> Attendance<'_, LocalStore> {
            Attendance::new(&self.store, NaiveTime::from_hms_opt(9, 0, 0).unwrap(), Duration::hours(8))
        }
    }

    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, day).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    #[test_context(AttendanceTestContext)]
    #[tokio::test]
    async fn test_check_in_derives_status(ctx: &mut AttendanceTestContext) {
        let attendance = ctx.attendance();

        let on_time = attendance.check_in(ctx.kim, at(14, 8, 55), None, None).await.unwrap();
        assert_eq!(on_time.status, AttendanceStatus::Present);
        assert!(on_time.id.is_some());

        let late = attendance.check_in(ctx.ola, at(14, 9, 20), None, Some("train delay")).await.unwrap();
        assert_eq!(late.status, AttendanceStatus::Late);
        assert_eq!(late.note.as_deref(), Some("train delay"));

        let remote = attendance
            .check_in(ctx.kim, at(15, 10, 0), Some(AttendanceStatus::Remote), None)
            .await
            .unwrap();
        assert_eq!(remote.status, AttendanceStatus::Remote);
    }

    #[test_context(AttendanceTestContext)]
    #[tokio::test]
    async fn test_one_record_per_member_and_day(ctx: &mut AttendanceTestContext) {
        let attendance = ctx.attendance();
        attendance.check_in(ctx.kim, at(14, 9, 0), None, None).await.unwrap();

        let again = attendance.check_in(ctx.kim, at(14, 13, 0), None, None).await;
        assert!(again.unwrap_err().to_string().contains("2026-10-14"));
    }

    #[test_context(AttendanceTestContext)]
    #[tokio::test]
    async fn test_check_out_computes_worked_time(ctx: &mut AttendanceTestContext) {
        let attendance = ctx.attendance();
        attendance.check_in(ctx.kim, at(14, 9, 0), None, None).await.unwrap();

        let record = attendance.check_out(ctx.kim, at(14, 18, 30), 60).await.unwrap();
        assert_eq!(record.worked(), Some(Duration::minutes(450)));

        let stored = attendance.for_day(ctx.kim, at(14, 0, 0).date()).await.unwrap().unwrap();
        assert_eq!(stored.check_out, Some(at(14, 18, 30)));
        assert_eq!(stored.break_minutes, 60);

        assert!(attendance.check_out(ctx.kim, at(14, 19, 0), 0).await.is_err());
    }

    #[test_context(AttendanceTestContext)]
    #[tokio::test]
    async fn test_check_out_without_check_in_fails(ctx: &mut AttendanceTestContext) {
        let result = ctx.attendance().check_out(ctx.ola, at(14, 18, 0), 0).await;
        assert!(result.is_err());
    }

    #[test_context(AttendanceTestContext)]
    #[tokio::test]
    async fn test_overnight_shift_checks_out_next_day(ctx: &mut AttendanceTestContext) {
        let attendance = ctx.attendance();
        attendance.check_in(ctx.ola, at(14, 22, 0), None, None).await.unwrap();

        let record = attendance.check_out(ctx.ola, at(15, 6, 0), 30).await.unwrap();
        assert_eq!(record.work_date, at(14, 0, 0).date());
        assert_eq!(record.worked(), Some(Duration::minutes(450)));
        assert!(attendance.for_day(ctx.ola, at(15, 0, 0).date()).await.unwrap().is_none());

        // Yesterday is closed now, so there is nothing left to check out.
        assert!(attendance.check_out(ctx.ola, at(15, 7, 0), 0).await.is_err());
    }

    #[test_context(AttendanceTestContext)]
    #[tokio::test]
    async fn test_list_is_limited_to_month_and_member(ctx: &mut AttendanceTestContext) {
        let attendance = ctx.attendance();
        attendance.check_in(ctx.kim, at(1, 9, 0), None, None).await.unwrap();
        attendance.check_in(ctx.ola, at(1, 9, 0), None, None).await.unwrap();
        attendance.check_in(ctx.kim, at(31, 9, 0), None, None).await.unwrap();
        attendance
            .check_in(ctx.kim, NaiveDate::from_ymd_opt(2026, 11, 2).unwrap().and_hms_opt(9, 0, 0).unwrap(), None, None)
            .await
            .unwrap();

        assert_eq!(attendance.list("2026-10", None).await.unwrap().len(), 3);
        let kim_only = attendance.list("2026-10", Some(ctx.kim)).await.unwrap();
        assert_eq!(kim_only.len(), 2);
        assert!(kim_only.iter().all(|r| r.member_id == ctx.kim));

        assert!(attendance.list("October", None).await.is_err());
    }

    #[test_context(AttendanceTestContext)]
    #[tokio::test]
    async fn test_summary_totals_overtime(ctx: &mut AttendanceTestContext) {
        let attendance = ctx.attendance();
        attendance.check_in(ctx.kim, at(5, 9, 0), None, None).await.unwrap();
        attendance.check_out(ctx.kim, at(5, 19, 0), 60).await.unwrap();
        attendance.check_in(ctx.kim, at(6, 9, 30), None, None).await.unwrap();
        attendance.check_out(ctx.kim, at(6, 17, 30), 60).await.unwrap();

        let summaries = attendance.summary("2026-10", Some(ctx.kim)).await.unwrap();
        assert_eq!(summaries.len(), 1);
        let summary = &summaries[0];
        assert_eq!(summary.member_id, ctx.kim);
        assert_eq!(summary.days, 2);
        assert_eq!(summary.late_days, 1);
        assert_eq!(summary.worked, Duration::hours(16));
        assert_eq!(summary.overtime, Duration::hours(1));
    }

    #[test_context(AttendanceTestContext)]
    #[tokio::test]
    async fn test_edit_and_delete(ctx: &mut AttendanceTestContext) {
        let attendance = ctx.attendance();
        let record = attendance.check_in(ctx.ola, at(14, 9, 40), None, None).await.unwrap();
        let id = record.id.unwrap();

        let edit = AttendanceEdit {
            check_in: Some(at(14, 8, 50)),
            status: Some(AttendanceStatus::Present),
            note: Some("badge reader was down".to_string()),
            ..Default::default()
        };
        let updated = attendance.update(id, &edit).await.unwrap();
        assert_eq!(updated.status, AttendanceStatus::Present);

        let stored = attendance.get(id).await.unwrap().unwrap();
        assert_eq!(stored.check_in, at(14, 8, 50));
        assert_eq!(stored.note.as_deref(), Some("badge reader was down"));

        let moved = AttendanceEdit {
            check_in: Some(at(15, 9, 0)),
            ..Default::default()
        };
        assert!(attendance.update(id, &moved).await.is_err());

        attendance.delete(id).await.unwrap();
        assert!(attendance.get(id).await.unwrap().is_none());
        assert!(attendance.delete(id).await.is_err());
    }
}
