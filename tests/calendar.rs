#[cfg(test)]
mod tests {
    use backoffice::api::Backend;
    use backoffice::db::attendance::Attendance;
    use backoffice::db::kpi::{IndicatorInput, Kpi};
    use backoffice::db::local::LocalStore;
    use backoffice::db::recruitment::{CandidateInput, Recruitment};
    use backoffice::db::schedules::{ScheduleInput, Schedules};
    use backoffice::db::schema::MEMBERS;
    use backoffice::libs::calendar::{load_month, EntryKind};
    use backoffice::libs::dashboard;
    use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
    use serde_json::json;
    use std::collections::HashMap;
    use tempfile::TempDir;
    use test_context::{test_context, AsyncTestContext};

    struct CalendarTestContext {
        _temp_dir: TempDir,
        store: LocalStore,
        names: HashMap<i64, String>,
        kim: i64,
        ola: i64,
    }

    impl AsyncTestContext for CalendarTestContext {
        async fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let store = LocalStore::open(&temp_dir.path().join("backoffice.db")).unwrap();

            let mut names = HashMap::new();
            let mut ids = Vec::new();
            for (email, name) in [("kim@example.com", "Kim"), ("ola@example.com", "Ola")] {
                let row = store
                    .insert(
                        MEMBERS,
                        json!({
                            "email": email,
                            "name": name,
                            "role": "employee",
                            "password_hash": "$argon2id$unused",
                            "is_active": true,
                            "created_at": "2026-01-05T09:00:00Z",
                        }),
                    )
                    .await
                    .unwrap();
                let id = row["id"].as_i64().unwrap();
                names.insert(id, name.to_string());
                ids.push(id);
            }

            let schedules = Schedules::new(&store);
            schedules
                .add(
                    &ScheduleInput {
                        title: "Offsite".to_string(),
                        start_at: "2026-10-08 13:00".to_string(),
                        end_at: Some("2026-10-09 17:00".to_string()),
                        location: Some("Porto".to_string()),
                        ..Default::default()
                    },
                    None,
                )
                .await
                .unwrap();
            schedules
                .add(
                    &ScheduleInput {
                        title: "Budget review".to_string(),
                        start_at: "2026-11-02 10:00".to_string(),
                        ..Default::default()
                    },
                    None,
                )
                .await
                .unwrap();

            let recruitment = Recruitment::new(&store);
            let candidate = recruitment
                .add(
                    &CandidateInput {
                        candidate_name: "Rae".to_string(),
                        position: "Designer".to_string(),
                        ..Default::default()
                    },
                    Utc::now(),
                )
                .await
                .unwrap();
            recruitment
                .schedule_interview(candidate.id.unwrap(), "2026-10-08 09:30", Some("Ivy"))
                .await
                .unwrap();

            CalendarTestContext {
                _temp_dir: temp_dir,
                store,
                names,
                kim: ids[0],
                ola: ids[1],
            }
        }
    }

    impl CalendarTestContext {
        fn attendance(&self) -> Attendance<'_, LocalStore> {
            Attendance::new(&self.store, NaiveTime::from_hms_opt(9, 0, 0).unwrap(), Duration::hours(8))
        }
    }

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, month, day).unwrap()
    }

    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        date(10, day).and_hms_opt(h, m, 0).unwrap()
    }

    #[test_context(CalendarTestContext)]
    #[tokio::test]
    async fn test_month_merges_every_source(ctx: &mut CalendarTestContext) {
        let attendance = ctx.attendance();
        attendance.check_in(ctx.kim, at(9, 8, 50), None, None).await.unwrap();

        let calendar = load_month(&ctx.store, "2026-10", None, true, &ctx.names).await.unwrap();
        assert_eq!(calendar.len(), 2);

        let eighth = &calendar[&date(10, 8)];
        assert_eq!(eighth.len(), 2);
        assert_eq!(eighth[0].kind, EntryKind::Interview);
        assert_eq!(eighth[0].title, "Rae (Designer)");
        assert_eq!(eighth[1].kind, EntryKind::Schedule);
        assert_eq!(eighth[1].detail.as_deref(), Some("Porto"));

        let ninth = &calendar[&date(10, 9)];
        assert_eq!(ninth[0].kind, EntryKind::Schedule);
        assert_eq!(ninth[0].time, None);
        assert_eq!(ninth[1].title, "Kim: present");
    }

    #[test_context(CalendarTestContext)]
    #[tokio::test]
    async fn test_interviews_hidden_unless_requested(ctx: &mut CalendarTestContext) {
        let calendar = load_month(&ctx.store, "2026-10", None, false, &ctx.names).await.unwrap();
        assert!(calendar
            .values()
            .flatten()
            .all(|entry| entry.kind != EntryKind::Interview));
    }

    #[test_context(CalendarTestContext)]
    #[tokio::test]
    async fn test_attendance_limited_to_member(ctx: &mut CalendarTestContext) {
        let attendance = ctx.attendance();
        attendance.check_in(ctx.kim, at(14, 9, 0), None, None).await.unwrap();
        attendance.check_in(ctx.ola, at(14, 9, 15), None, None).await.unwrap();

        let calendar = load_month(&ctx.store, "2026-10", Some(ctx.ola), false, &ctx.names).await.unwrap();
        let fourteenth = &calendar[&date(10, 14)];
        assert_eq!(fourteenth.len(), 1);
        assert_eq!(fourteenth[0].title, "Ola: late");
    }

    #[test_context(CalendarTestContext)]
    #[tokio::test]
    async fn test_month_must_be_valid(ctx: &mut CalendarTestContext) {
        assert!(load_month(&ctx.store, "10/2026", None, false, &ctx.names).await.is_err());

        let december = load_month(&ctx.store, "2026-12", None, true, &ctx.names).await.unwrap();
        assert!(december.is_empty());
    }

    #[test_context(CalendarTestContext)]
    #[tokio::test]
    async fn test_dashboard_for_member(ctx: &mut CalendarTestContext) {
        let attendance = ctx.attendance();
        attendance.check_in(ctx.kim, at(16, 8, 45), None, None).await.unwrap();
        attendance.check_in(ctx.ola, at(16, 9, 5), None, None).await.unwrap();

        let kpi = Kpi::new(&ctx.store);
        let indicator = kpi
            .add_indicator(&IndicatorInput {
                name: "Tickets solved".to_string(),
                unit: "count".to_string(),
                category: "support".to_string(),
                description: None,
            })
            .await
            .unwrap();
        kpi.set_target(indicator.id.unwrap(), ctx.kim, "2026-10", 20.0).await.unwrap();
        kpi.set_target(indicator.id.unwrap(), ctx.ola, "2026-10", 20.0).await.unwrap();

        let now = at(16, 12, 0);
        let company = dashboard::load(&ctx.store, &attendance, now, None).await.unwrap();
        assert_eq!(company.period, "2026-10");
        assert_eq!(company.kpi.len(), 2);
        assert_eq!(company.today.len(), 2);
        assert_eq!(company.upcoming.len(), 1);
        assert_eq!(company.upcoming[0].title, "Budget review");

        let own = dashboard::load(&ctx.store, &attendance, now, Some(ctx.kim)).await.unwrap();
        assert_eq!(own.kpi.len(), 1);
        assert_eq!(own.today.len(), 1);
        assert_eq!(own.today[0].member_id, ctx.kim);
    }
}
