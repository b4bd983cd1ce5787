#[cfg(test)]
mod tests {
    use backoffice::db::local::LocalStore;
    use backoffice::db::recruitment::{CandidateInput, Recruitment, Stage};
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use tempfile::TempDir;
    use test_context::{test_context, AsyncTestContext};

    struct RecruitmentTestContext {
        _temp_dir: TempDir,
        store: LocalStore,
    }

    impl AsyncTestContext for RecruitmentTestContext {
        async fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let store = LocalStore::open(&temp_dir.path().join("backoffice.db")).unwrap();
            RecruitmentTestContext {
                _temp_dir: temp_dir,
                store,
            }
        }
    }

    fn applicant(name: &str) -> CandidateInput {
        CandidateInput {
            candidate_name: name.to_string(),
            email: Some(format!("{}@mail.example.com", name.to_lowercase())),
            position: "Backend engineer".to_string(),
            ..Default::default()
        }
    }

    #[test_context(RecruitmentTestContext)]
    #[tokio::test]
    async fn test_candidates_move_forward_only(ctx: &mut RecruitmentTestContext) {
        let recruitment = Recruitment::new(&ctx.store);
        let now = Utc.with_ymd_and_hms(2026, 10, 1, 10, 0, 0).unwrap();
        let candidate = recruitment.add(&applicant("Noor"), now).await.unwrap();
        let id = candidate.id.unwrap();
        assert_eq!(candidate.stage, Stage::Applied);

        assert_eq!(recruitment.advance(id, Stage::Interview).await.unwrap().stage, Stage::Interview);
        assert!(recruitment.advance(id, Stage::Screening).await.is_err());
        assert!(recruitment.advance(id, Stage::Interview).await.is_err());

        recruitment.advance(id, Stage::Offer).await.unwrap();
        recruitment.advance(id, Stage::Hired).await.unwrap();
        assert!(recruitment.advance(id, Stage::Rejected).await.is_err());

        let stored = recruitment.get(id).await.unwrap().unwrap();
        assert_eq!(stored.stage, Stage::Hired);
    }

    #[test_context(RecruitmentTestContext)]
    #[tokio::test]
    async fn test_rejected_is_final(ctx: &mut RecruitmentTestContext) {
        let recruitment = Recruitment::new(&ctx.store);
        let id = recruitment.add(&applicant("Omar"), Utc::now()).await.unwrap().id.unwrap();

        recruitment.advance(id, Stage::Rejected).await.unwrap();
        assert!(recruitment.advance(id, Stage::Offer).await.is_err());
        assert_eq!(recruitment.list(Some(Stage::Rejected)).await.unwrap().len(), 1);
        assert!(recruitment.list(Some(Stage::Applied)).await.unwrap().is_empty());
    }

    #[test_context(RecruitmentTestContext)]
    #[tokio::test]
    async fn test_rating_is_bounded(ctx: &mut RecruitmentTestContext) {
        let recruitment = Recruitment::new(&ctx.store);
        let id = recruitment.add(&applicant("Pia"), Utc::now()).await.unwrap().id.unwrap();

        assert!(recruitment.rate(id, 0, None).await.is_err());
        assert!(recruitment.rate(id, 6, None).await.is_err());

        let rated = recruitment.rate(id, 4, Some("Strong system design")).await.unwrap();
        assert_eq!(rated.rating, Some(4));
        let stored = recruitment.get(id).await.unwrap().unwrap();
        assert_eq!(stored.rating, Some(4));
        assert_eq!(stored.notes.as_deref(), Some("Strong system design"));
    }

    #[test_context(RecruitmentTestContext)]
    #[tokio::test]
    async fn test_interviews_within_range(ctx: &mut RecruitmentTestContext) {
        let recruitment = Recruitment::new(&ctx.store);
        let now = Utc::now();
        let early = recruitment.add(&applicant("Quinn"), now).await.unwrap().id.unwrap();
        let late = recruitment.add(&applicant("Rosa"), now + Duration::seconds(1)).await.unwrap().id.unwrap();
        recruitment.add(&applicant("Sven"), now + Duration::seconds(2)).await.unwrap();

        recruitment.schedule_interview(early, "2026-10-20 14:00", Some("Ivy")).await.unwrap();
        recruitment.schedule_interview(late, "2026-11-03 10:30", None).await.unwrap();

        let october = recruitment
            .interviews_between(
                NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
                NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(october.len(), 1);
        assert_eq!(october[0].candidate_name, "Quinn");
        assert_eq!(october[0].interviewer.as_deref(), Some("Ivy"));

        assert!(recruitment.schedule_interview(early, "next tuesday", None).await.is_err());
    }

    #[test_context(RecruitmentTestContext)]
    #[tokio::test]
    async fn test_pipeline_counts_every_stage(ctx: &mut RecruitmentTestContext) {
        let recruitment = Recruitment::new(&ctx.store);
        let now = Utc::now();
        let a = recruitment.add(&applicant("Tia"), now).await.unwrap().id.unwrap();
        recruitment.add(&applicant("Uma"), now).await.unwrap();
        recruitment.advance(a, Stage::Offer).await.unwrap();

        let pipeline = recruitment.overview().await.unwrap();
        assert_eq!(pipeline.len(), Stage::ALL.len());
        assert_eq!(pipeline[0], (Stage::Applied, 1));
        assert_eq!(pipeline[3], (Stage::Offer, 1));
        assert_eq!(pipeline[5], (Stage::Rejected, 0));

        recruitment.delete(a).await.unwrap();
        assert!(recruitment.get(a).await.unwrap().is_none());
    }

    #[test_context(RecruitmentTestContext)]
    #[tokio::test]
    async fn test_invalid_email_rejected(ctx: &mut RecruitmentTestContext) {
        let mut input = applicant("Vic");
        input.email = Some("not-an-address".to_string());
        assert!(Recruitment::new(&ctx.store).add(&input, Utc::now()).await.is_err());
    }
}
