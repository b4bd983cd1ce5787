#[cfg(test)]
mod tests {
    use backoffice::db::expenses::{ExpenseInput, Expenses};
    use backoffice::db::local::LocalStore;
    use backoffice::db::news::{ArticleEdit, ArticleInput, News, DEFAULT_CATEGORY};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use tempfile::TempDir;
    use test_context::{test_context, AsyncTestContext};

    struct ContentTestContext {
        _temp_dir: TempDir,
        store: LocalStore,
        now: DateTime<Utc>,
    }

    impl AsyncTestContext for ContentTestContext {
        async fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let store = LocalStore::open(&temp_dir.path().join("backoffice.db")).unwrap();
            ContentTestContext {
                _temp_dir: temp_dir,
                store,
                now: Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap(),
            }
        }
    }

    fn article(title: &str) -> ArticleInput {
        ArticleInput {
            title: title.to_string(),
            summary: None,
            body: format!("{} body text", title),
            category: None,
        }
    }

    fn cost(month: &str, category: &str, amount: f64) -> ExpenseInput {
        ExpenseInput {
            month: month.to_string(),
            category: category.to_string(),
            amount,
            description: None,
        }
    }

    #[test_context(ContentTestContext)]
    #[tokio::test]
    async fn test_drafts_start_unpublished(ctx: &mut ContentTestContext) {
        let news = News::new(&ctx.store);
        let draft = news.draft(&article("Office move"), None, ctx.now).await.unwrap();

        assert!(!draft.is_published);
        assert!(draft.published_at.is_none());
        assert_eq!(draft.category, DEFAULT_CATEGORY);
        assert!(news.list(true).await.unwrap().is_empty());
        assert_eq!(news.list(false).await.unwrap().len(), 1);
    }

    #[test_context(ContentTestContext)]
    #[tokio::test]
    async fn test_publish_and_unpublish(ctx: &mut ContentTestContext) {
        let news = News::new(&ctx.store);
        let id = news.draft(&article("Holiday party"), None, ctx.now).await.unwrap().id.unwrap();
        let later = ctx.now + Duration::hours(2);

        let published = news.publish(id, later).await.unwrap();
        assert!(published.is_published);
        assert_eq!(published.published_at, Some(later));

        let visible = news.list(true).await.unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].published_at, Some(later));

        news.unpublish(id, later + Duration::hours(1)).await.unwrap();
        let stored = news.get(id).await.unwrap().unwrap();
        assert!(!stored.is_published);
        assert!(stored.published_at.is_none());
        assert!(news.list(true).await.unwrap().is_empty());
    }

    #[test_context(ContentTestContext)]
    #[tokio::test]
    async fn test_edit_keeps_untouched_fields(ctx: &mut ContentTestContext) {
        let news = News::new(&ctx.store);
        let id = news.draft(&article("Q3 results"), None, ctx.now).await.unwrap().id.unwrap();

        let edit = ArticleEdit {
            title: Some("Q3 results are in".to_string()),
            category: Some("company".to_string()),
            ..Default::default()
        };
        news.update(id, &edit, ctx.now + Duration::minutes(5)).await.unwrap();

        let stored = news.get(id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Q3 results are in");
        assert_eq!(stored.body, "Q3 results body text");
        assert_eq!(stored.category, "company");
        assert_eq!(stored.updated_at, ctx.now + Duration::minutes(5));

        let blank = ArticleEdit {
            body: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(news.update(id, &blank, ctx.now).await.is_err());
    }

    #[test_context(ContentTestContext)]
    #[tokio::test]
    async fn test_article_delete(ctx: &mut ContentTestContext) {
        let news = News::new(&ctx.store);
        let id = news.draft(&article("Parking"), None, ctx.now).await.unwrap().id.unwrap();

        news.delete(id).await.unwrap();
        assert!(news.get(id).await.unwrap().is_none());
        assert!(news.delete(id).await.is_err());
        assert!(news.publish(id, ctx.now).await.is_err());
    }

    #[test_context(ContentTestContext)]
    #[tokio::test]
    async fn test_expense_input_is_validated(ctx: &mut ContentTestContext) {
        let expenses = Expenses::new(&ctx.store);

        assert!(expenses.add(&cost("Oct 2026", "rent", 10.0), None).await.is_err());
        assert!(expenses.add(&cost("2026-10", "rent", 0.0), None).await.is_err());
        assert!(expenses.add(&cost("2026-10", " ", 10.0), None).await.is_err());

        let saved = expenses.add(&cost("2026-10", " rent ", 1200.0), None).await.unwrap();
        assert_eq!(saved.category, "rent");
        assert!(saved.id.is_some());
    }

    #[test_context(ContentTestContext)]
    #[tokio::test]
    async fn test_monthly_summary(ctx: &mut ContentTestContext) {
        let expenses = Expenses::new(&ctx.store);
        expenses.add(&cost("2026-10", "software", 200.0), None).await.unwrap();
        expenses.add(&cost("2026-10", "rent", 1200.0), None).await.unwrap();
        expenses.add(&cost("2026-10", "software", 150.0), None).await.unwrap();
        expenses.add(&cost("2026-09", "rent", 1100.0), None).await.unwrap();

        let summary = expenses.summary("2026-10").await.unwrap();
        assert_eq!(summary.total, 1550.0);
        assert_eq!(
            summary.by_category,
            vec![("rent".to_string(), 1200.0), ("software".to_string(), 350.0)]
        );

        let september = expenses.list("2026-09").await.unwrap();
        assert_eq!(september.len(), 1);
        expenses.delete(september[0].id.unwrap()).await.unwrap();
        assert_eq!(expenses.summary("2026-09").await.unwrap().total, 0.0);
        assert!(expenses.delete(september[0].id.unwrap()).await.is_err());
    }
}
