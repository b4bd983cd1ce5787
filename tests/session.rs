#[cfg(test)]
mod tests {
    use backoffice::libs::auth::{Authenticate, Identity};
    use backoffice::libs::clock::{Clock, ManualClock};
    use backoffice::libs::role::Role;
    use backoffice::libs::session::{
        is_session_valid, AdminSession, FileSessionStore, MemorySessionStore, SessionContext, SessionPolicy,
        SessionState, SessionStore,
    };
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use serde_json::Value;
    use tempfile::TempDir;
    use test_context::{test_context, AsyncTestContext};

    /// Accepts one email/password pair.
    struct StubAuth {
        email: &'static str,
        password: &'static str,
    }

    impl Authenticate for StubAuth {
        async fn authenticate(&self, email: &str, password: &str, _now: DateTime<Utc>) -> Option<Identity> {
            (email == self.email && password == self.password).then(|| Identity {
                id: "12".to_string(),
                email: email.to_string(),
                name: "Dana Park".to_string(),
                role: Role::Employee,
            })
        }
    }

    const AUTH: StubAuth = StubAuth {
        email: "dana@example.com",
        password: "hunter22",
    };

    struct SessionTestContext {
        clock: ManualClock,
        store: MemorySessionStore,
    }

    impl AsyncTestContext for SessionTestContext {
        async fn setup() -> Self {
            SessionTestContext {
                clock: ManualClock::new(Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap()),
                store: MemorySessionStore::new(),
            }
        }
    }

    impl SessionTestContext {
        fn context(&self) -> SessionContext<MemorySessionStore, ManualClock> {
            SessionContext::new(self.store.clone(), self.clock.clone())
        }
    }

    #[test_context(SessionTestContext)]
    #[tokio::test]
    async fn test_login_persists_camel_case_session(ctx: &mut SessionTestContext) {
        let mut session = ctx.context();
        assert!(session.login(&AUTH, "dana@example.com", "hunter22").await.unwrap());
        assert_eq!(session.state(), SessionState::Authenticated);

        let raw = ctx.store.get().expect("session should be stored");
        let json: Value = serde_json::from_str(&raw).unwrap();
        assert!(json["id"].as_str().unwrap().starts_with("session_"));
        assert_eq!(json["user"]["email"], "dana@example.com");
        assert_eq!(json["user"]["isAuthenticated"], true);
        assert!(json["user"]["lastActivity"].is_string());
        assert!(json["createdAt"].is_string());
        assert!(json["expiresAt"].is_string());

        let stored = session.session().unwrap();
        assert_eq!(stored.expires_at - stored.created_at, Duration::hours(24));
    }

    #[test_context(SessionTestContext)]
    #[tokio::test]
    async fn test_failed_login_leaves_store_untouched(ctx: &mut SessionTestContext) {
        let mut session = ctx.context();
        assert!(!session.login(&AUTH, "dana@example.com", "wrong").await.unwrap());
        assert_eq!(session.state(), SessionState::Unauthenticated);
        assert!(ctx.store.get().is_none());
    }

    #[test_context(SessionTestContext)]
    #[tokio::test]
    async fn test_session_restored_by_another_context(ctx: &mut SessionTestContext) {
        let mut first = ctx.context();
        first.login(&AUTH, "dana@example.com", "hunter22").await.unwrap();

        ctx.clock.advance(Duration::minutes(10));
        let mut second = ctx.context();
        assert_eq!(second.check_session().unwrap(), SessionState::Authenticated);
        assert_eq!(second.user().unwrap().name, "Dana Park");
        assert_eq!(second.user().unwrap().member_id(), Some(12));
    }

    #[test_context(SessionTestContext)]
    #[tokio::test]
    async fn test_idle_timeout_expires_session(ctx: &mut SessionTestContext) {
        let mut session = ctx.context();
        session.login(&AUTH, "dana@example.com", "hunter22").await.unwrap();

        ctx.clock.advance(Duration::minutes(29));
        assert_eq!(session.check_session().unwrap(), SessionState::Authenticated);

        ctx.clock.advance(Duration::minutes(2));
        assert_eq!(session.check_session().unwrap(), SessionState::Expired);
        assert!(session.user().is_none());
        assert!(ctx.store.get().is_none());
    }

    #[test_context(SessionTestContext)]
    #[tokio::test]
    async fn test_activity_keeps_session_until_max_age(ctx: &mut SessionTestContext) {
        let mut session = ctx.context();
        session.login(&AUTH, "dana@example.com", "hunter22").await.unwrap();

        // Active every 20 minutes for just under a day.
        for _ in 0..71 {
            ctx.clock.advance(Duration::minutes(20));
            assert!(session.update_user_activity().unwrap());
        }
        assert_eq!(session.check_session().unwrap(), SessionState::Authenticated);

        ctx.clock.advance(Duration::minutes(20));
        assert!(!session.update_user_activity().unwrap());
        assert_eq!(session.state(), SessionState::Expired);
        assert!(ctx.store.get().is_none());
    }

    #[test_context(SessionTestContext)]
    #[tokio::test]
    async fn test_activity_respects_minimum_gap(ctx: &mut SessionTestContext) {
        let mut session = ctx.context();
        session.login(&AUTH, "dana@example.com", "hunter22").await.unwrap();
        let login_at = session.user().unwrap().last_activity;

        ctx.clock.advance(Duration::seconds(5));
        assert!(!session.update_user_activity().unwrap());
        assert_eq!(session.user().unwrap().last_activity, login_at);

        ctx.clock.advance(Duration::seconds(5));
        assert!(session.update_user_activity().unwrap());
        assert_eq!(session.user().unwrap().last_activity, login_at + Duration::seconds(10));

        let persisted: Value = serde_json::from_str(&ctx.store.get().unwrap()).unwrap();
        let last_activity: chrono::DateTime<Utc> = serde_json::from_value(persisted["user"]["lastActivity"].clone()).unwrap();
        assert_eq!(last_activity, login_at + Duration::seconds(10));
    }

    #[test_context(SessionTestContext)]
    #[tokio::test]
    async fn test_tick_ends_stale_session(ctx: &mut SessionTestContext) {
        let mut session = ctx.context();
        session.login(&AUTH, "dana@example.com", "hunter22").await.unwrap();

        assert!(!session.tick().unwrap());
        ctx.clock.advance(Duration::minutes(45));
        assert!(session.tick().unwrap());
        assert_eq!(session.state(), SessionState::Expired);
    }

    #[test_context(SessionTestContext)]
    #[tokio::test]
    async fn test_corrupt_session_is_discarded(ctx: &mut SessionTestContext) {
        ctx.store.save("{not json").unwrap();
        let mut session = ctx.context();
        assert_eq!(session.check_session().unwrap(), SessionState::Unauthenticated);
        assert!(ctx.store.get().is_none());
    }

    #[test_context(SessionTestContext)]
    #[tokio::test]
    async fn test_logout_clears_everything(ctx: &mut SessionTestContext) {
        let mut session = ctx.context();
        session.login(&AUTH, "dana@example.com", "hunter22").await.unwrap();
        session.logout().unwrap();

        assert_eq!(session.state(), SessionState::Unauthenticated);
        assert!(session.session().is_none());
        assert!(ctx.store.get().is_none());

        assert_eq!(session.check_session().unwrap(), SessionState::Unauthenticated);
        assert!(session.user().is_none());
        assert_eq!(ctx.context().check_session().unwrap(), SessionState::Unauthenticated);
    }

    #[test_context(SessionTestContext)]
    #[tokio::test]
    async fn test_day_old_session_expires_despite_recent_activity(ctx: &mut SessionTestContext) {
        let identity = Identity {
            id: "12".to_string(),
            email: "dana@example.com".to_string(),
            name: "Dana Park".to_string(),
            role: Role::Employee,
        };
        let now = ctx.clock.now();
        let mut stale = AdminSession::new(identity, now - Duration::hours(25), &SessionPolicy::default());
        stale.user.last_activity = now - Duration::minutes(1);
        ctx.store.save(&serde_json::to_string(&stale).unwrap()).unwrap();

        let mut session = ctx.context();
        assert_eq!(session.check_session().unwrap(), SessionState::Expired);
        assert!(session.user().is_none());
        assert!(ctx.store.get().is_none());
    }

    #[test_context(SessionTestContext)]
    #[tokio::test]
    async fn test_tick_sees_activity_from_other_commands(ctx: &mut SessionTestContext) {
        let mut watcher = ctx.context();
        watcher.login(&AUTH, "dana@example.com", "hunter22").await.unwrap();
        let login_at = ctx.clock.now();

        ctx.clock.advance(Duration::minutes(20));
        let mut command = ctx.context();
        assert_eq!(command.check_session().unwrap(), SessionState::Authenticated);
        assert!(command.update_user_activity().unwrap());

        ctx.clock.advance(Duration::minutes(15));
        assert!(!watcher.tick().unwrap());
        assert_eq!(watcher.state(), SessionState::Authenticated);
        assert_eq!(watcher.user().unwrap().last_activity, login_at + Duration::minutes(20));
        assert!(ctx.store.get().is_some());
    }

    #[test_context(SessionTestContext)]
    #[tokio::test]
    async fn test_touch_does_not_undo_logout_elsewhere(ctx: &mut SessionTestContext) {
        let mut watcher = ctx.context();
        watcher.login(&AUTH, "dana@example.com", "hunter22").await.unwrap();

        let mut command = ctx.context();
        command.check_session().unwrap();
        command.logout().unwrap();

        ctx.clock.advance(Duration::seconds(20));
        assert!(!watcher.update_user_activity().unwrap());
        assert_eq!(watcher.state(), SessionState::Unauthenticated);
        assert!(watcher.user().is_none());
        assert!(ctx.store.get().is_none());
    }

    #[test_context(SessionTestContext)]
    #[tokio::test]
    async fn test_tick_reports_logout_elsewhere(ctx: &mut SessionTestContext) {
        let mut watcher = ctx.context();
        watcher.login(&AUTH, "dana@example.com", "hunter22").await.unwrap();
        ctx.context().logout().unwrap();

        assert!(watcher.tick().unwrap());
        assert_eq!(watcher.state(), SessionState::Unauthenticated);
        assert!(ctx.store.get().is_none());
    }

    #[test_context(SessionTestContext)]
    #[tokio::test]
    async fn test_own_newer_activity_survives_reload(ctx: &mut SessionTestContext) {
        let mut watcher = ctx.context();
        watcher.login(&AUTH, "dana@example.com", "hunter22").await.unwrap();
        let stale_copy = ctx.store.get().unwrap();

        ctx.clock.advance(Duration::minutes(10));
        assert!(watcher.update_user_activity().unwrap());
        ctx.store.save(&stale_copy).unwrap();

        ctx.clock.advance(Duration::minutes(25));
        assert!(!watcher.tick().unwrap());
        assert_eq!(watcher.state(), SessionState::Authenticated);
    }

    #[test_context(SessionTestContext)]
    #[tokio::test]
    async fn test_validity_function_matches_default_policy(ctx: &mut SessionTestContext) {
        let mut session = ctx.context();
        session.login(&AUTH, "dana@example.com", "hunter22").await.unwrap();
        let snapshot = session.session().unwrap().clone();
        let start = snapshot.created_at;

        assert!(is_session_valid(start + Duration::minutes(29), &snapshot));
        assert!(!is_session_valid(start + Duration::minutes(30), &snapshot));
    }

    #[tokio::test]
    async fn test_file_store_survives_restart() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("admin_session.json");
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap());

        let mut first = SessionContext::new(FileSessionStore::at(&path), clock.clone());
        first.login(&AUTH, "dana@example.com", "hunter22").await.unwrap();
        assert!(path.exists());

        let mut second = SessionContext::new(FileSessionStore::at(&path), clock.clone());
        assert_eq!(second.check_session().unwrap(), SessionState::Authenticated);

        second.logout().unwrap();
        assert!(!path.exists());
    }
}
