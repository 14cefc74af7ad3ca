#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::api::types::*;
    use crate::api::ApiState;
    use crate::persistence::MemberStore;
    use crate::registry::MemberRegistry;
    use axum::extract::State;
    use axum::Json;
    use common::config::DatabaseConfig;
    use std::sync::Arc;

    async fn test_state() -> ApiState {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            idle_timeout: None,
            max_lifetime: None,
            run_migrations: true,
            ..Default::default()
        };
        let store = MemberStore::new(&config).await.unwrap();
        ApiState::new(Arc::new(MemberRegistry::new(store)))
    }

    fn register_request(n: u32) -> RegisterMemberRequest {
        RegisterMemberRequest {
            name: format!("Member {n}"),
            email: format!("member{n}@example.com"),
            phone: format!("+2547000000{n:02}"),
            department: Some("CS".to_string()),
            reg_number: None,
            year: None,
        }
    }

    #[tokio::test]
    async fn test_register_verify_flow() {
        let state = test_state().await;

        let Json(registered) = register_member(State(state.clone()), Json(register_request(1)))
            .await
            .unwrap();
        assert!(registered.success);
        assert!(registered.membership_code.starts_with("ESA"));

        let Json(verified) = verify_member(
            State(state.clone()),
            Json(VerifyMemberRequest {
                identifier: "member1@example.com".to_string(),
                membership_code: registered.membership_code.clone(),
            }),
        )
        .await
        .unwrap();
        assert!(verified.success);
        assert_eq!(verified.member.membership_code, registered.membership_code);
        assert_eq!(verified.member.department.as_deref(), Some("CS"));
    }

    #[tokio::test]
    async fn test_register_duplicate_is_rejected() {
        let state = test_state().await;

        register_member(State(state.clone()), Json(register_request(1)))
            .await
            .unwrap();

        let result = register_member(State(state.clone()), Json(register_request(1))).await;
        assert!(result.is_err());

        let Json(counted) = member_count(State(state)).await.unwrap();
        assert_eq!(counted.count, 1);
    }

    #[tokio::test]
    async fn test_verify_rejects_blank_fields() {
        let state = test_state().await;

        let result = verify_member(
            State(state),
            Json(VerifyMemberRequest {
                identifier: String::new(),
                membership_code: "ESA12345".to_string(),
            }),
        )
        .await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_update_member_flow() {
        let state = test_state().await;
        let Json(registered) = register_member(State(state.clone()), Json(register_request(1)))
            .await
            .unwrap();

        let Json(updated) = update_member(
            State(state.clone()),
            Json(UpdateMemberRequest {
                identifier: "member1@example.com".to_string(),
                membership_code: registered.membership_code.clone(),
                name: Some("Renamed".to_string()),
                email: None,
                phone: None,
                department: Some(String::new()),
                reg_number: None,
                year: None,
            }),
        )
        .await
        .unwrap();
        assert!(updated.success);

        let Json(verified) = verify_member(
            State(state),
            Json(VerifyMemberRequest {
                identifier: "member1@example.com".to_string(),
                membership_code: registered.membership_code,
            }),
        )
        .await
        .unwrap();
        assert_eq!(verified.member.name, "Renamed");
        assert_eq!(verified.member.department.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_update_column_requires_locator() {
        let state = test_state().await;

        let result = update_member_column(
            State(state),
            Json(UpdateColumnRequest {
                id: None,
                email: None,
                phone: None,
                membership_code: "ESA12345".to_string(),
                column: "name".to_string(),
                value: "Nobody".to_string(),
            }),
        )
        .await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_update_column_by_contact() {
        let state = test_state().await;
        let Json(registered) = register_member(State(state.clone()), Json(register_request(1)))
            .await
            .unwrap();

        let Json(updated) = update_member_column(
            State(state.clone()),
            Json(UpdateColumnRequest {
                id: None,
                email: Some("member1@example.com".to_string()),
                phone: None,
                membership_code: registered.membership_code.clone(),
                column: "year".to_string(),
                value: "4".to_string(),
            }),
        )
        .await
        .unwrap();
        assert!(updated.success);

        let Json(verified) = verify_member(
            State(state),
            Json(VerifyMemberRequest {
                identifier: "member1@example.com".to_string(),
                membership_code: registered.membership_code,
            }),
        )
        .await
        .unwrap();
        assert_eq!(verified.member.year.as_deref(), Some("4"));
    }

    #[tokio::test]
    async fn test_list_members_sorted() {
        let state = test_state().await;
        for (n, name) in [(1, "Charlie"), (2, "Alice")] {
            let request = RegisterMemberRequest {
                name: name.to_string(),
                ..register_request(n)
            };
            register_member(State(state.clone()), Json(request))
                .await
                .unwrap();
        }

        let Json(listing) = list_members(State(state)).await.unwrap();
        assert_eq!(listing.count, 2);
        assert_eq!(listing.members[0].name, "Alice");
        assert_eq!(listing.members[1].name, "Charlie");
    }

    #[tokio::test]
    async fn test_health_and_db_health() {
        let state = test_state().await;

        let Json(health) = health_check(State(state.clone())).await;
        assert_eq!(health.status, "healthy");

        let Json(report) = db_health(State(state.clone())).await.unwrap();
        assert!(report.success);
        assert!(report.tables.contains(&"members".to_string()));
        assert_eq!(report.member_count, 0);
        assert!(!report.recent_probes.is_empty());

        let Json(migrated) = migrate_db(State(state)).await.unwrap();
        assert!(migrated.success);
        assert!(migrated.tables.contains(&"health_probes".to_string()));
    }
}
