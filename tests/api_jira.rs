#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use worklens::api::jira::{build_jql, Jira, JiraConfig};
    use worklens::libs::error::WorklensError;
    use worklens::libs::report::{fetch_worklog_data, FetchRequest};

    fn jira_for(server: &mockito::ServerGuard) -> Jira {
        Jira::new(&JiraConfig {
            api_url: server.url(),
            token: "test-token".to_string(),
        })
        .unwrap()
    }

    const SEARCH_BODY: &str = r#"{
        "issues": [
            {"key": "AB-1", "fields": {"summary": "First ticket"}},
            {"key": "AB-2", "fields": {}}
        ]
    }"#;

    #[test]
    fn test_build_jql() {
        let jql = build_jql(&["jdoe".to_string(), "asmith".to_string()], 14);
        assert_eq!(jql, r#"worklogAuthor in ("jdoe", "asmith") AND worklogDate >= -14d"#);
    }

    #[tokio::test]
    async fn test_search_parses_issues_and_sends_capped_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/rest/api/2/search")
            .match_header("authorization", "Bearer test-token")
            .match_body(Matcher::PartialJsonString(
                r#"{"jql": "worklogAuthor in (\"jdoe\") AND worklogDate >= -30d", "maxResults": 1000}"#.to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(SEARCH_BODY)
            .create_async()
            .await;

        let jira = jira_for(&server);
        let issues = jira.search_worklog_issues(&["jdoe".to_string()], 30).await.unwrap();

        mock.assert_async().await;
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].key, "AB-1");
        assert_eq!(issues[0].summary.as_deref(), Some("First ticket"));
        assert_eq!(issues[1].summary, None);
    }

    #[tokio::test]
    async fn test_search_failure_carries_upstream_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/rest/api/2/search")
            .with_status(503)
            .create_async()
            .await;

        let jira = jira_for(&server);
        let err = jira.search_worklog_issues(&["jdoe".to_string()], 30).await.unwrap_err();
        assert!(matches!(err, WorklensError::UpstreamSearch(_)));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_empty_author_set_rejected_before_any_network_call() {
        let jira = Jira::new(&JiraConfig {
            // Unroutable on purpose; the call must fail before reaching it.
            api_url: "http://127.0.0.1:1".to_string(),
            token: "test-token".to_string(),
        })
        .unwrap();

        let err = jira.search_worklog_issues(&[], 30).await.unwrap_err();
        assert!(matches!(err, WorklensError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_worklog_listing_filters_nothing_client_side() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/2/issue/AB-1/worklog")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"worklogs": [
                    {"author": {"name": "jdoe"}, "started": "2024-05-06T09:00:00.000+0000", "timeSpentSeconds": 3600},
                    {"author": {"name": "stranger"}, "started": "2024-05-06T10:00:00.000+0000", "timeSpentSeconds": 900}
                ]}"#,
            )
            .create_async()
            .await;

        let jira = jira_for(&server);
        let worklogs = jira.issue_worklogs("AB-1").await.unwrap();
        assert_eq!(worklogs.len(), 2);
        assert_eq!(worklogs[0].author, "jdoe");
        assert_eq!(worklogs[0].time_spent_seconds, 3600);
    }

    #[tokio::test]
    async fn test_pipeline_filters_authors_case_insensitively() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/rest/api/2/search")
            .with_status(200)
            .with_body(r#"{"issues": [{"key": "AB-1", "fields": {"summary": "First ticket"}}]}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/rest/api/2/issue/AB-1/worklog")
            .with_status(200)
            .with_body(
                r#"{"worklogs": [
                    {"author": {"name": "Jdoe"}, "started": "2024-05-06T09:00:00.000+0000", "timeSpentSeconds": 3600},
                    {"author": {"name": "stranger"}, "started": "2024-05-06T10:00:00.000+0000", "timeSpentSeconds": 900}
                ]}"#,
            )
            .create_async()
            .await;

        let jira = jira_for(&server);
        let request = FetchRequest::new(vec!["jdoe".to_string()], 30);
        let data = fetch_worklog_data(&jira, &request).await.unwrap();

        assert_eq!(data.worklogs.len(), 1);
        assert_eq!(data.worklogs[0].author, "Jdoe");
        assert_eq!(data.worklogs[0].date, "2024-05-06");
        assert_eq!(data.usernames, vec!["jdoe"]);
    }

    #[tokio::test]
    async fn test_pipeline_skips_issues_with_failed_worklog_fetch() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/rest/api/2/search")
            .with_status(200)
            .with_body(SEARCH_BODY)
            .create_async()
            .await;
        server
            .mock("GET", "/rest/api/2/issue/AB-1/worklog")
            .with_status(200)
            .with_body(r#"{"worklogs": [{"author": {"name": "jdoe"}, "started": "2024-05-06T09:00:00.000+0000", "timeSpentSeconds": 3600}]}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/rest/api/2/issue/AB-2/worklog")
            .with_status(500)
            .create_async()
            .await;

        let jira = jira_for(&server);
        let request = FetchRequest::new(vec!["jdoe".to_string()], 30);
        let data = fetch_worklog_data(&jira, &request).await.unwrap();

        // AB-2 is skipped, not fatal; its metadata survives from the search.
        assert_eq!(data.worklogs.len(), 1);
        assert_eq!(data.worklogs[0].key, "AB-1");
        assert_eq!(data.ticket_info.len(), 2);
        assert_eq!(data.ticket_info["AB-2"].summary, "No title available");
    }

    #[tokio::test]
    async fn test_pipeline_returns_empty_success_when_every_fetch_fails() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/rest/api/2/search")
            .with_status(200)
            .with_body(SEARCH_BODY)
            .create_async()
            .await;
        server
            .mock("GET", "/rest/api/2/issue/AB-1/worklog")
            .with_status(500)
            .create_async()
            .await;
        server
            .mock("GET", "/rest/api/2/issue/AB-2/worklog")
            .with_status(500)
            .create_async()
            .await;

        let jira = jira_for(&server);
        let request = FetchRequest::new(vec!["jdoe".to_string()], 30);
        let data = fetch_worklog_data(&jira, &request).await.unwrap();

        assert!(data.worklogs.is_empty());
        assert_eq!(data.ticket_info.len(), 2);
        assert_eq!(data.usernames, vec!["jdoe"]);
    }

    #[tokio::test]
    async fn test_pipeline_rejects_empty_usernames() {
        let jira = Jira::new(&JiraConfig {
            api_url: "http://127.0.0.1:1".to_string(),
            token: "test-token".to_string(),
        })
        .unwrap();

        let request = FetchRequest::new(vec![], 30);
        let err = fetch_worklog_data(&jira, &request).await.unwrap_err();
        assert!(matches!(err, WorklensError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_pipeline_merges_in_search_order() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/rest/api/2/search")
            .with_status(200)
            .with_body(r#"{"issues": [{"key": "AB-2", "fields": {"summary": "Second"}}, {"key": "AB-1", "fields": {"summary": "First"}}]}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/rest/api/2/issue/AB-2/worklog")
            .with_status(200)
            .with_body(r#"{"worklogs": [{"author": {"name": "jdoe"}, "started": "2024-05-07T09:00:00.000+0000", "timeSpentSeconds": 900}]}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/rest/api/2/issue/AB-1/worklog")
            .with_status(200)
            .with_body(r#"{"worklogs": [{"author": {"name": "jdoe"}, "started": "2024-05-06T09:00:00.000+0000", "timeSpentSeconds": 3600}]}"#)
            .create_async()
            .await;

        let jira = jira_for(&server);
        let request = FetchRequest::new(vec!["jdoe".to_string()], 30);
        let data = fetch_worklog_data(&jira, &request).await.unwrap();

        // Search order, not alphabetical and not completion order.
        let keys: Vec<&str> = data.worklogs.iter().map(|w| w.key.as_str()).collect();
        assert_eq!(keys, vec!["AB-2", "AB-1"]);
    }

    #[test]
    fn test_fetch_request_days_defaults_to_30_in_json() {
        let request: FetchRequest = serde_json::from_str(r#"{"usernames": ["jdoe"]}"#).unwrap();
        assert_eq!(request.days, 30);
        assert!(request.validate().is_ok());

        let zero_days = FetchRequest::new(vec!["jdoe".to_string()], 0);
        assert!(zero_days.validate().is_err());
    }
}
