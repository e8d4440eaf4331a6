use crate::config::JiraConfig;
use crate::error::{JiraError, Result};
use crate::models::{
    BacklogData, Comment, CommentRequest, CommentsResponse, Issue, IssuesResponse, RapidView,
    RapidViewsResponse, TimesheetIssue, TimesheetResponse, Transition, TransitionsResponse,
    VisibilityRequest, Worklog, WorklogPayload, WorklogsResponse,
};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client as HttpClient, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

const REST_API_ISSUE: &str = "/rest/api/2/issue/";
const SEARCH_FIELDS: [&str; 6] = ["summary", "status", "updated", "assignee", "issuetype", "priority"];

#[derive(Clone)]
pub struct JiraClient {
    http: HttpClient,
    config: JiraConfig,
}

impl JiraClient {
    pub fn new(config: JiraConfig) -> Result<Self> {
        let http = build_http_client(&config)?;
        Ok(Self { http, config })
    }

    pub async fn get<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.send_with_body(Method::GET, path, Option::<&Value>::None).await
    }

    pub async fn get_with_query<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.url_for(path);
        debug!(%url, "GET");
        let response = self.http.get(url).query(query).send().await?;
        Self::parse_json(response).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_with_body(Method::POST, path, Some(body)).await
    }

    pub async fn send_with_body<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url_for(path);
        debug!(%method, %url, "request");
        let mut request = self.http.request(method, url);
        if let Some(payload) = body {
            request = request.json(payload);
        }
        let response = request.send().await?;
        Self::parse_json(response).await
    }

    pub async fn send_expect_empty<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url_for(path);
        debug!(%method, %url, "request");
        let mut request = self.http.request(method, url);
        if let Some(payload) = body {
            request = request.json(payload);
        }
        let response = request.send().await?;
        Self::ensure_success(response).await
    }

    fn url_for(&self, path: &str) -> String {
        let mut base = self.config.server_root().to_string();
        if !path.starts_with('/') {
            base.push('/');
        }
        base.push_str(path);
        base
    }

    async fn parse_json<T>(response: Response) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body).map_err(JiraError::from)
        } else {
            Err(Self::failure(response).await)
        }
    }

    async fn ensure_success(response: Response) -> Result<()> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::failure(response).await)
        }
    }

    async fn failure(response: Response) -> JiraError {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            JiraError::authentication(status)
        } else {
            let body = response.text().await.unwrap_or_default();
            JiraError::http(status, &body)
        }
    }

    /// Raw timesheet for `[start_date, end_date]`; `target_user` reads someone else's sheet.
    pub async fn get_timesheet(
        &self,
        start_date: &str,
        end_date: &str,
        target_user: Option<&str>,
    ) -> Result<Vec<TimesheetIssue>> {
        let mut query = vec![("startDate", start_date), ("endDate", end_date)];
        if let Some(user) = target_user {
            query.push(("targetUser", user));
        }
        let response: TimesheetResponse = self
            .get_with_query("/rest/timesheet-gadget/1.0/raw-timesheet.json", &query)
            .await?;
        Ok(response.worklog)
    }

    pub async fn add_worklog(&self, issue_key: &str, payload: &WorklogPayload) -> Result<()> {
        let path = format!("{}{}/worklog", REST_API_ISSUE, issue_key.to_uppercase());
        self.send_expect_empty(Method::POST, &path, Some(payload)).await
    }

    pub async fn update_worklog(
        &self,
        issue_key: &str,
        worklog_id: u64,
        payload: &WorklogPayload,
    ) -> Result<()> {
        let path = format!(
            "{}{}/worklog/{}/",
            REST_API_ISSUE,
            issue_key.to_uppercase(),
            worklog_id
        );
        self.send_expect_empty(Method::PUT, &path, Some(payload)).await
    }

    pub async fn get_worklogs(&self, issue_key: &str) -> Result<Vec<Worklog>> {
        let path = format!("{}{}/worklog", REST_API_ISSUE, issue_key.to_uppercase());
        let response: WorklogsResponse = self.get(&path).await?;
        Ok(response.worklogs)
    }

    pub async fn search_issues(&self, jql: &str, max_results: u32) -> Result<Vec<Issue>> {
        let payload = json!({
            "jql": jql,
            "startAt": 0,
            "maxResults": max_results,
            "fields": SEARCH_FIELDS,
        });
        let response: IssuesResponse = self.post("/rest/api/2/search", &payload).await?;
        Ok(response.issues)
    }

    pub async fn get_issue(&self, issue_key: &str) -> Result<Issue> {
        let path = format!("{}{}", REST_API_ISSUE, issue_key.to_uppercase());
        self.get(&path).await
    }

    /// `Ok(false)` on 404, errors for anything else that is not a success.
    pub async fn issue_exists(&self, issue_key: &str) -> Result<bool> {
        let url = self.url_for(&format!("{}{}", REST_API_ISSUE, issue_key.to_uppercase()));
        let response = self
            .http
            .get(url)
            .query(&[("fields", "key")])
            .send()
            .await?;
        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(Self::failure(response).await),
        }
    }

    pub async fn update_description(&self, issue_key: &str, description: &str) -> Result<()> {
        let path = format!("{}{}", REST_API_ISSUE, issue_key.to_uppercase());
        let payload = json!({ "fields": { "description": description } });
        self.send_expect_empty(Method::PUT, &path, Some(&payload)).await
    }

    pub async fn get_comments(&self, issue_key: &str) -> Result<Vec<Comment>> {
        let path = format!("{}{}/comment", REST_API_ISSUE, issue_key.to_uppercase());
        let response: CommentsResponse = self.get(&path).await?;
        Ok(response.comments)
    }

    pub async fn add_comment(
        &self,
        issue_key: &str,
        body: &str,
        visibility_group: Option<&str>,
    ) -> Result<()> {
        let path = format!("{}{}/comment", REST_API_ISSUE, issue_key.to_uppercase());
        let payload = CommentRequest {
            body,
            visibility: visibility_group.map(VisibilityRequest::group),
        };
        self.send_expect_empty(Method::POST, &path, Some(&payload)).await
    }

    pub async fn update_comment(
        &self,
        issue_key: &str,
        comment_id: &str,
        body: &str,
        visibility_group: Option<&str>,
    ) -> Result<()> {
        let path = format!(
            "{}{}/comment/{}",
            REST_API_ISSUE,
            issue_key.to_uppercase(),
            comment_id
        );
        let payload = CommentRequest {
            body,
            visibility: visibility_group.map(VisibilityRequest::group),
        };
        self.send_expect_empty(Method::PUT, &path, Some(&payload)).await
    }

    pub async fn get_transitions(&self, issue_key: &str) -> Result<Vec<Transition>> {
        let path = format!("{}{}/transitions", REST_API_ISSUE, issue_key.to_uppercase());
        let response: TransitionsResponse = self.get(&path).await?;
        Ok(response.transitions)
    }

    pub async fn execute_transition(&self, issue_key: &str, transition_id: &str) -> Result<()> {
        let path = format!("{}{}/transitions", REST_API_ISSUE, issue_key.to_uppercase());
        let payload = json!({ "transition": { "id": transition_id } });
        self.send_expect_empty(Method::POST, &path, Some(&payload)).await
    }

    /// JIRA treats the name `-1` as automatic assignment.
    pub async fn assign_issue(&self, issue_key: &str, username: &str) -> Result<()> {
        let path = format!("{}{}/assignee", REST_API_ISSUE, issue_key.to_uppercase());
        let payload = json!({ "name": username });
        self.send_expect_empty(Method::PUT, &path, Some(&payload)).await
    }

    pub async fn get_rapid_views(&self) -> Result<Vec<RapidView>> {
        let response: RapidViewsResponse = self.get("/rest/greenhopper/1.0/rapidview").await?;
        Ok(response.views)
    }

    pub async fn get_backlog(&self, rapid_view_id: u64) -> Result<BacklogData> {
        let id = rapid_view_id.to_string();
        self.get_with_query(
            "/rest/greenhopper/1.0/xboard/plan/backlog/data.json",
            &[("rapidViewId", id.as_str())],
        )
        .await
    }

    pub async fn get_board_issues(&self, board_id: u64) -> Result<Vec<Issue>> {
        let path = format!("/rest/agile/1.0/board/{}/issue", board_id);
        let response: IssuesResponse = self.get(&path).await?;
        Ok(response.issues)
    }
}

fn build_http_client(config: &JiraConfig) -> Result<HttpClient> {
    let mut headers = HeaderMap::new();

    let credentials = BASE64_STANDARD.encode(format!("{}:{}", config.username, config.password));
    let mut auth_value = header_value(format!("Basic {}", credentials))?;
    auth_value.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth_value);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, header_value(config.user_agent.clone())?);

    HttpClient::builder()
        .default_headers(headers)
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .build()
        .map_err(|err| JiraError::Other(err.to_string()))
}

fn header_value(value: String) -> Result<HeaderValue> {
    HeaderValue::from_str(&value).map_err(|err| JiraError::Other(err.to_string()))
}
