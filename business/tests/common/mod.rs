//! Shared fixtures: an [`AdminConsole`] pointed at a wiremock server plus reqres-shaped
//! responses.

#![allow(dead_code)]

use std::time::Duration;

use roster_business::{AdminConsole, BusinessConfig, MemoryTokenStore};
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

pub const REQRES_EMAIL: &str = "eve.holt@reqres.in";
pub const REQRES_PASSWORD: &str = "cityslicka";
pub const REQRES_TOKEN: &str = "QpwL5tke4Pnpja7X4";

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub struct TestContext {
    pub mock_server: MockServer,
    pub console: AdminConsole,
}

impl TestContext {
    /// Signed-out console.
    pub async fn new() -> Self {
        Self::with_store(MemoryTokenStore::new(), 10).await
    }

    /// Console whose session already holds `token`.
    pub async fn signed_in(token: &str) -> Self {
        Self::with_store(MemoryTokenStore::with_token(token), 10).await
    }

    pub async fn with_store(store: MemoryTokenStore, page_size: u32) -> Self {
        init_logging();
        let mock_server = MockServer::start().await;
        let config = BusinessConfig::new(mock_server.uri()).with_page_size(page_size);
        let console = AdminConsole::new(config, store);
        Self {
            mock_server,
            console,
        }
    }

    pub async fn mock_login_success(&self, token: &str) {
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": token })))
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_login_failure(&self, status: u16, error: &str) {
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "error": error })))
            .mount(&self.mock_server)
            .await;
    }

    /// Serve `users` for `page`, `times` times (forever when `None`).
    pub async fn mock_users_page(
        &self,
        page: u32,
        per_page: u32,
        total: u64,
        users: Vec<Value>,
        times: Option<u64>,
    ) {
        self.mock_users_page_delayed(page, per_page, total, users, times, Duration::ZERO)
            .await;
    }

    pub async fn mock_users_page_delayed(
        &self,
        page: u32,
        per_page: u32,
        total: u64,
        users: Vec<Value>,
        times: Option<u64>,
        delay: Duration,
    ) {
        let response = ResponseTemplate::new(200)
            .set_body_json(page_json(page, per_page, total, users))
            .set_delay(delay);
        let mock = Mock::given(method("GET"))
            .and(path("/users"))
            .and(query_param("page", page.to_string()))
            .respond_with(response);
        let mock = match times {
            Some(n) => mock.up_to_n_times(n),
            None => mock,
        };
        mock.mount(&self.mock_server).await;
    }

    pub async fn mock_users_error(&self, page: u32, status: u16) {
        Mock::given(method("GET"))
            .and(path("/users"))
            .and(query_param("page", page.to_string()))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_update(&self, id: u64, status: u16, body: Value, delay: Duration) {
        Mock::given(method("PUT"))
            .and(path(format!("/users/{id}")))
            .respond_with(
                ResponseTemplate::new(status)
                    .set_body_json(body)
                    .set_delay(delay),
            )
            .up_to_n_times(1)
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_delete(&self, id: u64, status: u16) {
        self.mock_delete_delayed(id, status, Duration::ZERO).await;
    }

    pub async fn mock_delete_delayed(&self, id: u64, status: u16, delay: Duration) {
        Mock::given(method("DELETE"))
            .and(path(format!("/users/{id}")))
            .respond_with(ResponseTemplate::new(status).set_delay(delay))
            .up_to_n_times(1)
            .mount(&self.mock_server)
            .await;
    }

    /// Requests received so far with the given method.
    pub async fn requests_with_method(&self, verb: &str) -> Vec<wiremock::Request> {
        self.mock_server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.method.as_str() == verb)
            .collect()
    }

    /// Load page 1 with `users` as the only page.
    pub async fn load_first_page(&self, users: Vec<Value>) {
        let total = users.len() as u64;
        self.mock_users_page(1, 10, total, users, Some(1)).await;
        self.console
            .list()
            .set_window(1, 10)
            .await
            .expect("first page should load");
    }
}

pub fn user_json(id: u64, first: &str, last: &str) -> Value {
    json!({
        "id": id,
        "email": format!("{}.{}@reqres.in", first.to_lowercase(), last.to_lowercase()),
        "first_name": first,
        "last_name": last,
        "avatar": format!("https://reqres.in/img/faces/{id}-image.jpg"),
    })
}

pub fn page_json(page: u32, per_page: u32, total: u64, users: Vec<Value>) -> Value {
    json!({
        "page": page,
        "per_page": per_page,
        "total": total,
        "total_pages": total.div_ceil(u64::from(per_page.max(1))),
        "data": users,
    })
}

pub fn reqres_first_page() -> Vec<Value> {
    vec![
        user_json(1, "George", "Bluth"),
        user_json(2, "Janet", "Weaver"),
        user_json(3, "Emma", "Wong"),
        user_json(4, "Eve", "Holt"),
        user_json(5, "Charles", "Morris"),
        user_json(6, "Tracey", "Ramos"),
    ]
}
