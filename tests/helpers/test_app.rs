use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use kubecreds::{
    AppError, AppState, ClusterCli, CredentialsFile, FlashKey, KubeconfigFile, ProfileStore,
    Profiles, Views, create_app,
};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::ServiceExt;

/// Scripted stand-in for the aws CLI
pub struct FakeClusterCli {
    clusters: Mutex<Result<Vec<String>, String>>,
    update: Mutex<Result<(), String>>,
    calls: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl FakeClusterCli {
    pub fn new() -> Self {
        Self {
            clusters: Mutex::new(Ok(Vec::new())),
            update: Mutex::new(Ok(())),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_clusters(&self, clusters: &[&str]) {
        *self.clusters.lock().unwrap() = Ok(clusters.iter().map(|c| c.to_string()).collect());
    }

    pub fn fail_list(&self, message: &str) {
        *self.clusters.lock().unwrap() = Err(message.to_string());
    }

    pub fn fail_update(&self, message: &str) {
        *self.update.lock().unwrap() = Err(message.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ClusterCli for FakeClusterCli {
    async fn list_clusters(&self, profile: &str) -> Result<Vec<String>, AppError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("list-clusters {}", profile));
        self.clusters.lock().unwrap().clone().map_err(|stderr| {
            AppError::ExternalCommand(format!("Failed to list clusters: {}", stderr))
        })
    }

    async fn update_kubeconfig(
        &self,
        profile: &str,
        cluster: &str,
        alias: &str,
    ) -> Result<(), AppError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("update-kubeconfig {} {} {}", profile, cluster, alias));
        self.update.lock().unwrap().clone().map_err(|stderr| {
            AppError::ExternalCommand(format!("Failed to create kubeconfig: {}", stderr))
        })
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

#[allow(dead_code)]
impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// `name=value` part of the flash cookie set by this response
    pub fn flash_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter(|v| !v.contains("Max-Age=0"))
            .filter_map(|v| v.split(';').next())
            .map(str::to_string)
            .next()
    }
}

/// The production router over temp-dir stores and a fake aws CLI
#[allow(dead_code)]
pub struct TestApp {
    pub dir: TempDir,
    pub credentials_path: PathBuf,
    pub kubeconfig_path: PathBuf,
    pub cli: Arc<FakeClusterCli>,
    app: Router,
}

#[allow(dead_code)]
impl TestApp {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let credentials_path = dir.path().join(".aws").join("credentials");
        let kubeconfig_path = dir.path().join(".kube").join("config");

        let store: Arc<dyn ProfileStore> = Arc::new(CredentialsFile::new(&credentials_path));
        Self::with_store(dir, credentials_path, kubeconfig_path, store)
    }

    pub fn with_store(
        dir: TempDir,
        credentials_path: PathBuf,
        kubeconfig_path: PathBuf,
        store: Arc<dyn ProfileStore>,
    ) -> Self {
        let cli = Arc::new(FakeClusterCli::new());

        let app_state = AppState::new(
            store,
            KubeconfigFile::new(&kubeconfig_path),
            cli.clone(),
            FlashKey::new(b"test-secret").unwrap(),
            Views::new().unwrap(),
            credentials_path.display().to_string(),
        );

        // Use the ACTUAL production create_app function
        let app = create_app(app_state);

        TestApp {
            dir,
            credentials_path,
            kubeconfig_path,
            cli,
            app,
        }
    }

    pub fn write_credentials(&self, content: &str) {
        std::fs::create_dir_all(self.credentials_path.parent().unwrap()).unwrap();
        std::fs::write(&self.credentials_path, content).unwrap();
    }

    pub fn write_kubeconfig(&self, content: &str) {
        std::fs::create_dir_all(self.kubeconfig_path.parent().unwrap()).unwrap();
        std::fs::write(&self.kubeconfig_path, content).unwrap();
    }

    pub fn read_credentials_raw(&self) -> String {
        std::fs::read_to_string(&self.credentials_path).unwrap_or_default()
    }

    pub async fn profiles(&self) -> Profiles {
        CredentialsFile::new(&self.credentials_path)
            .read()
            .await
            .unwrap()
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        let mut request = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.send(request.body(Body::empty()).unwrap()).await
    }

    /// POST an urlencoded form; `fields` are encoded here
    pub async fn post_form(&self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Follow a redirect response to the page that shows its notices
    pub async fn follow(&self, response: &TestResponse) -> TestResponse {
        assert_eq!(response.status, StatusCode::SEE_OTHER, "expected a redirect");
        let location = response.location().expect("redirect without location");
        let cookie = response.flash_cookie();
        self.get(location, cookie.as_deref()).await
    }
}

fn encode(value: &str) -> String {
    percent_encoding::utf8_percent_encode(value, percent_encoding::NON_ALPHANUMERIC).to_string()
}
