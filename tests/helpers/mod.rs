mod test_app;

pub use test_app::{FakeClusterCli, TestApp, TestResponse};

#[allow(dead_code)]
pub const DEV_PROFILE: &str = "[dev]\naws_access_key_id = AKIADEVEXAMPLE\naws_secret_access_key = devsecret\n";
