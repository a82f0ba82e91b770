#![allow(dead_code)]

use folio_admin::core::notify::RecordingNotifier;
use folio_admin::domain::ports::ProgressObserver;
use folio_admin::{ApiClient, Session};
use httpmock::MockServer;
use std::sync::{Arc, Mutex};

pub fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.base_url(), Session::in_memory()).expect("client")
}

pub fn authed_client_for(server: &MockServer, token: &str) -> ApiClient {
    let session = Session::in_memory();
    session.set_token(token).expect("token");
    ApiClient::new(&server.base_url(), session).expect("client")
}

pub fn recorder() -> Arc<RecordingNotifier> {
    Arc::new(RecordingNotifier::default())
}

/// Observer that keeps every percentage it is given.
pub fn progress_log() -> (Arc<dyn ProgressObserver>, Arc<Mutex<Vec<u8>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let observer: Arc<dyn ProgressObserver> = Arc::new(move |pct: u8| {
        sink.lock().unwrap().push(pct);
    });
    (observer, seen)
}

pub fn yes(_: &str) -> bool {
    true
}

pub fn no(_: &str) -> bool {
    false
}
