//! Session lifecycle and error-normalization tests against a canned-response
//! HTTP stub on a random local port.
//!
//! The stub answers each incoming connection with the next scripted
//! response and records the raw request text, so tests can assert both the
//! client's classification of responses and the exact bytes it sends
//! (cookie replay, form encoding).

use nils_api::types::DateRange;
use nils_api::{CostLineQuery, ErrorSink, NilsClient, NilsError, NilsOptions, Password};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

struct Canned {
    status: u16,
    reason: &'static str,
    headers: Vec<(String, String)>,
    body: String,
}

impl Canned {
    fn json(status: u16, reason: &'static str, body: &str) -> Self {
        Self {
            status,
            reason,
            headers: vec![("Content-Type".into(), "application/json".into())],
            body: body.into(),
        }
    }

    fn login_ok(cookie: &str) -> Self {
        let mut canned = Self::json(
            200,
            "OK",
            r#"{"id":"u1","user_id":"SA_TPT","email":"sa@example.com",
                "full_name":"Service Account","active":true,"admin":false,
                "userRoles":["PLANNER"],"userCompany":["GTC"]}"#,
        );
        canned
            .headers
            .push(("Set-Cookie".into(), cookie.to_string()));
        canned
    }

    fn empty(status: u16, reason: &'static str) -> Self {
        Self {
            status,
            reason,
            headers: Vec::new(),
            body: String::new(),
        }
    }
}

struct StubNils {
    host: String,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubNils {
    /// Serve the scripted responses, one connection each, then stop.
    fn serve(responses: Vec<Canned>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let host = format!("http://{}", listener.local_addr().unwrap());
        let hits = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let (thread_hits, thread_requests) = (Arc::clone(&hits), Arc::clone(&requests));

        thread::spawn(move || {
            for canned in responses {
                let Ok((mut stream, _)) = listener.accept() else {
                    return;
                };
                let raw = read_request(&mut stream);
                thread_requests.lock().unwrap().push(raw);
                thread_hits.fetch_add(1, Ordering::SeqCst);

                let mut head = format!(
                    "HTTP/1.1 {} {}\r\nConnection: close\r\nContent-Length: {}\r\n",
                    canned.status,
                    canned.reason,
                    canned.body.len()
                );
                for (name, value) in &canned.headers {
                    head.push_str(&format!("{name}: {value}\r\n"));
                }
                head.push_str("\r\n");
                let _ = stream.write_all(head.as_bytes());
                let _ = stream.write_all(canned.body.as_bytes());
            }
        });

        Self {
            host,
            hits,
            requests,
        }
    }

    fn client(&self) -> NilsClient {
        NilsClient::new(NilsOptions::new(
            &self.host,
            "sa@example.com",
            Password::Hashed("35bac76dcc2bec3dff074e6362a689ba".into()),
        ))
        .unwrap()
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn request(&self, index: usize) -> String {
        self.requests.lock().unwrap()[index].to_ascii_lowercase()
    }
}

/// Read one full HTTP request (headers + content-length body) as text.
fn read_request(stream: &mut TcpStream) -> String {
    let mut reader = BufReader::new(stream);
    let mut raw = String::new();
    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 {
            return raw;
        }
        if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
            content_length = value.trim().parse().unwrap_or(0);
        }
        let end_of_headers = line == "\r\n";
        raw.push_str(&line);
        if end_of_headers {
            break;
        }
    }
    let mut body = vec![0u8; content_length];
    if content_length > 0 && reader.read_exact(&mut body).is_ok() {
        raw.push_str(&String::from_utf8_lossy(&body));
    }
    raw
}

#[derive(Default)]
struct Recorder(Mutex<Vec<String>>);

impl ErrorSink for Recorder {
    fn report(&self, error: &NilsError) {
        self.0.lock().unwrap().push(error.to_string());
    }
}

#[test]
fn login_caches_user_and_cookie() {
    let stub = StubNils::serve(vec![Canned::login_ok("JSESSIONID=abc123; Path=/")]);
    let client = stub.client();

    let user = client.login(false).unwrap();
    assert_eq!(user.email, "sa@example.com");
    assert!(client.is_logged_in());

    // Second login must not touch the network.
    let cached = client.login(false).unwrap();
    assert_eq!(cached.id, user.id);
    assert_eq!(stub.hits(), 1);

    // The login request carries the credentials as JSON.
    let login_request = stub.request(0);
    assert!(login_request.contains("post /moonshot/as/auth/login"));
    assert!(login_request.contains("\"email\":\"sa@example.com\""));
}

#[test]
fn forced_login_reissues_the_request() {
    let stub = StubNils::serve(vec![
        Canned::login_ok("JSESSIONID=a; Path=/"),
        Canned::login_ok("JSESSIONID=b; Path=/"),
    ]);
    let client = stub.client();

    client.login(false).unwrap();
    client.login(true).unwrap();
    assert_eq!(stub.hits(), 2);
}

#[test]
fn cookie_is_replayed_on_subsequent_calls() {
    let stub = StubNils::serve(vec![
        Canned::login_ok("JSESSIONID=abc123; Path=/"),
        Canned::json(200, "OK", "{}"),
    ]);
    let client = stub.client();

    assert!(client.tpt_sync_job("J-1").unwrap());
    assert_eq!(stub.hits(), 2);

    let sync_request = stub.request(1);
    assert!(sync_request.contains("post /moonshot/as/tpt/syn-job?jobno=j-1"));
    assert!(sync_request.contains("cookie: jsessionid=abc123; path=/"));
}

#[test]
fn unauthorized_clears_session_and_next_call_relogs() {
    let stub = StubNils::serve(vec![
        Canned::login_ok("JSESSIONID=stale; Path=/"),
        Canned::json(401, "Unauthorized", "{}"),
        Canned::login_ok("JSESSIONID=fresh; Path=/"),
        Canned::json(
            200,
            "OK",
            r#"{"draw":1,"recordsTotal":1,"recordsFiltered":1,
                "data":[{"id":"L1","locationCode":"NLRTM"}]}"#,
        ),
    ]);
    let client = stub.client();

    client.login(false).unwrap();
    let err = client.list_locations(0, 1500).unwrap_err();
    assert_eq!(err.to_string(), "Unknown NILS error");
    assert!(!client.is_logged_in());

    // The next call logs in again before hitting the endpoint.
    let page = client.list_locations(0, 1500).unwrap().unwrap();
    assert_eq!(page.records_total, 1);
    assert_eq!(stub.hits(), 4);
    assert!(stub.request(2).contains("post /moonshot/as/auth/login"));
    assert!(stub.request(3).contains("cookie: jsessionid=fresh"));
}

#[test]
fn server_error_body_is_normalized() {
    let stub = StubNils::serve(vec![
        Canned::login_ok("JSESSIONID=abc; Path=/"),
        Canned::json(500, "Internal Server Error", r#"{"message":"X"}"#),
    ]);
    let recorder = Arc::new(Recorder::default());
    let client = NilsClient::new(
        NilsOptions::new(&stub.host, "sa@example.com", Password::Hashed("h".into()))
            .with_error_sink(Arc::clone(&recorder) as Arc<dyn ErrorSink>),
    )
    .unwrap();

    let err = client.cost_lines(&CostLineQuery::new(4711)).unwrap_err();
    match &err {
        NilsError::Api(body) => {
            assert_eq!(body.status, 500);
            assert_eq!(body.message, Some(serde_json::json!("X")));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    assert!(err.to_string().contains("X"));

    // 500 keeps the session; only 401/403 drop it.
    assert!(client.is_logged_in());

    // The sink observed the error.
    let seen = recorder.0.lock().unwrap();
    assert!(seen.iter().any(|msg| msg.contains("X")));
}

#[test]
fn server_error_without_body_is_unknown() {
    let stub = StubNils::serve(vec![
        Canned::login_ok("JSESSIONID=abc; Path=/"),
        Canned::empty(500, "Internal Server Error"),
    ]);
    let client = stub.client();

    let err = client.tat_sync_all_equipment(DateRange::default()).unwrap_err();
    assert_eq!(err.to_string(), "Unknown NILS error");
}

#[test]
fn failed_login_surfaces_as_not_logged_in() {
    let stub = StubNils::serve(vec![Canned::json(
        403,
        "Forbidden",
        r#"{"message":"bad credentials"}"#,
    )]);
    let client = stub.client();

    let err = client.list_commodities(0, 500).unwrap_err();
    assert!(matches!(err, NilsError::NotLoggedIn));
    assert_eq!(err.to_string(), "could not retrieve user or login");
}

#[test]
fn connectivity_failure_names_the_host() {
    // Bind then drop to obtain a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let host = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = NilsClient::new(NilsOptions::new(
        &host,
        "sa@example.com",
        Password::Hashed("h".into()),
    ))
    .unwrap();

    let err = client.login(false).unwrap_err();
    assert!(err.to_string().contains(&host), "got: {err}");
}

#[test]
fn cost_line_form_carries_the_search_filter() {
    let stub = StubNils::serve(vec![
        Canned::login_ok("JSESSIONID=abc; Path=/"),
        Canned::json(200, "OK", r#"{"data":[{"JCL_job_no":4711}]}"#),
    ]);
    let client = stub.client();

    let mut query = CostLineQuery::new(4711);
    query.consignment_no = Some(1);
    let lines = client.cost_lines(&query).unwrap().unwrap();
    assert_eq!(lines.len(), 1);

    let request = stub.request(1);
    assert!(request.contains("post /moonshot/as/operationcostline/list-cost-line"));
    assert!(request.contains("start=0"));
    assert!(request.contains("length=1500"));
    assert!(request.contains("responsefieldsrequired=true"));
    // `search[value]` arrives URL-encoded with the JSON filter inside.
    assert!(request.contains("search%5bvalue%5d="));
    assert!(request.contains("jcl_job_no"));
}

#[test]
fn ranged_sync_sends_both_bounds() {
    let stub = StubNils::serve(vec![
        Canned::login_ok("JSESSIONID=abc; Path=/"),
        Canned::json(200, "OK", "{}"),
    ]);
    let client = stub.client();

    client
        .tpt_sync_all_jobs(DateRange::between(1_656_453_600_000, 1_659_045_600_000))
        .unwrap();
    let request = stub.request(1);
    assert!(request.contains("fromdate=1656453600000"));
    assert!(request.contains("todate=1659045600000"));
}

#[test]
fn vendor_assignment_is_sent_as_json_put() {
    let stub = StubNils::serve(vec![
        Canned::login_ok("JSESSIONID=abc; Path=/"),
        Canned::json(200, "OK", "true"),
    ]);
    let client = stub.client();

    let assignment = nils_api::VendorAssignment {
        job_route_activity_no: "JRA-1".into(),
        job_activity_service_no: 7,
        vendor_code: "V042".into(),
        planned: true,
        confirmed: false,
        user_id: "sa".into(),
    };
    assert!(client.update_trucking_vendor_for_job(&assignment).unwrap());

    let request = stub.request(1);
    assert!(request.contains("put /moonshot/as/op-job/update-trucking-vendor-for-job-route"));
    assert!(request.contains("\"vendorcode\":\"v042\""));
}
