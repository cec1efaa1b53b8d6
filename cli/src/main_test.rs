use super::*;
use floorplan::persist::LocalStorage;

fn offline_ctx(cache_dir: &std::path::Path) -> CliContext {
    CliContext {
        base_url: "http://127.0.0.1:1/".into(),
        viewer_origin: "https://maps.example.com".into(),
        cache_dir: cache_dir.to_path_buf(),
    }
}

#[test]
fn parse_target_accepts_ids_queries_and_links() {
    assert_eq!(parse_target("City Hospital").unwrap(), LoadTarget::Remote("city-hospital".into()));
    assert_eq!(parse_target("building=mall").unwrap(), LoadTarget::Remote("mall".into()));
    assert_eq!(
        parse_target("https://maps.example.com/viewer.html?building=sample").unwrap(),
        LoadTarget::Demo
    );
    assert!(matches!(parse_target("https://maps.example.com/viewer.html?floor=2"), Err(PersistError::InvalidId(_))));
    assert!(matches!(parse_target("!!"), Err(PersistError::InvalidId(_))));
}

#[test]
fn context_url_joins_without_double_slash() {
    let tmp = tempfile::tempdir().expect("tempdir");
    assert_eq!(offline_ctx(tmp.path()).url("/api/buildings"), "http://127.0.0.1:1/api/buildings");
}

#[test]
fn not_found_is_distinct_from_server_errors() {
    assert_eq!(
        remote_error(404, r#"{"success":false,"error":"Building not found"}"#, "mall"),
        PersistError::NotFound("mall".into())
    );
    assert_eq!(
        remote_error(500, r#"{"success":false,"error":"Failed to load building: boom"}"#, "mall"),
        PersistError::Server { status: 500, message: "Failed to load building: boom".into() }
    );
    assert_eq!(
        remote_error(502, "Bad Gateway", "mall"),
        PersistError::Server { status: 502, message: "Bad Gateway".into() }
    );
}

#[test]
fn describe_names_the_source() {
    let building = demo_building().unwrap();
    assert_eq!(
        describe(&building, LoadSource::Cache),
        "Centaurus Shopping Mall (sample) from offline cache: 3 floors, 23 objects"
    );
}

#[tokio::test]
async fn demo_target_never_touches_the_network() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let (building, source) = load_target(&offline_ctx(tmp.path()), &LoadTarget::Demo).await.unwrap();
    assert_eq!(source, LoadSource::Demo);
    assert_eq!(building.floors.len(), 3);
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let err = fetch_building(&offline_ctx(tmp.path()), "mall").await.unwrap_err();
    assert!(matches!(err, PersistError::Transport(_)));
}

#[tokio::test]
async fn unreachable_server_falls_back_to_cached_copy() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let mut building = demo_building().unwrap();
    building.building_id = "mall".into();
    let mut storage = FileStorage::new(tmp.path());
    storage
        .set(&floorplan::persist::cache_key("mall"), &building.to_json().unwrap())
        .unwrap();

    let target = LoadTarget::Remote("mall".into());
    let (loaded, source) = load_target(&offline_ctx(tmp.path()), &target).await.unwrap();
    assert_eq!(source, LoadSource::Cache);
    assert_eq!(loaded, building);
}

#[tokio::test]
async fn unreachable_server_without_cache_reports_the_error() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let target = LoadTarget::Remote("mall".into());
    let err = load_target(&offline_ctx(tmp.path()), &target).await.unwrap_err();
    assert!(matches!(err, CliError::Persist(PersistError::Transport(_))));
}

/// Serve exactly one request with a canned response on an ephemeral port.
fn one_shot_server(status_line: &'static str, body: &'static str) -> String {
    use std::io::{BufRead, BufReader, Read, Write};

    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    std::thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream);
        let mut content_length = 0;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).expect("read header");
            if line == "\r\n" || line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':')
                && name.eq_ignore_ascii_case("content-length")
            {
                content_length = value.trim().parse().expect("content length");
            }
        }
        let mut request_body = vec![0; content_length];
        reader.read_exact(&mut request_body).expect("read body");
        let response = format!(
            "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        reader.get_mut().write_all(response.as_bytes()).expect("write response");
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn accepted_save_is_cached_under_its_id() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let mut ctx = offline_ctx(tmp.path());
    ctx.base_url = one_shot_server(
        "HTTP/1.1 200 OK",
        r#"{"success":true,"buildingId":"mall","message":"Building saved successfully"}"#,
    );
    let mut building = demo_building().unwrap();
    building.building_id = "mall".into();

    let json = post_building(&ctx, "mall", &building).await.unwrap();
    assert_eq!(json["buildingId"], "mall");

    let target = LoadTarget::Remote("mall".into());
    let (loaded, source) = load_target(&offline_ctx(tmp.path()), &target).await.unwrap();
    assert_eq!(source, LoadSource::Cache);
    assert_eq!(loaded, building);
}

#[tokio::test]
async fn rejected_save_is_not_cached() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let mut ctx = offline_ctx(tmp.path());
    ctx.base_url = one_shot_server(
        "HTTP/1.1 400 Bad Request",
        r#"{"success":false,"error":"Invalid building data. Must include version, name, and floors."}"#,
    );
    let building = demo_building().unwrap();

    let err = post_building(&ctx, "mall", &building).await.unwrap_err();
    assert!(matches!(err, CliError::Persist(PersistError::Server { status: 400, .. })));
    assert!(!FileStorage::new(tmp.path()).dir().join(format!("{}.json", floorplan::persist::cache_key("mall"))).exists());
}
