//! End-to-end upload behavior through a real listener.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tower_http::services::ServeDir;

use spyglass::http::Delegate;

mod common;

#[tokio::test]
async fn put_upload_roundtrips_through_static_serving() {
    let dir = common::temp_dir();
    let addr = common::start_server(common::upload_delegate(&dir)).await;
    let client = common::client();

    let put = client
        .put(format!("http://{addr}/foo.txt"))
        .body("hello")
        .send()
        .await
        .expect("server reachable");
    assert_eq!(put.status(), 200);
    assert_eq!(std::fs::read_to_string(dir.join("foo.txt")).unwrap(), "hello");

    let get = client
        .get(format!("http://{addr}/foo.txt"))
        .send()
        .await
        .unwrap();
    assert_eq!(get.status(), 200);
    assert_eq!(get.text().await.unwrap(), "hello");

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn percent_encoded_put_roundtrips_through_static_serving() {
    let dir = common::temp_dir();
    let addr = common::start_server(common::upload_delegate(&dir)).await;
    let client = common::client();

    let put = client
        .put(format!("http://{addr}/foo%20bar.txt"))
        .body("hello")
        .send()
        .await
        .expect("server reachable");
    assert_eq!(put.status(), 200);

    // The upload lands under the decoded name, which is also where
    // ServeDir resolves the encoded GET path.
    assert_eq!(
        std::fs::read_to_string(dir.join("foo bar.txt")).unwrap(),
        "hello"
    );
    let get = client
        .get(format!("http://{addr}/foo%20bar.txt"))
        .send()
        .await
        .unwrap();
    assert_eq!(get.status(), 200);
    assert_eq!(get.text().await.unwrap(), "hello");

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn multipart_form_upload_writes_declared_filename() {
    let dir = common::temp_dir();
    let addr = common::start_server(common::upload_delegate(&dir)).await;

    let form = reqwest::multipart::Form::new().part(
        "file",
        reqwest::multipart::Part::text("world").file_name("bar.txt"),
    );
    let response = common::client()
        .post(format!("http://{addr}/"))
        .multipart(form)
        .send()
        .await
        .expect("server reachable");

    assert_eq!(response.status(), 200);
    assert_eq!(std::fs::read_to_string(dir.join("bar.txt")).unwrap(), "world");

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn sequential_uploads_replace_content_whole() {
    let dir = common::temp_dir();
    let addr = common::start_server(common::upload_delegate(&dir)).await;
    let client = common::client();

    for body in ["the first, longer content", "short"] {
        let response = client
            .put(format!("http://{addr}/note.txt"))
            .body(body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    assert_eq!(std::fs::read_to_string(dir.join("note.txt")).unwrap(), "short");

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn raw_traversal_put_is_rejected() {
    let dir = common::temp_dir();
    let addr = common::start_server(common::upload_delegate(&dir)).await;

    // reqwest normalizes dot segments away, so speak raw HTTP to deliver
    // the hostile path untouched.
    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(
            b"PUT /../evil.txt HTTP/1.1\r\n\
              Host: localhost\r\n\
              Content-Length: 4\r\n\
              Connection: close\r\n\
              \r\n\
              nope",
        )
        .await
        .unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    assert!(
        response.starts_with("HTTP/1.1 400"),
        "traversal must be rejected, got: {response}"
    );
    assert!(!dir.parent().unwrap().join("evil.txt").exists());
    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn put_without_upload_mode_writes_nothing() {
    let dir = common::temp_dir();
    let addr = common::start_server(Delegate::Files(ServeDir::new(&dir))).await;

    let response = common::client()
        .put(format!("http://{addr}/foo.txt"))
        .body("hello")
        .send()
        .await
        .unwrap();

    assert!(response.status().is_client_error());
    assert!(!dir.join("foo.txt").exists());

    let _ = std::fs::remove_dir_all(&dir);
}
