//! Local HTTP server standing in for the iTunes endpoint and artwork hosts

use std::io::Cursor;
use std::net::TcpListener;
use std::thread;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use tiny_http::{Header, Response, Server};

pub type TestResponse = Response<Cursor<Vec<u8>>>;

/// Serve every request with `handler(url, base_url)` and return the base URL
pub fn spawn<F>(handler: F) -> String
where
    F: Fn(&str, &str) -> TestResponse + Send + 'static,
{
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let base = format!("http://{}", addr);

    let base_url = base.clone();
    thread::spawn(move || {
        for request in server.incoming_requests() {
            let response = handler(request.url(), &base_url);
            let _ = request.respond(response);
        }
    });

    base
}

/// Base URL of a port nothing listens on
pub fn closed_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn json(body: String) -> TestResponse {
    let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
    Response::from_string(body).with_header(header)
}

/// Search response body with `count` results pointing at `<base>/art/<i>.png`
pub fn artwork_body(base: &str, count: usize) -> String {
    let results: Vec<serde_json::Value> = (0..count)
        .map(|i| serde_json::json!({ "artworkUrl100": format!("{}/art/{}.png", base, i) }))
        .collect();
    serde_json::json!({ "resultCount": count, "results": results }).to_string()
}

/// A tiny PNG whose red channel encodes `shade`
pub fn png_bytes(shade: u8) -> Vec<u8> {
    let img = RgbaImage::from_pixel(4, 4, Rgba([shade, 0, 0, 255]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}
