//! Minimal canned HTTP server for exercising the Yahoo provider over a real
//! socket.
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

use reqwest::blocking::Client;
use stock_feed::provider::YahooProvider;

/// One canned reply: status code and JSON body.
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn ok(body: impl Into<String>) -> Self {
        Self { status: 200, body: body.into() }
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }
}

/// Serves `replies` in order, one per connection, then stops accepting.
///
/// Returns the base URL and the request lines that were received.
pub fn serve(replies: Vec<Reply>) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
    let base_url = format!("http://{}", listener.local_addr().expect("local addr"));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_by_server = Arc::clone(&seen);

    thread::spawn(move || {
        for reply in replies {
            let Ok((stream, _)) = listener.accept() else {
                return;
            };
            let mut reader = BufReader::new(stream);
            let mut request_line = String::new();
            if reader.read_line(&mut request_line).is_err() {
                return;
            }
            seen_by_server.lock().unwrap().push(request_line.trim().to_string());
            loop {
                let mut header = String::new();
                match reader.read_line(&mut header) {
                    Ok(0) => break,
                    Ok(_) if header == "\r\n" => break,
                    Ok(_) => continue,
                    Err(_) => return,
                }
            }
            let mut stream = reader.into_inner();
            let response = format!(
                "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                reply.status,
                reply.body.len(),
                reply.body
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
    });

    (base_url, seen)
}

/// Provider pointed at `base_url`, bypassing any system proxy.
pub fn provider(base_url: &str) -> YahooProvider {
    let client = Client::builder().no_proxy().build().expect("client");
    YahooProvider::with_client(base_url, client)
}

pub fn chart_body(price: f64, previous_close: f64) -> String {
    format!(
        r#"{{"chart":{{"result":[{{"meta":{{"currency":"USD","regularMarketPrice":{price},
        "chartPreviousClose":{previous_close},"regularMarketDayHigh":151.0,"regularMarketDayLow":147.0,
        "fiftyTwoWeekHigh":199.0,"fiftyTwoWeekLow":124.0}},
        "timestamp":[1772461800,1772465400,1772469000,1772472600],
        "indicators":{{"quote":[{{"close":[420.1,421.7,null,419.9]}}]}}}}],"error":null}}}}"#
    )
}

pub const NOT_FOUND: &str = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
