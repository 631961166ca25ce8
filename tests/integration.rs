extern crate htp_box;

use htp_box::config::Config;
use htp_box::http1::connection::{Connection, ConnectionFlags};
use htp_box::http1::hook_point::HookSet;
use htp_box::http1::multipart::{self, MultipartParser, PartType};
use htp_box::http1::request::RequestParser;
use htp_box::http1::response::ResponseParser;
use htp_box::http1::transaction::{BodyLength, Method, Progress, Transaction, TransactionFlags};
use htp_box::http1::StreamResult;
use htp_box::path;
use std::cell::RefCell;
use std::rc::Rc;

/// Scenario 1: a query parameter whose value is a single percent-encoded
/// space survives request-target normalization intact.
#[test]
fn percent_decoded_query_parameter() {
    let config = Config::new();
    let mut parser = RequestParser::new(&config);
    let mut transactions = Vec::new();
    let mut hooks = HookSet::new();

    parser.feed(b"GET /?p=%20 HTTP/1.1\r\nHost: x\r\n\r\n", &mut transactions, &mut hooks, &config);

    let txn = &transactions[0];
    assert_eq!(txn.request_method, Method::Get);
    assert_eq!(txn.request_uri_raw.as_slice(), b"/?p=%20");
    assert_eq!(txn.request_uri_normalized.as_slice(), b"/?p= ");
}

/// Scenario 2: a urlencoded POST body is framed by Content-Length and its
/// raw bytes are delivered to observers unmodified.
#[test]
fn urlencoded_post_body_is_framed_and_delivered() {
    let config = Config::new();
    let mut parser = RequestParser::new(&config);
    let mut transactions = Vec::new();
    let mut hooks = HookSet::new();

    let body_seen = Rc::new(RefCell::new(Vec::new()));
    let body_seen_cb = body_seen.clone();

    hooks.request_body_data.register(move |txn: &mut Transaction| {
        body_seen_cb.borrow_mut().extend_from_slice(&txn.data_chunk);
        htp_box::hooks::CallbackResult::Ok
    });

    let request = b"POST /form HTTP/1.1\r\nHost: x\r\nContent-Type: application/x-www-form-urlencoded\r\nContent-Length: 7\r\n\r\np=hello";

    parser.feed(request, &mut transactions, &mut hooks, &config);

    let txn = &transactions[0];
    assert_eq!(txn.request_method, Method::Post);
    assert_eq!(txn.request_body_length, BodyLength::Identity(7));
    assert_eq!(txn.request_entity_length, 7);
    assert_eq!(body_seen.borrow().as_slice(), b"p=hello");
}

/// Scenario 3: two pipelined GETs followed by two 200 OKs produce two
/// complete transactions and the second request is flagged pipelined.
#[test]
fn pipelined_requests_and_responses() {
    let mut conn = Connection::new(Config::new());

    conn.feed_request(b"GET /a HTTP/1.1\r\nHost: x\r\n\r\nGET /b HTTP/1.1\r\nHost: x\r\n\r\n");
    conn.feed_response(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\nHTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n");

    assert_eq!(conn.transactions().len(), 2);
    assert!(conn.transactions()[0].is_complete());
    assert!(conn.transactions()[1].is_complete());
    assert!(!conn.transactions()[0].flags.contains(TransactionFlags::PIPELINED));
    assert!(conn.transactions()[1].flags.contains(TransactionFlags::PIPELINED));
}

/// Scenario 4: a successful CONNECT establishes a tunnel; the connection
/// stops parsing either direction as HTTP from that point on.
#[test]
fn connect_tunnel_stops_http_parsing() {
    let mut conn = Connection::new(Config::new());

    conn.feed_request(b"CONNECT example.com:443 HTTP/1.1\r\nHost: example.com:443\r\n\r\n");
    conn.feed_response(b"HTTP/1.1 200 OK\r\n\r\n");

    assert_eq!(conn.transactions()[0].request_method, Method::Connect);
    assert!(conn.transactions()[0].is_complete());
    assert!(conn.flags().contains(ConnectionFlags::TUNNEL));

    match conn.feed_request(b"\x16\x03\x01arbitrary binary") {
        StreamResult::Stop(0) => {}
        other => panic!("expected tunnel mode to reject further request parsing, got {:?}", other)
    }

    match conn.feed_response(b"more arbitrary binary") {
        StreamResult::Stop(0) => {}
        other => panic!("expected tunnel mode to reject further response parsing, got {:?}", other)
    }
}

/// Scenario 5: a two-text-part multipart/form-data body yields two TEXT
/// parts in order with the expected name/value pairs and the last-boundary
/// flag set.
#[test]
fn multipart_two_text_parts() {
    let config = Config::new();
    let boundary = multipart::extract_boundary(b"multipart/form-data; boundary=0123456789").unwrap();
    let mut parser = MultipartParser::new(boundary, &config);

    let body = b"--0123456789\r\n\
                 Content-Disposition: form-data; name=\"field1\"\r\n\
                 \r\n\
                 ABCDEF\r\n\
                 --0123456789\r\n\
                 Content-Disposition: form-data; name=\"field2\"\r\n\
                 \r\n\
                 GHIJKL\r\n\
                 --0123456789--\r\n";

    parser.write(body).unwrap();

    let result = parser.finish();

    assert_eq!(result.parts.len(), 2);

    assert_eq!(result.parts[0].part_type, PartType::Text);
    assert_eq!(result.parts[0].name.as_ref().unwrap().as_slice(), b"field1");
    assert_eq!(result.parts[0].value.as_ref().unwrap().as_slice(), b"ABCDEF");

    assert_eq!(result.parts[1].part_type, PartType::Text);
    assert_eq!(result.parts[1].name.as_ref().unwrap().as_slice(), b"field2");
    assert_eq!(result.parts[1].value.as_ref().unwrap().as_slice(), b"GHIJKL");
}

/// Scenario 6: the literal path-decode example from the design notes.
#[test]
fn path_decode_literal_example() {
    use htp_box::config::{DuplicateSeparatorPolicy, InvalidPercentPolicy, SeparatorPolicy};
    use htp_box::path::PathFlags;

    let mut config = Config::new();
    config.invalid_percent_policy = InvalidPercentPolicy::ProcessInvalid;
    config.invalid_encoding_status = 400;
    config.separator_policy = SeparatorPolicy::TreatAsSlash;
    config.duplicate_separator_policy = DuplicateSeparatorPolicy::Compress;
    config.case_fold_path = true;

    let result = path::decode(b"/One\\two///ThRee%2ffive%5csix/se%xxven", &config);

    assert_eq!(result.path, b"/one/two/three/five/six/se?ven");
    assert!(result.flags.contains(PathFlags::INVALID_ENCODING));
    assert_eq!(result.status, 400);
}

/// Boundary behavior: single-byte chunking of a full chunked-body request
/// must parse identically to whole-buffer feeding.
#[test]
fn single_byte_chunking_matches_whole_buffer_feeding() {
    let request = b"POST /upload HTTP/1.1\r\nHost: x\r\nTransfer-Encoding: chunked\r\n\r\n\
                    5\r\nhello\r\n6\r\n world\r\n0\r\n\r\n";

    let config = Config::new();

    let whole = {
        let mut parser = RequestParser::new(&config);
        let mut transactions = Vec::new();
        let mut hooks = HookSet::new();
        parser.feed(request, &mut transactions, &mut hooks, &config);
        transactions
    };

    let chunked = {
        let mut parser = RequestParser::new(&config);
        let mut transactions = Vec::new();
        let mut hooks = HookSet::new();

        for &byte in request.iter() {
            parser.feed(&[byte], &mut transactions, &mut hooks, &config);
        }

        transactions
    };

    assert_eq!(whole.len(), chunked.len());
    assert!(whole[0].is_complete());
    assert!(chunked[0].is_complete());
    assert_eq!(whole[0].request_body_length, chunked[0].request_body_length);
    assert_eq!(whole[0].request_entity_length, chunked[0].request_entity_length);
}

/// A `100 Continue` preceding the real response must not advance the
/// transaction past the response line until the final response arrives.
#[test]
fn interim_continue_does_not_advance_past_response_line() {
    let config = Config::new();
    let mut req_parser = RequestParser::new(&config);
    let mut resp_parser = ResponseParser::new(&config);
    let mut transactions = Vec::new();
    let mut hooks = HookSet::new();

    req_parser.feed(b"POST /upload HTTP/1.1\r\nHost: x\r\nContent-Length: 2\r\nExpect: 100-continue\r\n\r\nhi",
                     &mut transactions, &mut hooks, &config);

    resp_parser.feed(b"HTTP/1.1 100 Continue\r\n\r\n", &mut transactions, &mut hooks, &config);

    assert!(transactions[0].response_progress < Progress::Body);

    resp_parser.feed(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n", &mut transactions, &mut hooks, &config);

    assert_eq!(transactions[0].response_progress, Progress::Complete);
    assert_eq!(transactions[0].response_status_code, 200);
}
