// +-----------------------------------------------------------------------------------------------+
// | Copyright 2016 Sean Kerr                                                                      |
// |                                                                                               |
// | Licensed under the Apache License, Version 2.0 (the "License");                               |
// | you may not use this file except in compliance with the License.                              |
// | You may obtain a copy of the License at                                                       |
// |                                                                                               |
// |  http://www.apache.org/licenses/LICENSE-2.0                                                   |
// |                                                                                               |
// | Unless required by applicable law or agreed to in writing, software                           |
// | distributed under the License is distributed on an "AS IS" BASIS,                             |
// | WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.                      |
// | See the License for the specific language governing permissions and                           |
// | limitations under the License.                                                                |
// +-----------------------------------------------------------------------------------------------+

//! Ties a [`RequestParser`] and a [`ResponseParser`] to one ordered
//! transaction list, so that pipelining and CONNECT tunneling — both of
//! which need visibility into *both* directions — can be handled without
//! either direction parser knowing about the other.

use config::Config;
use http1::hook_point::HookSet;
use http1::request::RequestParser;
use http1::response::ResponseParser;
use http1::transaction::{Progress, Transaction, TransactionFlags};
use http1::StreamResult;

bitflags! {
    /// Connection-wide state that does not belong to any single transaction.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ConnectionFlags: u32 {
        /// A `CONNECT` tunnel was established; from this point on both
        /// directions carry opaque bytes and neither parser is fed again.
        const TUNNEL = 1 << 0;

        /// The underlying connection has been observed closed.
        const CLOSED = 1 << 1;
    }
}

/// A single TCP connection's worth of HTTP/1.x traffic, in both directions.
///
/// Owns the transaction list both parsers write into, and is the only place
/// that can see both directions' progress at once — which is exactly what
/// pipelining detection and `CONNECT` tunnel handling need.
pub struct Connection {
    transactions: Vec<Transaction>,
    request_parser: RequestParser,
    response_parser: ResponseParser,
    hooks: HookSet,
    config: Config,
    flags: ConnectionFlags
}

impl Connection {
    /// Opens a new connection with the given parser configuration.
    pub fn new(config: Config) -> Connection {
        Connection{
            transactions: Vec::new(),
            request_parser: RequestParser::new(&config),
            response_parser: ResponseParser::new(&config),
            hooks: HookSet::new(),
            config: config,
            flags: ConnectionFlags::empty()
        }
    }

    /// The hook set observers register callbacks on before feeding any data.
    pub fn hooks_mut(&mut self) -> &mut HookSet {
        &mut self.hooks
    }

    /// Every transaction parsed on this connection so far, oldest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Connection-wide flags observed so far.
    pub fn flags(&self) -> ConnectionFlags {
        self.flags
    }

    /// Feeds one chunk of request-direction bytes.
    ///
    /// Once a `CONNECT` tunnel has been established, no further bytes are
    /// parsed as HTTP on either direction; this always returns
    /// `StreamResult::Stop(0)` from that point on, matching the request
    /// parser's own behavior once it reaches tunnel mode.
    pub fn feed_request(&mut self, data: &[u8]) -> StreamResult {
        if self.flags.contains(ConnectionFlags::TUNNEL) {
            return StreamResult::Stop(0);
        }

        let before = self.transactions.len();
        let result = self.request_parser.feed(data, &mut self.transactions, &mut self.hooks, &self.config);

        self.mark_pipelined(before);

        if let StreamResult::Stop(_) = result {
            self.flags.insert(ConnectionFlags::TUNNEL);
        }

        result
    }

    /// Feeds one chunk of response-direction bytes. Always answers for the
    /// oldest transaction that has not yet seen a final response, so
    /// pipelined responses are correlated to the requests that caused them
    /// without either parser needing to track the other's state.
    pub fn feed_response(&mut self, data: &[u8]) -> StreamResult {
        if self.flags.contains(ConnectionFlags::TUNNEL) {
            return StreamResult::Stop(0);
        }

        let result = self.response_parser.feed(data, &mut self.transactions, &mut self.hooks, &self.config);

        if let StreamResult::Stop(_) = result {
            self.flags.insert(ConnectionFlags::TUNNEL);
        }

        result
    }

    /// Call when the underlying connection closes. Completes a
    /// close-delimited response body still in progress, the only framing
    /// that depends on observing connection closure rather than a byte
    /// count or terminator.
    pub fn close(&mut self) {
        self.flags.insert(ConnectionFlags::CLOSED);
        self.response_parser.notify_close(&mut self.transactions, &mut self.hooks);
    }

    /// Flags every transaction created by the request parser's most recent
    /// `feed_request` call as `PIPELINED` if the transaction immediately
    /// before it had not yet received a complete response. `before` is the
    /// transaction count observed prior to that call.
    fn mark_pipelined(&mut self, before: usize) {
        for index in before..self.transactions.len() {
            if index == 0 {
                continue;
            }

            if self.transactions[index - 1].response_progress != Progress::Complete {
                self.transactions[index].flags.insert(TransactionFlags::PIPELINED);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use config::Config;
    use http1::transaction::{BodyLength, Method};

    #[test]
    fn request_then_response_completes_one_transaction() {
        let mut conn = Connection::new(Config::new());

        conn.feed_request(b"GET /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n");
        conn.feed_response(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nhi");

        assert_eq!(conn.transactions().len(), 1);

        let txn = &conn.transactions()[0];
        assert_eq!(txn.request_method, Method::Get);
        assert_eq!(txn.response_status_code, 200);
        assert!(txn.is_complete());
        assert!(!txn.flags.contains(TransactionFlags::PIPELINED));
    }

    #[test]
    fn second_request_before_first_response_is_flagged_pipelined() {
        let mut conn = Connection::new(Config::new());

        conn.feed_request(b"GET /a HTTP/1.1\r\nHost: a\r\n\r\n");
        conn.feed_request(b"GET /b HTTP/1.1\r\nHost: a\r\n\r\n");

        assert_eq!(conn.transactions().len(), 2);
        assert!(!conn.transactions()[0].flags.contains(TransactionFlags::PIPELINED));
        assert!(conn.transactions()[1].flags.contains(TransactionFlags::PIPELINED));

        conn.feed_response(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n");
        conn.feed_response(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n");

        assert!(conn.transactions()[0].is_complete());
        assert!(conn.transactions()[1].is_complete());
    }

    #[test]
    fn connect_tunnel_stops_both_directions() {
        let mut conn = Connection::new(Config::new());

        conn.feed_request(b"CONNECT example.com:443 HTTP/1.1\r\nHost: example.com:443\r\n\r\n");
        conn.feed_response(b"HTTP/1.1 200 Connection Established\r\n\r\n");

        assert!(conn.flags().contains(ConnectionFlags::TUNNEL));

        match conn.feed_request(b"raw tunnel bytes") {
            StreamResult::Stop(0) => {}
            other => panic!("expected tunnel passthrough to reject further parsing, got {:?}", other)
        }
    }

    #[test]
    fn close_completes_a_close_delimited_response() {
        let mut conn = Connection::new(Config::new());

        conn.feed_request(b"GET / HTTP/1.1\r\nHost: a\r\n\r\n");
        conn.feed_response(b"HTTP/1.1 200 OK\r\n\r\nbody without a length");

        assert_eq!(conn.transactions()[0].response_body_length, BodyLength::Identity(u64::MAX));
        assert_eq!(conn.transactions()[0].response_progress, Progress::Body);

        conn.close();

        assert_eq!(conn.transactions()[0].response_progress, Progress::Complete);
        assert!(conn.flags().contains(ConnectionFlags::CLOSED));
    }
}
