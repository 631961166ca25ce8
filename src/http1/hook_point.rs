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

//! The fixed set of observer hook points a connection exposes, in the order
//! they fire within one transaction.

use hooks::{CallbackResult, Hook};
use http1::transaction::Transaction;

/// The full set of hooks a connection exposes, one per lifecycle point,
/// fired in this order within a transaction:
///
/// `request_start`, `request_line`, `request_uri_normalize`,
/// `request_headers`, `request_header_data`, `request_body_data` (repeats),
/// `request_trailer`, `request_complete`, `response_start`,
/// `response_line`, `response_headers`, `response_header_data`,
/// `response_body_data` (repeats), `response_trailer`, `response_complete`,
/// `transaction_complete`.
pub struct HookSet {
    pub request_start: Hook<Transaction>,
    pub request_line: Hook<Transaction>,
    pub request_uri_normalize: Hook<Transaction>,
    pub request_headers: Hook<Transaction>,
    pub request_header_data: Hook<Transaction>,
    pub request_body_data: Hook<Transaction>,
    pub request_trailer: Hook<Transaction>,
    pub request_complete: Hook<Transaction>,
    pub response_start: Hook<Transaction>,
    pub response_line: Hook<Transaction>,
    pub response_headers: Hook<Transaction>,
    pub response_header_data: Hook<Transaction>,
    pub response_body_data: Hook<Transaction>,
    pub response_trailer: Hook<Transaction>,
    pub response_complete: Hook<Transaction>,
    pub transaction_complete: Hook<Transaction>
}

impl HookSet {
    pub fn new() -> HookSet {
        HookSet{
            request_start: Hook::new(),
            request_line: Hook::new(),
            request_uri_normalize: Hook::new(),
            request_headers: Hook::new(),
            request_header_data: Hook::new(),
            request_body_data: Hook::new(),
            request_trailer: Hook::new(),
            request_complete: Hook::new(),
            response_start: Hook::new(),
            response_line: Hook::new(),
            response_headers: Hook::new(),
            response_header_data: Hook::new(),
            response_body_data: Hook::new(),
            response_trailer: Hook::new(),
            response_complete: Hook::new(),
            transaction_complete: Hook::new()
        }
    }

    /// Runs a named hook against `transaction`, ignoring `Declined` (hooks
    /// registered here are all run-all points; `run_one` has no role in the
    /// fixed lifecycle points).
    pub fn fire(hook: &mut Hook<Transaction>, transaction: &mut Transaction) -> CallbackResult {
        hook.run_all(transaction)
    }
}

impl Default for HookSet {
    fn default() -> HookSet {
        HookSet::new()
    }
}
