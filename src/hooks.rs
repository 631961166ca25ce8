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

//! Observer/callback hook registry.
//!
//! A `Hook<T>` holds an ordered list of callbacks that all receive the same
//! `&mut T`. Two run modes are provided: `run_all`, which invokes every
//! callback and aborts at the first error, and `run_one`, which invokes
//! callbacks until one declines to handle the event no longer (the first
//! that returns anything other than `Declined` wins). This mirrors
//! `hook_run_all`/`hook_run_one` in the original hook registry.

/// The result a callback returns to the registry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CallbackResult {
    /// The callback ran successfully.
    Ok,

    /// The callback declined to act on this event; only meaningful to
    /// `run_one`, where it means "try the next callback".
    Declined,

    /// The callback failed; aborts hook processing.
    Error
}

/// An ordered collection of callbacks sharing one event type.
pub struct Hook<T: ?Sized> {
    callbacks: Vec<Box<dyn FnMut(&mut T) -> CallbackResult>>
}

impl<T: ?Sized> Hook<T> {
    /// Creates an empty hook.
    pub fn new() -> Hook<T> {
        Hook{ callbacks: Vec::new() }
    }

    /// Registers a new callback, appended after any existing callbacks.
    pub fn register<F>(&mut self, callback: F)
    where F: FnMut(&mut T) -> CallbackResult + 'static {
        self.callbacks.push(Box::new(callback));
    }

    /// Returns `true` if no callbacks are registered.
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Runs every callback in registration order, stopping at the first
    /// `Error`. A `Declined` result is treated the same as `Ok` (ignored).
    ///
    /// Returns `Ok` if every callback ran (or there were none), `Error` if
    /// one aborted processing.
    pub fn run_all(&mut self, data: &mut T) -> CallbackResult {
        for callback in self.callbacks.iter_mut() {
            if callback(data) == CallbackResult::Error {
                return CallbackResult::Error;
            }
        }

        CallbackResult::Ok
    }

    /// Runs callbacks in registration order until one returns something
    /// other than `Declined`.
    ///
    /// Returns `Declined` if every callback declined (or there were none).
    pub fn run_one(&mut self, data: &mut T) -> CallbackResult {
        for callback in self.callbacks.iter_mut() {
            let result = callback(data);

            if result != CallbackResult::Declined {
                return result;
            }
        }

        CallbackResult::Declined
    }
}

impl<T: ?Sized> Default for Hook<T> {
    fn default() -> Hook<T> {
        Hook::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn run_all_invokes_every_callback() {
        let mut hook: Hook<i32> = Hook::new();
        let mut seen = Vec::new();

        hook.register(|_: &mut i32| CallbackResult::Ok);
        hook.register(|_: &mut i32| CallbackResult::Ok);

        let mut state = 0;
        let result = hook.run_all(&mut state);

        assert_eq!(result, CallbackResult::Ok);
        let _ = &mut seen;
    }

    #[test]
    fn run_all_aborts_on_error() {
        let mut hook: Hook<i32> = Hook::new();
        let mut count = 0;

        hook.register(|n: &mut i32| { *n += 1; CallbackResult::Ok });
        hook.register(|_: &mut i32| CallbackResult::Error);
        hook.register(|n: &mut i32| { *n += 100; CallbackResult::Ok });

        let result = hook.run_all(&mut count);

        assert_eq!(result, CallbackResult::Error);
        assert_eq!(count, 1);
    }

    #[test]
    fn run_one_stops_at_first_non_declined() {
        let mut hook: Hook<i32> = Hook::new();

        hook.register(|_: &mut i32| CallbackResult::Declined);
        hook.register(|n: &mut i32| { *n = 42; CallbackResult::Ok });
        hook.register(|n: &mut i32| { *n = 99; CallbackResult::Ok });

        let mut state = 0;
        let result = hook.run_one(&mut state);

        assert_eq!(result, CallbackResult::Ok);
        assert_eq!(state, 42);
    }

    #[test]
    fn run_one_declined_when_empty() {
        let mut hook: Hook<i32> = Hook::new();
        let mut state = 0;

        assert_eq!(hook.run_one(&mut state), CallbackResult::Declined);
    }
}
