//! Mock transports for testing.
//!
//! These are used internally by the test suite and are not part of the public API.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::transport;
use crate::transport::Transport;

#[derive(Default)]
struct Script {
    replies: VecDeque<transport::Result<String>>,
    sent: Vec<String>,
    undo_hook: bool,
    undo_calls: Vec<String>,
}

/// A transport that answers from a queue of canned replies and records every
/// expression it was handed.
///
/// Clones share the script, so a test keeps one clone to inspect while the
/// session owns the other. An empty queue answers `""` (null).
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Rc<RefCell<Script>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretends the host offers native undo group hooks.
    pub fn with_undo_hook(self) -> Self {
        self.script.borrow_mut().undo_hook = true;
        self
    }

    /// Queues a successful reply.
    pub fn reply(&self, raw: &str) -> &Self {
        self.script.borrow_mut().replies.push_back(Ok(raw.to_string()));
        self
    }

    /// Queues a failure.
    pub fn fail(&self, error: transport::Error) -> &Self {
        self.script.borrow_mut().replies.push_back(Err(error));
        self
    }

    /// Every expression executed so far, as handed to the transport.
    pub fn sent(&self) -> Vec<String> {
        self.script.borrow().sent.clone()
    }

    /// Forgets what was sent so far.
    pub fn clear(&self) {
        self.script.borrow_mut().sent.clear();
    }

    pub fn pending(&self) -> usize {
        self.script.borrow().replies.len()
    }

    pub fn undo_calls(&self) -> Vec<String> {
        self.script.borrow().undo_calls.clone()
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, code: &str) -> transport::Result<String> {
        let mut script = self.script.borrow_mut();
        script.sent.push(code.to_string());
        script.replies.pop_front().unwrap_or_else(|| Ok(String::new()))
    }

    fn begin_undo_group(&self, name: &str) -> transport::Result<bool> {
        let mut script = self.script.borrow_mut();
        if script.undo_hook {
            script.undo_calls.push(format!("begin:{}", name));
        }
        Ok(script.undo_hook)
    }

    fn end_undo_group(&self) -> transport::Result<bool> {
        let mut script = self.script.borrow_mut();
        if script.undo_hook {
            script.undo_calls.push("end".into());
        }
        Ok(script.undo_hook)
    }
}
