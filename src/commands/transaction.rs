//! Transaction and pipeline commands.
//!
//! Both modes share the handle's [`ResultBuffer`](super::ResultBuffer).
//! No optimistic locking is emulated: `WATCH` and `UNWATCH` always succeed.

use super::{BufferMode, Engine};
use crate::protocol::Reply;

impl Engine {
    /// MULTI
    pub fn multi(&mut self) -> Reply {
        self.buffer.begin(BufferMode::Transaction);
        Reply::ok()
    }

    /// EXEC
    ///
    /// Answers the queued replies in call order. Outside a transaction the
    /// array is empty.
    pub fn exec(&mut self) -> Reply {
        Reply::array(self.buffer.finish())
    }

    /// DISCARD
    pub fn discard(&mut self) -> Reply {
        self.buffer.discard();
        Reply::ok()
    }

    /// WATCH key [key ...]
    pub fn watch<K: AsRef<str>>(&mut self, _keys: &[K]) -> Reply {
        Reply::ok()
    }

    /// UNWATCH
    pub fn unwatch(&mut self) -> Reply {
        Reply::ok()
    }

    /// Starts collecting replies until [`execute`](Self::execute).
    pub fn pipeline(&mut self) -> Reply {
        self.buffer.begin(BufferMode::Pipeline);
        Reply::ok()
    }

    /// Ends a pipeline and answers the collected replies.
    pub fn execute(&mut self) -> Reply {
        Reply::array(self.buffer.finish())
    }
}
