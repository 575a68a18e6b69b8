//! Bounded undo/redo history of configuration strings.

use std::collections::VecDeque;

/// Linear history of configuration strings with a cursor.
///
/// Recording while the cursor is behind the newest entry discards the redo
/// tail. Once `limit` entries are stored the oldest one is dropped.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<String>,
    cursor: usize,
    limit: usize,
}

impl History {
    /// Creates an empty history holding at most `limit` entries (at least 1).
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: 0,
            limit: limit.max(1),
        }
    }

    /// Appends a configuration after the cursor and moves the cursor onto it.
    pub fn record(&mut self, config: impl Into<String>) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push_back(config.into());
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len() - 1;
    }

    /// Steps back one entry and returns it, or `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&str> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.current()
    }

    /// Steps forward one entry and returns it, or `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&str> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.current()
    }

    /// Returns the entry under the cursor.
    pub fn current(&self) -> Option<&str> {
        self.entries.get(self.cursor).map(String::as_str)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    #[derive(Debug, Clone)]
    enum Op {
        Record(u8),
        Undo,
        Redo,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => any::<u8>().prop_map(Op::Record),
            1 => Just(Op::Undo),
            1 => Just(Op::Redo),
        ]
    }

    fn check_cursor_in_bounds(ops: &[Op], limit: usize) -> Result<(), TestCaseError> {
        let mut history = History::new(limit);
        for op in ops {
            match op {
                Op::Record(value) => {
                    let expected = value.to_string();
                    history.record(expected.as_str());
                    prop_assert_eq!(history.current(), Some(expected.as_str()));
                    prop_assert!(!history.can_redo());
                }
                Op::Undo => {
                    history.undo();
                }
                Op::Redo => {
                    history.redo();
                }
            }
            prop_assert!(history.len() <= limit.max(1));
            prop_assert_eq!(history.current().is_some(), !history.is_empty());
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn cursor_stays_in_bounds(
            ops in prop::collection::vec(op_strategy(), 0..60),
            limit in 0usize..8,
        ) {
            check_cursor_in_bounds(&ops, limit)?;
        }
    }
}
