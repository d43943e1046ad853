// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Identity-keyed path guard for graph copies.

use crate::config::CyclePolicy;
use crate::error::{MappingError, Result};

/// Outcome of entering a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Enter {
    /// Proceed; call [`PathGuard::leave`] when done.
    Entered,
    /// Already on the path and the policy is to skip it.
    Cycle,
}

/// Containers and beans on the current copy path.
#[derive(Debug)]
pub(crate) struct PathGuard {
    stack: Vec<usize>,
    max_depth: usize,
    on_cycle: CyclePolicy,
}

impl PathGuard {
    pub(crate) fn new(max_depth: usize, on_cycle: CyclePolicy) -> Self {
        Self {
            stack: Vec::new(),
            max_depth,
            on_cycle,
        }
    }

    /// Push `identity` (a value without identity only counts for depth).
    pub(crate) fn enter(&mut self, identity: Option<usize>, path: &str) -> Result<Enter> {
        if let Some(id) = identity {
            if id != 0 && self.stack.contains(&id) {
                return match self.on_cycle {
                    CyclePolicy::Skip => {
                        log::warn!("[copy] cycle at {}, skipped", display(path));
                        Ok(Enter::Cycle)
                    }
                    CyclePolicy::Error => Err(MappingError::CycleDetected {
                        path: display(path).to_string(),
                    }),
                };
            }
        }
        if self.stack.len() >= self.max_depth {
            return Err(MappingError::DepthExceeded {
                limit: self.max_depth,
                path: display(path).to_string(),
            });
        }
        self.stack.push(identity.unwrap_or(0));
        Ok(Enter::Entered)
    }

    pub(crate) fn leave(&mut self) {
        self.stack.pop();
    }

    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }
}

fn display(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_skip() {
        let mut guard = PathGuard::new(8, CyclePolicy::Skip);
        assert_eq!(guard.enter(Some(1), "").ok(), Some(Enter::Entered));
        assert_eq!(guard.enter(Some(2), "a").ok(), Some(Enter::Entered));
        assert_eq!(guard.enter(Some(1), "a.b").ok(), Some(Enter::Cycle));
        assert_eq!(guard.depth(), 2);

        guard.leave();
        // Siblings may revisit what is no longer on the path.
        assert_eq!(guard.enter(Some(2), "c").ok(), Some(Enter::Entered));
    }

    #[test]
    fn test_cycle_error() {
        let mut guard = PathGuard::new(8, CyclePolicy::Error);
        assert!(guard.enter(Some(1), "").is_ok());
        match guard.enter(Some(1), "self") {
            Err(MappingError::CycleDetected { path }) => assert_eq!(path, "self"),
            other => panic!("expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_depth_limit() {
        let mut guard = PathGuard::new(2, CyclePolicy::Skip);
        assert!(guard.enter(Some(1), "").is_ok());
        assert!(guard.enter(None, "a").is_ok());
        match guard.enter(Some(3), "a.b") {
            Err(MappingError::DepthExceeded { limit, path }) => {
                assert_eq!(limit, 2);
                assert_eq!(path, "a.b");
            }
            other => panic!("expected depth error, got {:?}", other),
        }
    }
}
