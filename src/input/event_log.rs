use std::collections::VecDeque;

use chrono::Local;

/// Bounded ring of human-readable input events, newest last.
///
/// Consumed by the log panel; the oldest line falls off once the capacity
/// is reached.
pub struct EventLog {
    lines: VecDeque<String>,
    capacity: usize,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn add(&mut self, message: impl Into<String>) {
        while self.lines.len() >= self.capacity {
            self.lines.pop_front();
        }
        self.lines
            .push_back(format!("{} {}", Local::now().format("%H:%M:%S%.3f"), message.into()));
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oldest_line_drops_at_capacity() {
        let mut log = EventLog::new(3);
        for i in 0..5 {
            log.add(format!("line {}", i));
        }
        assert_eq!(log.len(), 3);
        let lines: Vec<&str> = log.iter().collect();
        assert!(lines[0].ends_with("line 2"));
        assert!(lines[2].ends_with("line 4"));
    }

    #[test]
    fn clear_empties_the_ring() {
        let mut log = EventLog::new(8);
        log.add("something");
        assert!(!log.is_empty());
        log.clear();
        assert!(log.is_empty());
    }
}
