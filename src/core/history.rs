use crate::shared::error::{AppError, AppResult};
use crate::shared::format::format_number;
use crate::shared::types::{ConversionRecord, HistoryEntry};

/// Default number of calculations kept in memory
pub const MAX_HISTORY_SIZE: usize = 50;

/// Default number of conversions kept
pub const MAX_CONVERSION_HISTORY_SIZE: usize = 20;

/// Capacity-bounded log, newest first
///
/// Append-only apart from `clear`; once full, every push evicts the oldest
/// item.
#[derive(Debug, Clone, PartialEq)]
pub struct History<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T: Clone> History<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Rebuild from stored items (newest first), dropping whatever exceeds capacity
    pub fn from_items(mut items: Vec<T>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        items.truncate(capacity);
        Self { items, capacity }
    }

    pub fn push(&mut self, item: T) {
        self.items.insert(0, item);
        if self.items.len() > self.capacity {
            self.items.truncate(self.capacity);
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Get an item by index (0 = most recent)
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn latest(&self) -> Option<&T> {
        self.items.first()
    }

    /// The newest `limit` items, for persisting
    pub fn newest(&self, limit: usize) -> Vec<T> {
        self.items.iter().take(limit).cloned().collect()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for History<HistoryEntry> {
    fn default() -> Self {
        Self::with_capacity(MAX_HISTORY_SIZE)
    }
}

impl Default for History<ConversionRecord> {
    fn default() -> Self {
        Self::with_capacity(MAX_CONVERSION_HISTORY_SIZE)
    }
}

impl History<HistoryEntry> {
    /// CSV export with an `Expression,Result,Timestamp` header
    pub fn to_csv(&self) -> AppResult<String> {
        let mut writer = csv::WriterBuilder::new().from_writer(vec![]);
        writer.write_record(["Expression", "Result", "Timestamp"])?;
        for entry in &self.items {
            writer.write_record([
                entry.expression.as_str(),
                format_number(entry.result).as_str(),
                entry.timestamp.to_rfc3339().as_str(),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::Io(format!("Failed to flush CSV: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::Serialization(format!("CSV is not UTF-8: {}", e)))
    }

    pub fn to_clipboard_text(&self) -> String {
        let mut text = String::from("Calculation History:\n");
        for entry in &self.items {
            text.push_str(&format!("{} = {}\n", entry.expression, format_number(entry.result)));
        }
        text
    }
}

impl History<ConversionRecord> {
    pub fn to_clipboard_text(&self) -> String {
        let mut text = String::from("Conversion History:\n");
        for record in &self.items {
            text.push_str(&record.to_line());
            text.push('\n');
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_first() {
        let mut history = History::<HistoryEntry>::default();
        history.push(HistoryEntry::new("1 + 1", 2.0));
        history.push(HistoryEntry::new("2 + 2", 4.0));

        assert_eq!(history.len(), 2);
        assert_eq!(history.items()[0].expression, "2 + 2"); // Most recent first
        assert_eq!(history.get(1).unwrap().expression, "1 + 1");
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = History::<HistoryEntry>::default();
        for i in 0..51 {
            history.push(HistoryEntry::new(format!("{} + 0", i), i as f64));
        }

        assert_eq!(history.len(), MAX_HISTORY_SIZE);
        assert_eq!(history.latest().unwrap().result, 50.0);
        assert!(history.items().iter().all(|e| e.result != 0.0));
    }

    #[test]
    fn test_from_items_truncates() {
        let items: Vec<_> = (0..30).map(|i| HistoryEntry::new("x", i as f64)).collect();
        let history = History::from_items(items, 20);
        assert_eq!(history.len(), 20);
        assert_eq!(history.latest().unwrap().result, 0.0);
    }

    #[test]
    fn test_newest_limit() {
        let mut history = History::<HistoryEntry>::default();
        for i in 0..25 {
            history.push(HistoryEntry::new("x", i as f64));
        }
        let persisted = history.newest(20);
        assert_eq!(persisted.len(), 20);
        assert_eq!(persisted[0].result, 24.0);
    }

    #[test]
    fn test_csv_export() {
        let mut history = History::<HistoryEntry>::default();
        history.push(HistoryEntry::new("say \"hi\"", 1.5));

        history.push(HistoryEntry::new("1,000 + 1", 1001.0));

        let csv = history.to_csv().unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Expression,Result,Timestamp"));
        assert!(lines.next().unwrap().starts_with("\"1,000 + 1\",1001,"));
        assert!(lines.next().unwrap().starts_with("\"say \"\"hi\"\"\",1.5,"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_clipboard_text() {
        let mut history = History::<HistoryEntry>::default();
        history.push(HistoryEntry::new("2 + 3", 5.0));
        assert_eq!(history.to_clipboard_text(), "Calculation History:\n2 + 3 = 5\n");

        let mut conversions = History::<ConversionRecord>::default();
        conversions.push(ConversionRecord::new(1.0, "km", 0.621371, "mi"));
        assert_eq!(conversions.to_clipboard_text(), "Conversion History:\n1 km = 0.621371 mi\n");
    }

    #[test]
    fn test_clear() {
        let mut history = History::<HistoryEntry>::default();
        history.push(HistoryEntry::new("1 + 1", 2.0));
        history.clear();
        assert!(history.is_empty());
    }
}
