use std::fmt;

/// Key of a table entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Str(String),
    Int(i64),
}

impl Key {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::Str(value) => Some(value.as_str()),
            Key::Int(_) => None,
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Str(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Str(value)
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key::Int(value)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Str(value) => write!(f, "{value}"),
            Key::Int(value) => write!(f, "{value}"),
        }
    }
}

/// Insertion-ordered mapping.
///
/// Re-inserting an existing key replaces its value in place and keeps the
/// original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    entries: Vec<(Key, Value)>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Builder-style insert used when assembling records.
    pub fn with(mut self, key: impl Into<Key>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.as_str() == Some(key))
            .map(|(_, value)| value)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_int)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(Key, Value)> for Table {
    fn from_iter<I: IntoIterator<Item = (Key, Value)>>(iter: I) -> Self {
        let mut table = Table::new();
        for (key, value) in iter {
            table.insert(key, value);
        }
        table
    }
}

/// Value tree persisted by the addon.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Table(Table),
    Array(Vec<Value>),
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Elements of a sequence in index order.
    ///
    /// Tables whose keys are all integers count as sequences too, so
    /// reordered or sparse `[n] = ...` entries are still reachable. An empty
    /// table is an empty sequence.
    pub fn sequence_items(&self) -> Option<Vec<&Value>> {
        match self {
            Value::Array(items) => Some(items.iter().collect()),
            Value::Table(table) => {
                let mut indexed = table
                    .iter()
                    .map(|(key, value)| match key {
                        Key::Int(index) => Some((*index, value)),
                        Key::Str(_) => None,
                    })
                    .collect::<Option<Vec<_>>>()?;
                indexed.sort_by_key(|(index, _)| *index);
                Some(indexed.into_iter().map(|(_, value)| value).collect())
            }
            _ => None,
        }
    }

    /// Visit every `(key, value)` entry in document order, depth first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Key, &'a Value)) {
        match self {
            Value::Table(table) => {
                for (key, value) in table.iter() {
                    visit(key, value);
                    value.walk(visit);
                }
            }
            Value::Array(items) => {
                for item in items {
                    item.walk(visit);
                }
            }
            _ => {}
        }
    }
}

impl From<Table> for Value {
    fn from(value: Table) -> Self {
        Value::Table(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_first_position_on_replace() {
        let mut table = Table::new();
        table.insert("a", 1_i64);
        table.insert("b", 2_i64);
        let previous = table.insert("a", 3_i64);

        assert_eq!(previous, Some(Value::Int(1)));
        let keys: Vec<String> = table.keys().map(ToString::to_string).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(table.get_int("a"), Some(3));
    }

    #[test]
    fn walk_visits_nested_entries_in_order() {
        let inner = Table::new().with("amount", 10_i64);
        let root = Value::Table(
            Table::new()
                .with("ticket_cost", 5_i64)
                .with("mail", Value::Array(vec![Value::Table(inner)])),
        );

        let mut seen = Vec::new();
        root.walk(&mut |key, _| seen.push(key.to_string()));
        assert_eq!(seen, vec!["ticket_cost", "mail", "amount"]);
    }

    #[test]
    fn integer_keyed_tables_are_sequences_in_index_order() {
        let sparse = Value::Table(
            Table::new()
                .with(3_i64, "third")
                .with(1_i64, "first"),
        );
        let items = sparse.sequence_items().expect("integer keys");
        assert_eq!(items, vec![&Value::from("first"), &Value::from("third")]);

        assert_eq!(Value::Table(Table::new()).sequence_items(), Some(Vec::new()));
        let mixed = Value::Table(Table::new().with(1_i64, "a").with("name", "b"));
        assert_eq!(mixed.sequence_items(), None);
        assert_eq!(Value::Int(1).sequence_items(), None);
    }
}
