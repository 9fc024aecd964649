/// Builds a table in an arena and returns it as a [`Value`](crate::Value).
///
/// The list form assigns indexes 1, 2, 3, …; the map form takes any key that
/// converts into a [`Key`](crate::Key). Elements and values go through
/// `Value::from`, so nested `table!` calls and plain literals mix freely.
///
/// ```rust
/// use serde_tablit::{encode, table, Arena};
///
/// let mut arena = Arena::new();
/// let value = table!(arena, {
///     "name" => "Alice",
///     "tags" => table!(arena, ["rust", "serde"]),
///     1 => true,
/// });
/// assert_eq!(encode(&arena, &value), r#"{T,name="Alice",tags={"rust","serde"}}"#);
/// ```
#[macro_export]
macro_rules! table {
    ($arena:expr, []) => {
        $crate::Value::Table($arena.insert($crate::Table::new()))
    };

    ($arena:expr, [ $($elem:expr),+ $(,)? ]) => {{
        let mut table = $crate::Table::new();
        let mut index: i64 = 0;
        $(
            index += 1;
            table.insert(index, $crate::Value::from($elem));
        )+
        $crate::Value::Table($arena.insert(table))
    }};

    ($arena:expr, {}) => {
        $crate::Value::Table($arena.insert($crate::Table::new()))
    };

    ($arena:expr, { $($key:expr => $value:expr),+ $(,)? }) => {{
        let mut table = $crate::Table::new();
        $(
            table.insert($key, $crate::Value::from($value));
        )+
        $crate::Value::Table($arena.insert(table))
    }};
}

#[cfg(test)]
mod tests {
    use crate::{encode, Arena, Key, Value};

    #[test]
    fn test_table_macro_empty() {
        let mut arena = Arena::new();
        let list = table!(arena, []);
        let map = table!(arena, {});
        assert_ne!(list, map);
        assert_eq!(encode(&arena, &list), "{}");
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_table_macro_list() {
        let mut arena = Arena::new();
        let value = table!(arena, [1, "two", 3.0, false]);
        let table = arena.get(value.as_table().unwrap()).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.get(2), Some(&Value::from("two")));
        assert_eq!(table.get(3), Some(&Value::from(3.0)));
    }

    #[test]
    fn test_table_macro_map() {
        let mut arena = Arena::new();
        let value = table!(arena, {
            "name" => "Alice",
            2.5 => 1,
            true => "yes",
        });
        let table = arena.get(value.as_table().unwrap()).unwrap();
        assert_eq!(table.get("name"), Some(&Value::from("Alice")));
        assert_eq!(table.get(Key::from(2.5)), Some(&Value::from(1)));
        assert_eq!(table.get(true), Some(&Value::from("yes")));
    }

    #[test]
    fn test_table_macro_nested() {
        let mut arena = Arena::new();
        let value = table!(arena, [table!(arena, [1, 2]), table!(arena, { "k" => "v" })]);
        assert_eq!(encode(&arena, &value), r#"{{1,2},{k="v"}}"#);
    }
}
