use crate::models::ResultRow;

/// Client-side re-sort by the raw ordering key, applied only once the user has typed something.
#[must_use]
pub fn sort_rows_by_order_key(mut rows: Vec<ResultRow>, input: &str) -> Vec<ResultRow> {
    if input.is_empty() {
        return rows;
    }
    rows.sort_by(|a, b| b.order.total_cmp(&a.order));
    rows
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{OrderKey, RankedEntry};

    fn rows(keys: &[(OrderKey, &str)]) -> Vec<ResultRow> {
        keys.iter()
            .map(|(key, path)| {
                ResultRow::from(RankedEntry {
                    key: *key,
                    path: (*path).to_string(),
                })
            })
            .collect()
    }

    fn paths(rows: &[ResultRow]) -> Vec<&str> {
        rows.iter().map(|row| row.path.as_str()).collect()
    }

    #[test]
    fn empty_input_keeps_source_order() {
        let input = rows(&[(OrderKey::Age(10), "/a"), (OrderKey::Age(500), "/b")]);
        assert_eq!(paths(&sort_rows_by_order_key(input, "")), vec!["/a", "/b"]);
    }

    #[test]
    fn typed_input_sorts_descending_and_stable() {
        let input = rows(&[
            (OrderKey::Score(1.0), "/low"),
            (OrderKey::Score(8.0), "/first-high"),
            (OrderKey::Score(8.0), "/second-high"),
            (OrderKey::Score(2.5), "/mid"),
        ]);
        assert_eq!(
            paths(&sort_rows_by_order_key(input, "x")),
            vec!["/first-high", "/second-high", "/mid", "/low"]
        );
    }
}
