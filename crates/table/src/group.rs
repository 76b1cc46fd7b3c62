use crate::Table;
use crate::error::Result;
use std::collections::BTreeMap;

impl Table {
    /// Group rows by an integer column and keep the first distinct string of
    /// another column for each group.
    ///
    /// Groups are ordered by key. Within a group the first non-null value in
    /// row order wins; later, different values are ignored without complaint.
    /// Rows with a null key or null value don't contribute.
    ///
    /// Returns [`ErrorKind::NotInteger`](crate::error::ErrorKind::NotInteger)
    /// if a key has no exact integer form, so distinct keys such as `1.0` and
    /// `1.5` are never merged.
    pub fn first_value_by(&self, key: &str, value: &str) -> Result<BTreeMap<i64, String>> {
        let keys = self.exact_i64_column(key)?;
        let values = self.string_column(value)?;
        let mut groups = BTreeMap::new();
        for (key, value) in keys.iter().zip(values.iter()) {
            let (Some(key), Some(value)) = (key, value) else {
                continue;
            };
            groups.entry(key).or_insert_with(|| value.to_string());
        }
        Ok(groups)
    }
}
