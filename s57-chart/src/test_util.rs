//! Fixtures for unit tests.

use s57_iso8211::{GenericItem, ItemField, RecordKey, SubfieldGroup};

/// Item keyed by `key_field` holding the given fields.
pub(crate) fn item(key_field: &str, key: RecordKey, fields: Vec<(&str, Vec<SubfieldGroup>)>) -> GenericItem {
    GenericItem {
        record_id: Some(key.rcid),
        key_field: Some(key_field.to_string()),
        unique_id: Some(key),
        fields: fields
            .into_iter()
            .map(|(tag, groups)| {
                (
                    tag.to_string(),
                    ItemField {
                        tag: tag.to_string(),
                        name: String::new(),
                        groups,
                    },
                )
            })
            .collect(),
    }
}
