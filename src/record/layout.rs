use std::collections::HashMap;

use crate::storage::Page;

use super::schema::{FieldType, Schema};

/// Physical description of a record slot: per-field byte offsets and the
/// total slot size. Offset 0 holds the slot's empty/in-use flag.
#[derive(Debug, Clone)]
pub struct Layout {
    schema: Schema,
    offsets: HashMap<String, usize>,
    slot_size: usize,
}

impl Layout {
    pub fn new(schema: Schema) -> Self {
        let mut offsets = HashMap::new();
        let mut pos = std::mem::size_of::<i32>();

        for field_name in schema.fields() {
            offsets.insert(field_name.clone(), pos);
            pos += Self::length_in_bytes(&schema, field_name);
        }

        Layout {
            schema,
            offsets,
            slot_size: pos,
        }
    }

    pub fn with_offsets(schema: Schema, offsets: HashMap<String, usize>, slot_size: usize) -> Self {
        Layout {
            schema,
            offsets,
            slot_size,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn offset(&self, field_name: &str) -> Option<usize> {
        self.offsets.get(field_name).copied()
    }

    pub fn slot_size(&self) -> usize {
        self.slot_size
    }

    fn length_in_bytes(schema: &Schema, field_name: &str) -> usize {
        match schema.field_type(field_name).expect("Field not found") {
            FieldType::Integer => std::mem::size_of::<i32>(),
            FieldType::Varchar => {
                Page::max_length(schema.length(field_name).expect("Field length not found"))
            }
        }
    }
}
