use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Integer,
    Varchar,
}

#[derive(Debug, Clone)]
struct FieldInfo {
    field_type: FieldType,
    length: usize,
}

/// The record schema of a table: field names with their types and lengths.
/// Schemas compose as duplicate-free unions, so a join schema is simply
/// `add_all` of both input schemas.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<String>,
    info: HashMap<String, FieldInfo>,
}

impl Schema {
    pub fn new() -> Self {
        Schema::default()
    }

    pub fn add_field(&mut self, field_name: &str, field_type: FieldType, length: usize) {
        if self.has_field(field_name) {
            return;
        }
        self.fields.push(field_name.to_string());
        self.info
            .insert(field_name.to_string(), FieldInfo { field_type, length });
    }

    pub fn add_int_field(&mut self, field_name: &str) {
        self.add_field(field_name, FieldType::Integer, 0);
    }

    pub fn add_string_field(&mut self, field_name: &str, length: usize) {
        self.add_field(field_name, FieldType::Varchar, length);
    }

    pub fn add_from_schema(&mut self, field_name: &str, other: &Schema) {
        let field_info = other.info.get(field_name).expect("Field not found in schema");
        self.add_field(field_name, field_info.field_type, field_info.length);
    }

    pub fn add_all(&mut self, other: &Schema) {
        for field_name in &other.fields {
            self.add_from_schema(field_name, other);
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn has_field(&self, field_name: &str) -> bool {
        self.info.contains_key(field_name)
    }

    pub fn field_type(&self, field_name: &str) -> Option<FieldType> {
        self.info.get(field_name).map(|info| info.field_type)
    }

    pub fn length(&self, field_name: &str) -> Option<usize> {
        self.info.get(field_name).map(|info| info.length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_basic() {
        let mut schema = Schema::new();
        schema.add_int_field("id");
        schema.add_string_field("name", 20);

        assert!(schema.has_field("id"));
        assert!(schema.has_field("name"));
        assert!(!schema.has_field("age"));

        assert_eq!(schema.field_type("id"), Some(FieldType::Integer));
        assert_eq!(schema.field_type("name"), Some(FieldType::Varchar));
        assert_eq!(schema.length("name"), Some(20));
    }

    #[test]
    fn test_union_is_duplicate_free() {
        let mut lhs = Schema::new();
        lhs.add_int_field("id");
        lhs.add_string_field("name", 20);

        let mut rhs = Schema::new();
        rhs.add_int_field("id");
        rhs.add_int_field("age");

        let mut joined = Schema::new();
        joined.add_all(&lhs);
        joined.add_all(&rhs);

        assert_eq!(joined.fields(), &["id", "name", "age"]);
        assert_eq!(joined.field_type("id"), Some(FieldType::Integer));
    }
}
