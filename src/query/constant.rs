/// A literal value stored in or compared against a database field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constant {
    Int(i32),
    String(String),
}

impl Constant {
    pub fn int(val: i32) -> Self {
        Constant::Int(val)
    }

    pub fn string(val: impl Into<String>) -> Self {
        Constant::String(val.into())
    }
}

impl std::fmt::Display for Constant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Constant::Int(i) => write!(f, "{}", i),
            Constant::String(s) => write!(f, "'{}'", s),
        }
    }
}
