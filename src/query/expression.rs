use crate::error::DbResult;
use crate::query::{Constant, Scan};
use crate::record::Schema;

/// One side of a comparison term: either a literal or a field reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Constant(Constant),
    FieldName(String),
}

impl Expr {
    pub fn constant(val: Constant) -> Self {
        Expr::Constant(val)
    }

    pub fn field_name(fldname: impl Into<String>) -> Self {
        Expr::FieldName(fldname.into())
    }

    pub fn evaluate(&self, s: &mut dyn Scan) -> DbResult<Constant> {
        match self {
            Expr::Constant(val) => Ok(val.clone()),
            Expr::FieldName(fldname) => s.get_val(fldname),
        }
    }

    pub fn applies_to(&self, sch: &Schema) -> bool {
        match self {
            Expr::Constant(_) => true,
            Expr::FieldName(fldname) => sch.has_field(fldname),
        }
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Constant(val) => write!(f, "{}", val),
            Expr::FieldName(fldname) => write!(f, "{}", fldname),
        }
    }
}
