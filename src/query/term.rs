use crate::error::DbResult;
use crate::plan::Plan;
use crate::query::{Constant, Expr, Scan};
use crate::record::Schema;

/// An equality comparison between two expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    lhs: Expr,
    rhs: Expr,
}

impl Term {
    pub fn new(lhs: Expr, rhs: Expr) -> Self {
        Term { lhs, rhs }
    }

    pub fn is_satisfied(&self, s: &mut dyn Scan) -> DbResult<bool> {
        let lhs_val = self.lhs.evaluate(s)?;
        let rhs_val = self.rhs.evaluate(s)?;
        Ok(lhs_val == rhs_val)
    }

    pub fn applies_to(&self, sch: &Schema) -> bool {
        self.lhs.applies_to(sch) && self.rhs.applies_to(sch)
    }

    /// How much this term is expected to shrink the output of `plan`:
    /// equating a field with a constant cuts the rows by the field's number
    /// of distinct values; equating two fields cuts by the larger of the two.
    pub fn reduction_factor(&self, plan: &dyn Plan) -> u64 {
        match (&self.lhs, &self.rhs) {
            (Expr::FieldName(l), Expr::FieldName(r)) => {
                plan.distinct_values(l).max(plan.distinct_values(r))
            }
            (Expr::FieldName(l), Expr::Constant(_)) => plan.distinct_values(l),
            (Expr::Constant(_), Expr::FieldName(r)) => plan.distinct_values(r),
            (Expr::Constant(a), Expr::Constant(b)) => {
                if a == b {
                    1
                } else {
                    u64::MAX
                }
            }
        }
    }

    /// If this term equates `field_name` with a constant, that constant.
    pub fn equates_with_constant(&self, field_name: &str) -> Option<&Constant> {
        match (&self.lhs, &self.rhs) {
            (Expr::FieldName(f), Expr::Constant(c)) if f == field_name => Some(c),
            (Expr::Constant(c), Expr::FieldName(f)) if f == field_name => Some(c),
            _ => None,
        }
    }

    /// If this term equates `field_name` with another field, that field.
    pub fn equates_with_field(&self, field_name: &str) -> Option<&str> {
        match (&self.lhs, &self.rhs) {
            (Expr::FieldName(f), Expr::FieldName(other)) if f == field_name && other != field_name => {
                Some(other)
            }
            (Expr::FieldName(other), Expr::FieldName(f)) if f == field_name && other != field_name => {
                Some(other)
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.lhs, self.rhs)
    }
}
