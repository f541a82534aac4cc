use crate::error::DbResult;
use crate::plan::Plan;
use crate::query::{Constant, Scan, Term};
use crate::record::Schema;

/// A conjunction of equality terms. A predicate is satisfied only when every
/// term is satisfied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    terms: Vec<Term>,
}

impl Predicate {
    pub fn new(term: Term) -> Self {
        Predicate { terms: vec![term] }
    }

    pub fn conjoin_with(mut self, other: Predicate) -> Self {
        self.terms.extend(other.terms);
        self
    }

    pub fn with_term(mut self, term: Term) -> Self {
        self.terms.push(term);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn is_satisfied(&self, s: &mut dyn Scan) -> DbResult<bool> {
        for term in &self.terms {
            if !term.is_satisfied(s)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// The product of the term reduction factors, saturating.
    pub fn reduction_factor(&self, plan: &dyn Plan) -> u64 {
        self.terms
            .iter()
            .fold(1u64, |acc, t| acc.saturating_mul(t.reduction_factor(plan)))
    }

    /// The sub-conjunction fully decidable against `sch`, or None.
    pub fn select_sub_pred(&self, sch: &Schema) -> Option<Predicate> {
        let terms: Vec<Term> = self
            .terms
            .iter()
            .filter(|t| t.applies_to(sch))
            .cloned()
            .collect();
        if terms.is_empty() {
            None
        } else {
            Some(Predicate { terms })
        }
    }

    /// The sub-conjunction whose terms span both schemas (and only both),
    /// or None if no term connects them.
    pub fn join_sub_pred(&self, sch1: &Schema, sch2: &Schema) -> Option<Predicate> {
        let mut joined = Schema::new();
        joined.add_all(sch1);
        joined.add_all(sch2);

        let terms: Vec<Term> = self
            .terms
            .iter()
            .filter(|t| !t.applies_to(sch1) && !t.applies_to(sch2) && t.applies_to(&joined))
            .cloned()
            .collect();
        if terms.is_empty() {
            None
        } else {
            Some(Predicate { terms })
        }
    }

    /// Is `field_name` constrained to equal a literal anywhere in the conjunction?
    pub fn equates_with_constant(&self, field_name: &str) -> Option<&Constant> {
        self.terms
            .iter()
            .find_map(|t| t.equates_with_constant(field_name))
    }

    /// Is `field_name` constrained to equal another field anywhere in the conjunction?
    pub fn equates_with_field(&self, field_name: &str) -> Option<&str> {
        self.terms
            .iter()
            .find_map(|t| t.equates_with_field(field_name))
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut iter = self.terms.iter();
        if let Some(first) = iter.next() {
            write!(f, "{}", first)?;
            for term in iter {
                write!(f, " and {}", term)?;
            }
        }
        Ok(())
    }
}
