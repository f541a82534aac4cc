use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::DbResult;
use crate::metadata::{IndexInfo, MetadataMgr};
use crate::plan::{
    IndexJoinPlan, IndexSelectPlan, JoinStrategy, MultiIndexJoinPlan, MultiIndexSelectPlan, Plan,
    PlanEvent, PlanEventSink, ProductPlan, SelectPlan, TablePlan,
};
use crate::query::{Constant, Predicate};
use crate::record::Schema;
use crate::tx::Transaction;

/// A join plan candidate for one table, tagged with how the table would
/// be attached so the decision can be reported.
pub struct JoinCandidate {
    pub plan: Arc<dyn Plan>,
    pub strategy: JoinStrategy,
}

/// Plans access to a single table of a query: its standalone select plan,
/// and how to join it onto an accumulated left-deep plan.
pub struct TablePlanner {
    table_plan: Arc<TablePlan>,
    pred: Predicate,
    schema: Schema,
    indexes: BTreeMap<String, IndexInfo>,
    md: Arc<MetadataMgr>,
    tx: Transaction,
    sink: Arc<dyn PlanEventSink>,
}

impl TablePlanner {
    pub fn new(
        table_name: &str,
        pred: Predicate,
        md: Arc<MetadataMgr>,
        tx: Transaction,
        sink: Arc<dyn PlanEventSink>,
    ) -> DbResult<Self> {
        let table_plan = Arc::new(TablePlan::new(table_name, &md, &tx)?);
        let schema = table_plan.schema().clone();
        let indexes = md.get_index_info(table_name, tx.clone())?;
        Ok(TablePlanner {
            table_plan,
            pred,
            schema,
            indexes,
            md,
            tx,
            sink,
        })
    }

    pub fn table_name(&self) -> &str {
        self.table_plan.table_name()
    }

    /// Best standalone access path for this table: a multi-index
    /// intersection when two or more indexed fields are pinned to
    /// constants, a single-index select for one, a full scan otherwise.
    /// The residual selection predicate is wrapped on top in all cases.
    pub fn make_select_plan(&self) -> DbResult<Arc<dyn Plan>> {
        let mut constrained: Vec<(&IndexInfo, Constant)> = Vec::new();
        for (field, index_info) in &self.indexes {
            if let Some(val) = self.pred.equates_with_constant(field) {
                constrained.push((index_info, val.clone()));
            }
        }
        self.sink.plan_event(PlanEvent::SelectPath {
            table: self.table_name().to_string(),
            indexed_fields: constrained
                .iter()
                .map(|(ii, _)| ii.field_name().to_string())
                .collect(),
        });

        let plan: Arc<dyn Plan> = if constrained.is_empty() {
            self.table_plan.clone()
        } else if constrained.len() == 1 {
            let (index_info, val) = constrained.remove(0);
            Arc::new(IndexSelectPlan::new(
                self.table_plan.clone(),
                index_info.clone(),
                val,
            ))
        } else {
            let (index_infos, vals): (Vec<IndexInfo>, Vec<Constant>) = constrained
                .into_iter()
                .map(|(ii, v)| (ii.clone(), v))
                .unzip();
            Arc::new(MultiIndexSelectPlan::new(
                self.table_plan.clone(),
                index_infos,
                vals,
            )?)
        };
        Ok(self.add_select_pred(plan))
    }

    /// How this table would join onto `current`, or `None` when the
    /// predicate does not connect them. Index-based candidates are
    /// compared by estimated block cost; with none available the join
    /// predicate is applied over a cost-compared product.
    pub fn make_join_plan(&self, current: &Arc<dyn Plan>) -> DbResult<Option<JoinCandidate>> {
        let join_pred = match self.pred.join_sub_pred(current.schema(), &self.schema) {
            Some(p) => p,
            None => return Ok(None),
        };

        let (plan, strategy) = match self.best_index_join(current)? {
            Some(candidate) => (self.add_select_pred(candidate.plan), candidate.strategy),
            None => (self.make_product_plan(current), JoinStrategy::ProductSelect),
        };
        Ok(Some(JoinCandidate {
            plan: Arc::new(SelectPlan::new(plan, join_pred)),
            strategy,
        }))
    }

    /// Cheapest of the two product orientations, this table's side wrapped
    /// with its residual select predicate. Ties keep `current` on the left.
    pub fn make_product_plan(&self, current: &Arc<dyn Plan>) -> Arc<dyn Plan> {
        let mine = self.add_select_pred(self.table_plan.clone());
        let current_left: Arc<dyn Plan> =
            Arc::new(ProductPlan::new(current.clone(), mine.clone()));
        let mine_left: Arc<dyn Plan> = Arc::new(ProductPlan::new(mine, current.clone()));
        if mine_left.blocks_accessed() < current_left.blocks_accessed() {
            mine_left
        } else {
            current_left
        }
    }

    /// Index-join candidates in both orientations, cheapest first.
    ///
    /// This table's indexes always apply. The partner's indexes apply only
    /// while `current` is still a bare table plan: reversing orientation
    /// against a composed plan would drop whatever predicates it already
    /// carries.
    fn best_index_join(&self, current: &Arc<dyn Plan>) -> DbResult<Option<JoinCandidate>> {
        let mut candidates: Vec<JoinCandidate> = Vec::new();

        let my_matches = self.joinable_fields(&self.indexes, current.schema());

        if my_matches.len() >= 2 {
            let (index_infos, join_fields): (Vec<IndexInfo>, Vec<String>) = my_matches
                .iter()
                .map(|(ii, f)| ((*ii).clone(), f.clone()))
                .unzip();
            candidates.push(JoinCandidate {
                plan: Arc::new(MultiIndexJoinPlan::new(
                    current.clone(),
                    self.table_plan.clone(),
                    index_infos,
                    join_fields,
                )?),
                strategy: JoinStrategy::MultiIndex,
            });
        }

        if let Some(partner) = current.as_table_plan() {
            let partner_indexes =
                self.md.get_index_info(partner.table_name(), self.tx.clone())?;
            let partner_matches = self.joinable_fields(&partner_indexes, &self.schema);
            if !partner_matches.is_empty() {
                let partner_plan =
                    Arc::new(TablePlan::new(partner.table_name(), &self.md, &self.tx)?);

                if partner_matches.len() >= 2 {
                    let (index_infos, join_fields): (Vec<IndexInfo>, Vec<String>) =
                        partner_matches
                            .iter()
                            .map(|(ii, f)| ((*ii).clone(), f.clone()))
                            .unzip();
                    candidates.push(JoinCandidate {
                        plan: Arc::new(MultiIndexJoinPlan::new(
                            self.table_plan.clone(),
                            partner_plan.clone(),
                            index_infos,
                            join_fields,
                        )?),
                        strategy: JoinStrategy::MultiIndex,
                    });
                }

                for (index_info, outer_field) in partner_matches {
                    candidates.push(JoinCandidate {
                        plan: Arc::new(IndexJoinPlan::new(
                            self.table_plan.clone(),
                            partner_plan.clone(),
                            index_info.clone(),
                            &outer_field,
                        )),
                        strategy: JoinStrategy::SingleIndex,
                    });
                }
            }
        }

        for (index_info, outer_field) in my_matches {
            candidates.push(JoinCandidate {
                plan: Arc::new(IndexJoinPlan::new(
                    current.clone(),
                    self.table_plan.clone(),
                    index_info.clone(),
                    &outer_field,
                )),
                strategy: JoinStrategy::SingleIndex,
            });
        }

        let mut best: Option<JoinCandidate> = None;
        for candidate in candidates {
            let better = match &best {
                Some(b) => candidate.plan.blocks_accessed() < b.plan.blocks_accessed(),
                None => true,
            };
            if better {
                best = Some(candidate);
            }
        }
        Ok(best)
    }

    /// Indexed fields of `indexes` that the predicate equates with a field
    /// available in `other_schema`, paired with that other-side field.
    fn joinable_fields<'a>(
        &self,
        indexes: &'a BTreeMap<String, IndexInfo>,
        other_schema: &Schema,
    ) -> Vec<(&'a IndexInfo, String)> {
        indexes
            .iter()
            .filter_map(|(field, index_info)| {
                self.pred
                    .equates_with_field(field)
                    .filter(|other| other_schema.has_field(other))
                    .map(|other| (index_info, other.to_string()))
            })
            .collect()
    }

    fn add_select_pred(&self, plan: Arc<dyn Plan>) -> Arc<dyn Plan> {
        match self.pred.select_sub_pred(&self.schema) {
            Some(select_pred) => Arc::new(SelectPlan::new(plan, select_pred)),
            None => plan,
        }
    }
}
