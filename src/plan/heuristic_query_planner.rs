use std::sync::Arc;

use crate::error::{DbError, DbResult};
use crate::metadata::MetadataMgr;
use crate::parse::QueryData;
use crate::plan::{Plan, PlanEvent, PlanEventSink, ProjectPlan, TablePlanner, TracingSink};
use crate::tx::Transaction;

/// Builds a left-deep join plan greedily: seed with the most reducible
/// table, then repeatedly attach the remaining table whose join candidate
/// scores best, falling back to a product when nothing joins.
///
/// No global search; every choice is local and final.
pub struct HeuristicQueryPlanner {
    sink: Arc<dyn PlanEventSink>,
}

impl HeuristicQueryPlanner {
    pub fn new() -> Self {
        Self::with_sink(Arc::new(TracingSink))
    }

    pub fn with_sink(sink: Arc<dyn PlanEventSink>) -> Self {
        HeuristicQueryPlanner { sink }
    }

    pub fn create_plan(
        &self,
        data: &QueryData,
        md: Arc<MetadataMgr>,
        tx: &Transaction,
    ) -> DbResult<Arc<dyn Plan>> {
        if data.tables.is_empty() {
            return Err(DbError::Schema("query names no tables".to_string()));
        }

        let mut planners = Vec::with_capacity(data.tables.len());
        for table_name in &data.tables {
            planners.push(TablePlanner::new(
                table_name,
                data.pred.clone(),
                Arc::clone(&md),
                tx.clone(),
                Arc::clone(&self.sink),
            )?);
        }

        let mut current = self.take_best_seed(&mut planners)?;
        while !planners.is_empty() {
            current = match self.take_best_join(&mut planners, &current)? {
                Some(plan) => plan,
                None => self.take_best_product(&mut planners, &current),
            };
        }

        // SELECT * keeps every field of the accumulated plan
        let fields = if data.fields.len() == 1 && data.fields[0] == "*" {
            current.schema().fields().to_vec()
        } else {
            for field in &data.fields {
                if !current.schema().has_field(field) {
                    return Err(DbError::FieldNotFound(field.clone()));
                }
            }
            data.fields.clone()
        };
        Ok(Arc::new(ProjectPlan::new(current, fields)))
    }

    /// Removes and returns the select plan with the strictly greatest
    /// ranking score; ties keep the first-seen planner.
    fn take_best_seed(&self, planners: &mut Vec<TablePlanner>) -> DbResult<Arc<dyn Plan>> {
        let mut best: Option<(usize, Arc<dyn Plan>)> = None;
        for (i, planner) in planners.iter().enumerate() {
            let plan = planner.make_select_plan()?;
            let better = match &best {
                Some((_, b)) => plan.rdf() > b.rdf(),
                None => true,
            };
            if better {
                best = Some((i, plan));
            }
        }
        // planners is non-empty here
        let (i, plan) = best.expect("no table planners");
        self.sink.plan_event(PlanEvent::SeedChosen {
            table: planners[i].table_name().to_string(),
            rdf: plan.rdf(),
        });
        planners.remove(i);
        Ok(plan)
    }

    /// Removes the planner whose join candidate scores strictly greatest
    /// and returns the joined plan, or `None` when nothing joins.
    fn take_best_join(
        &self,
        planners: &mut Vec<TablePlanner>,
        current: &Arc<dyn Plan>,
    ) -> DbResult<Option<Arc<dyn Plan>>> {
        let mut best: Option<(usize, crate::plan::table_planner::JoinCandidate)> = None;
        for (i, planner) in planners.iter().enumerate() {
            if let Some(candidate) = planner.make_join_plan(current)? {
                let better = match &best {
                    Some((_, b)) => candidate.plan.rdf() > b.plan.rdf(),
                    None => true,
                };
                if better {
                    best = Some((i, candidate));
                }
            }
        }
        match best {
            Some((i, candidate)) => {
                self.sink.plan_event(PlanEvent::JoinChosen {
                    table: planners[i].table_name().to_string(),
                    strategy: candidate.strategy,
                    blocks: candidate.plan.blocks_accessed(),
                });
                planners.remove(i);
                Ok(Some(candidate.plan))
            }
            None => Ok(None),
        }
    }

    /// Product fallback when the predicate connects none of the remaining
    /// tables to the accumulated plan. Always succeeds.
    fn take_best_product(
        &self,
        planners: &mut Vec<TablePlanner>,
        current: &Arc<dyn Plan>,
    ) -> Arc<dyn Plan> {
        let mut best: Option<(usize, Arc<dyn Plan>)> = None;
        for (i, planner) in planners.iter().enumerate() {
            let plan = planner.make_product_plan(current);
            let better = match &best {
                Some((_, b)) => plan.rdf() > b.rdf(),
                None => true,
            };
            if better {
                best = Some((i, plan));
            }
        }
        // the caller only gets here with planners remaining
        let (i, plan) = best.expect("no table planners");
        self.sink.plan_event(PlanEvent::ProductFallback {
            table: planners[i].table_name().to_string(),
            blocks: plan.blocks_accessed(),
        });
        planners.remove(i);
        plan
    }
}

impl Default for HeuristicQueryPlanner {
    fn default() -> Self {
        Self::new()
    }
}
