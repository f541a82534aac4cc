use std::sync::Arc;

use crate::error::{DbError, DbResult};
use crate::index::Index;
use crate::metadata::MetadataMgr;
use crate::parse::{Parser, QueryData, Statement};
use crate::plan::{HeuristicQueryPlanner, Plan, PlanEventSink};
use crate::query::{Constant, Predicate, Scan, UpdateScan};
use crate::record::{Layout, Schema, TableScan};
use crate::tx::Transaction;

/// SQL entry point: parses a statement, then either plans a query or
/// executes an update, keeping indexes in sync with the data they cover.
pub struct Planner {
    parser: Parser,
    query_planner: HeuristicQueryPlanner,
    metadata_mgr: Arc<MetadataMgr>,
}

impl Planner {
    pub fn new(metadata_mgr: Arc<MetadataMgr>) -> Self {
        Planner {
            parser: Parser::new(),
            query_planner: HeuristicQueryPlanner::new(),
            metadata_mgr,
        }
    }

    pub fn with_sink(metadata_mgr: Arc<MetadataMgr>, sink: Arc<dyn PlanEventSink>) -> Self {
        Planner {
            parser: Parser::new(),
            query_planner: HeuristicQueryPlanner::with_sink(sink),
            metadata_mgr,
        }
    }

    pub fn create_query_plan(&self, query: &str, tx: &Transaction) -> DbResult<Arc<dyn Plan>> {
        match self.parser.parse(query)? {
            Statement::Query(data) => self.plan_query(&data, tx),
            _ => Err(DbError::Schema(
                "Only SELECT statements produce query plans".to_string(),
            )),
        }
    }

    /// Plans an already-parsed query; the driver for callers that build
    /// `QueryData` themselves.
    pub fn plan_query(&self, data: &QueryData, tx: &Transaction) -> DbResult<Arc<dyn Plan>> {
        self.query_planner
            .create_plan(data, Arc::clone(&self.metadata_mgr), tx)
    }

    pub fn execute_update(&self, cmd: &str, tx: &Transaction) -> DbResult<usize> {
        match self.parser.parse(cmd)? {
            Statement::Insert {
                table_name,
                fields,
                values,
            } => self.execute_insert(&table_name, &fields, &values, tx),
            Statement::Update {
                table_name,
                fields,
                values,
                pred,
            } => self.execute_modify(&table_name, &fields, &values, &pred, tx),
            Statement::CreateTable { table_name, schema } => {
                self.execute_create_table(&table_name, &schema, tx)
            }
            Statement::CreateIndex {
                name,
                table_name,
                column,
            } => self.execute_create_index(&name, &table_name, &column, tx),
            Statement::Query(_) => Err(DbError::Schema(
                "SELECT is not an update statement".to_string(),
            )),
        }
    }

    fn check_fields(layout: &Layout, fields: &[String]) -> DbResult<()> {
        for field in fields {
            if !layout.schema().has_field(field) {
                return Err(DbError::FieldNotFound(field.clone()));
            }
        }
        Ok(())
    }

    fn execute_insert(
        &self,
        table_name: &str,
        fields: &[String],
        values: &[Constant],
        tx: &Transaction,
    ) -> DbResult<usize> {
        let layout = self.metadata_mgr.get_layout(table_name, tx.clone())?;
        Self::check_fields(&layout, fields)?;
        let indexes = self.metadata_mgr.get_index_info(table_name, tx.clone())?;

        let mut scan = TableScan::new(tx.clone(), table_name, layout)?;
        scan.insert()?;
        let rid = scan.get_rid()?;
        for (field, value) in fields.iter().zip(values) {
            scan.set_val(field, value.clone())?;
            if let Some(index_info) = indexes.get(field) {
                let mut index = index_info.open();
                index.insert(value, &rid)?;
                index.close();
            }
        }
        scan.close();

        Ok(1)
    }

    fn execute_modify(
        &self,
        table_name: &str,
        fields: &[String],
        values: &[Constant],
        pred: &Predicate,
        tx: &Transaction,
    ) -> DbResult<usize> {
        let layout = self.metadata_mgr.get_layout(table_name, tx.clone())?;
        Self::check_fields(&layout, fields)?;
        let indexes = self.metadata_mgr.get_index_info(table_name, tx.clone())?;

        let mut scan = TableScan::new(tx.clone(), table_name, layout)?;
        let mut affected = 0;
        scan.before_first()?;
        while scan.next()? {
            if !pred.is_satisfied(&mut scan)? {
                continue;
            }
            let rid = scan.get_rid()?;
            for (field, value) in fields.iter().zip(values) {
                // keep the index in step with the modified field
                if let Some(index_info) = indexes.get(field) {
                    let old_val = scan.get_val(field)?;
                    let mut index = index_info.open();
                    index.delete(&old_val, &rid)?;
                    index.insert(value, &rid)?;
                    index.close();
                }
                scan.set_val(field, value.clone())?;
            }
            affected += 1;
        }
        scan.close();

        Ok(affected)
    }

    fn execute_create_table(
        &self,
        table_name: &str,
        schema: &Schema,
        tx: &Transaction,
    ) -> DbResult<usize> {
        self.metadata_mgr.create_table(table_name, schema, tx.clone())?;
        Ok(0)
    }

    /// Registers the index and backfills it from the existing table rows.
    fn execute_create_index(
        &self,
        index_name: &str,
        table_name: &str,
        column: &str,
        tx: &Transaction,
    ) -> DbResult<usize> {
        self.metadata_mgr
            .create_index(index_name, table_name, column, tx.clone())?;

        let layout = self.metadata_mgr.get_layout(table_name, tx.clone())?;
        let indexes = self.metadata_mgr.get_index_info(table_name, tx.clone())?;
        let index_info = indexes
            .get(column)
            .ok_or_else(|| DbError::BadIndex(format!("index on {} not found", column)))?;

        let mut index = index_info.open();
        let mut scan = TableScan::new(tx.clone(), table_name, layout)?;
        scan.before_first()?;
        while scan.next()? {
            let rid = scan.get_rid()?;
            let val = scan.get_val(column)?;
            index.insert(&val, &rid)?;
        }
        index.close();
        scan.close();

        Ok(0)
    }
}
