use std::sync::Arc;

use rand::seq::SliceRandom;

use heurodb::plan::{
    MultiIndexJoinPlan, MultiIndexSelectPlan, Plan, PlanEvent, RecordingSink, TablePlan,
};
use heurodb::query::{Constant, Scan};
use heurodb::utils::testing_utils::{temp_db, temp_db_with_sink};
use heurodb::{DbError, DbResult};

/// Two tables with no connecting predicate term: the planner must fall
/// back to a product and still produce every pairing.
#[test]
fn test_unconnected_tables_use_product_fallback() -> DbResult<()> {
    let sink = Arc::new(RecordingSink::new());
    let db = temp_db_with_sink(sink.clone())?;
    let tx = db.new_tx();
    let planner = db.planner();

    planner.execute_update("CREATE TABLE l (lv INT)", &tx)?;
    planner.execute_update("CREATE TABLE r (rv INT)", &tx)?;
    for v in 1..=3 {
        planner.execute_update(&format!("INSERT INTO l (lv) VALUES ({})", v), &tx)?;
    }
    for v in 1..=2 {
        planner.execute_update(&format!("INSERT INTO r (rv) VALUES ({})", v), &tx)?;
    }

    let plan = planner.create_query_plan("SELECT lv, rv FROM l, r", &tx)?;
    let mut scan = plan.open(&tx)?;
    let mut count = 0;
    while scan.next()? {
        count += 1;
    }
    scan.close();
    assert_eq!(count, 6);

    assert!(
        sink.events()
            .iter()
            .any(|e| matches!(e, PlanEvent::ProductFallback { .. })),
        "expected a product fallback decision"
    );
    Ok(())
}

/// Adding an index to a multi-index select plan can only shrink its
/// estimates, never grow them.
#[test]
fn test_more_indexes_never_raise_estimates() -> DbResult<()> {
    let db = temp_db()?;
    let tx = db.new_tx();
    let planner = db.planner();

    planner.execute_update("CREATE TABLE t (id INT, x INT, y INT)", &tx)?;
    planner.execute_update("CREATE INDEX x_idx ON t (x)", &tx)?;
    planner.execute_update("CREATE INDEX y_idx ON t (y)", &tx)?;
    for id in 1..=20 {
        planner.execute_update(
            &format!("INSERT INTO t (id, x, y) VALUES ({}, {}, {})", id, id % 4, id % 5),
            &tx,
        )?;
    }

    let md = db.metadata_mgr();
    let table_plan = Arc::new(TablePlan::new("t", &md, &tx)?);
    let indexes = md.get_index_info("t", tx.clone())?;
    let x_idx = indexes.get("x").expect("x index").clone();
    let y_idx = indexes.get("y").expect("y index").clone();

    let one = MultiIndexSelectPlan::new(
        table_plan.clone(),
        vec![x_idx.clone()],
        vec![Constant::int(1)],
    )?;
    let two = MultiIndexSelectPlan::new(
        table_plan,
        vec![x_idx, y_idx],
        vec![Constant::int(1), Constant::int(2)],
    )?;

    assert!(two.records_output() <= one.records_output());
    assert!(two.blocks_accessed() <= one.blocks_accessed());
    Ok(())
}

/// Indexes of different tables carry different statistics; mixing them
/// into one multi-index plan must fail loudly, not cost-estimate garbage.
#[test]
fn test_mixed_table_indexes_are_rejected() -> DbResult<()> {
    let db = temp_db()?;
    let tx = db.new_tx();
    let planner = db.planner();

    planner.execute_update("CREATE TABLE a (a1 INT, a2 INT)", &tx)?;
    planner.execute_update("CREATE TABLE b (b1 INT, b2 INT)", &tx)?;
    planner.execute_update("CREATE INDEX a1_idx ON a (a1)", &tx)?;
    planner.execute_update("CREATE INDEX b1_idx ON b (b1)", &tx)?;

    let md = db.metadata_mgr();
    let a_plan = Arc::new(TablePlan::new("a", &md, &tx)?);
    let a1_idx = md
        .get_index_info("a", tx.clone())?
        .get("a1")
        .expect("a1 index")
        .clone();
    let b1_idx = md
        .get_index_info("b", tx.clone())?
        .get("b1")
        .expect("b1 index")
        .clone();

    let result = MultiIndexSelectPlan::new(
        a_plan,
        vec![a1_idx, b1_idx],
        vec![Constant::int(1), Constant::int(1)],
    );
    assert!(matches!(result, Err(DbError::PlanContract(_))));
    Ok(())
}

/// A multi-index join candidate with no indexes at all is a construction
/// bug and must be rejected up front, not panic during cost estimation.
#[test]
fn test_empty_index_list_is_rejected() -> DbResult<()> {
    let db = temp_db()?;
    let tx = db.new_tx();
    let planner = db.planner();

    planner.execute_update("CREATE TABLE a (a1 INT)", &tx)?;
    planner.execute_update("CREATE TABLE b (b1 INT)", &tx)?;

    let md = db.metadata_mgr();
    let a_plan = Arc::new(TablePlan::new("a", &md, &tx)?);
    let b_plan = Arc::new(TablePlan::new("b", &md, &tx)?);

    let result = MultiIndexJoinPlan::new(a_plan, b_plan, Vec::new(), Vec::new());
    assert!(matches!(result, Err(DbError::PlanContract(_))));
    Ok(())
}

/// The answer to an indexed conjunction does not depend on the physical
/// insertion order of the rows.
#[test]
fn test_result_independent_of_insert_order() -> DbResult<()> {
    let mut rows: Vec<(i32, i32, i32)> = (1..=30).map(|id| (id, id % 3, id % 7)).collect();
    rows.shuffle(&mut rand::rng());

    let db = temp_db()?;
    let tx = db.new_tx();
    let planner = db.planner();

    planner.execute_update("CREATE TABLE t (id INT, x INT, y INT)", &tx)?;
    planner.execute_update("CREATE INDEX x_idx ON t (x)", &tx)?;
    planner.execute_update("CREATE INDEX y_idx ON t (y)", &tx)?;
    for (id, x, y) in &rows {
        planner.execute_update(
            &format!("INSERT INTO t (id, x, y) VALUES ({}, {}, {})", id, x, y),
            &tx,
        )?;
    }

    let plan = planner.create_query_plan("SELECT id FROM t WHERE x = 1 AND y = 3", &tx)?;
    let mut scan = plan.open(&tx)?;
    let mut ids = Vec::new();
    while scan.next()? {
        ids.push(scan.get_int("id")?);
    }
    scan.close();
    ids.sort();

    let expected: Vec<i32> = (1..=30).filter(|id| id % 3 == 1 && id % 7 == 3).collect();
    assert_eq!(ids, expected);
    Ok(())
}
