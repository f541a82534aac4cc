use sqlparser::ast::{
    BinaryOperator, CharacterLength, DataType, SetExpr, Statement as SqlStatement, Value,
};
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser as SqlParser;

use crate::error::{DbError, DbResult};
use crate::query::{Constant, Expr, Predicate, Term};
use crate::record::Schema;

/// A parsed SELECT: requested fields, table list, and the conjunctive
/// WHERE predicate (empty when there was no WHERE clause).
#[derive(Debug, Clone)]
pub struct QueryData {
    pub fields: Vec<String>,
    pub tables: Vec<String>,
    pub pred: Predicate,
}

#[derive(Debug, Clone)]
pub enum Statement {
    CreateTable {
        table_name: String,
        schema: Schema,
    },
    CreateIndex {
        name: String,
        table_name: String,
        column: String,
    },
    Insert {
        table_name: String,
        fields: Vec<String>,
        values: Vec<Constant>,
    },
    Update {
        table_name: String,
        fields: Vec<String>,
        values: Vec<Constant>,
        pred: Predicate,
    },
    Query(QueryData),
}

/// Thin front end over `sqlparser`, restricted to the SQL subset the
/// engine executes: single-row INSERT, conjunctive equality WHERE
/// clauses, INT and VARCHAR(n) columns, single-column indexes.
pub struct Parser {
    dialect: GenericDialect,
}

impl Parser {
    pub fn new() -> Self {
        Parser {
            dialect: GenericDialect::default(),
        }
    }

    pub fn parse(&self, sql: &str) -> DbResult<Statement> {
        let ast = SqlParser::parse_sql(&self.dialect, sql)
            .map_err(|e| DbError::Schema(format!("Failed to parse SQL: {}", e)))?;

        match ast.first() {
            Some(SqlStatement::CreateTable(create_table)) => {
                self.parse_create_table(create_table)
            }
            Some(SqlStatement::CreateIndex(create_index)) => {
                self.parse_create_index(create_index)
            }
            Some(SqlStatement::Insert(insert)) => self.parse_insert(insert),
            Some(SqlStatement::Update {
                table,
                assignments,
                selection,
                ..
            }) => {
                let table_name = match &table.relation {
                    sqlparser::ast::TableFactor::Table { name, .. } => name.to_string(),
                    _ => {
                        return Err(DbError::Schema(
                            "Only simple table references are supported in UPDATE".to_string(),
                        ))
                    }
                };
                self.parse_update(&table_name, assignments, selection)
            }
            Some(SqlStatement::Query(query)) => self.parse_select(&query.body),
            Some(_) => Err(DbError::Schema("Unsupported SQL statement".to_string())),
            None => Err(DbError::Schema("Empty SQL statement".to_string())),
        }
    }

    fn parse_create_table(
        &self,
        create_table: &sqlparser::ast::CreateTable,
    ) -> DbResult<Statement> {
        let table_name = create_table.name.to_string();
        let mut schema = Schema::new();

        for col in &create_table.columns {
            let field_name = col.name.to_string();
            match col.data_type {
                DataType::Int(_) => schema.add_int_field(&field_name),
                DataType::Varchar(Some(CharacterLength::IntegerLength { length, .. })) => {
                    schema.add_string_field(&field_name, length as usize)
                }
                _ => {
                    return Err(DbError::Schema(format!(
                        "Unsupported data type for column {}",
                        field_name
                    )))
                }
            }
        }

        Ok(Statement::CreateTable { table_name, schema })
    }

    fn parse_create_index(
        &self,
        create_index: &sqlparser::ast::CreateIndex,
    ) -> DbResult<Statement> {
        let name = create_index
            .name
            .as_ref()
            .ok_or_else(|| DbError::Schema("Index name is required".to_string()))?
            .to_string();
        let table_name = create_index.table_name.to_string();

        match create_index.columns.as_slice() {
            [column] => Ok(Statement::CreateIndex {
                name,
                table_name,
                column: column.to_string(),
            }),
            [] => Err(DbError::Schema(
                "No columns specified for index".to_string(),
            )),
            _ => Err(DbError::Schema(
                "Only single-column indexes are supported".to_string(),
            )),
        }
    }

    fn parse_insert(&self, insert: &sqlparser::ast::Insert) -> DbResult<Statement> {
        let table_name = insert.table.to_string();

        if insert.columns.is_empty() {
            return Err(DbError::Schema("No columns provided".to_string()));
        }
        let fields: Vec<String> = insert
            .columns
            .iter()
            .map(|col| col.value.clone())
            .collect();

        let rows = match insert.source.as_deref().map(|query| &*query.body) {
            Some(SetExpr::Values(values)) => &values.rows,
            _ => {
                return Err(DbError::Schema(
                    "Only a VALUES clause is supported for INSERT".to_string(),
                ))
            }
        };
        let row = rows
            .first()
            .ok_or_else(|| DbError::Schema("No values provided for INSERT".to_string()))?;

        let values = row
            .iter()
            .map(|expr| match expr {
                sqlparser::ast::Expr::Value(value) => self.parse_constant(&value.value),
                _ => Err(DbError::Schema(
                    "Only literal values are supported in INSERT".to_string(),
                )),
            })
            .collect::<DbResult<Vec<Constant>>>()?;

        if fields.len() != values.len() {
            return Err(DbError::Schema(
                "INSERT column and value counts differ".to_string(),
            ));
        }

        Ok(Statement::Insert {
            table_name,
            fields,
            values,
        })
    }

    fn parse_update(
        &self,
        table_name: &str,
        assignments: &[sqlparser::ast::Assignment],
        selection: &Option<sqlparser::ast::Expr>,
    ) -> DbResult<Statement> {
        let mut fields = Vec::new();
        let mut values = Vec::new();

        for assignment in assignments {
            fields.push(assignment.target.to_string());
            let value = match &assignment.value {
                sqlparser::ast::Expr::Value(value) => self.parse_constant(&value.value)?,
                _ => {
                    return Err(DbError::Schema(
                        "Only literal values are supported in UPDATE".to_string(),
                    ))
                }
            };
            values.push(value);
        }

        let pred = match selection {
            Some(where_clause) => self.parse_where_clause(where_clause)?,
            None => Predicate::default(),
        };

        Ok(Statement::Update {
            table_name: table_name.to_string(),
            fields,
            values,
            pred,
        })
    }

    fn parse_select(&self, query: &SetExpr) -> DbResult<Statement> {
        let select = match query {
            SetExpr::Select(select) => select,
            _ => {
                return Err(DbError::Schema(
                    "Only plain SELECT queries are supported".to_string(),
                ))
            }
        };

        let fields = select
            .projection
            .iter()
            .map(|item| match item {
                sqlparser::ast::SelectItem::UnnamedExpr(sqlparser::ast::Expr::Identifier(
                    ident,
                )) => Ok(ident.value.clone()),
                sqlparser::ast::SelectItem::Wildcard(_) => Ok("*".to_string()),
                _ => Err(DbError::Schema(
                    "Only simple column references are supported".to_string(),
                )),
            })
            .collect::<DbResult<Vec<String>>>()?;

        let tables = select
            .from
            .iter()
            .map(|table_with_join| match &table_with_join.relation {
                sqlparser::ast::TableFactor::Table { name, .. } => Ok(name.to_string()),
                _ => Err(DbError::Schema(
                    "Only simple table references are supported".to_string(),
                )),
            })
            .collect::<DbResult<Vec<String>>>()?;

        let pred = match &select.selection {
            Some(where_clause) => self.parse_where_clause(where_clause)?,
            None => Predicate::default(),
        };

        Ok(Statement::Query(QueryData {
            fields,
            tables,
            pred,
        }))
    }

    /// WHERE clauses are conjunctions of equality terms; either side of an
    /// `=` may be a field name or a literal, so `a1 = b1` join terms parse
    /// the same way as `a2 = 7` selection terms.
    fn parse_where_clause(&self, expr: &sqlparser::ast::Expr) -> DbResult<Predicate> {
        match expr {
            sqlparser::ast::Expr::BinaryOp { left, op, right } => match op {
                BinaryOperator::Eq => {
                    let lhs = self.parse_operand(left)?;
                    let rhs = self.parse_operand(right)?;
                    Ok(Predicate::new(Term::new(lhs, rhs)))
                }
                BinaryOperator::And => {
                    let left_pred = self.parse_where_clause(left)?;
                    let right_pred = self.parse_where_clause(right)?;
                    Ok(left_pred.conjoin_with(right_pred))
                }
                _ => Err(DbError::Schema(
                    "Only = and AND are supported in WHERE clauses".to_string(),
                )),
            },
            sqlparser::ast::Expr::Nested(inner) => self.parse_where_clause(inner),
            _ => Err(DbError::Schema(
                "Unsupported expression in WHERE clause".to_string(),
            )),
        }
    }

    fn parse_operand(&self, expr: &sqlparser::ast::Expr) -> DbResult<Expr> {
        match expr {
            sqlparser::ast::Expr::Identifier(ident) => Ok(Expr::field_name(ident.value.clone())),
            sqlparser::ast::Expr::Value(value) => {
                Ok(Expr::constant(self.parse_constant(&value.value)?))
            }
            _ => Err(DbError::Schema(
                "Operands of = must be field names or literals".to_string(),
            )),
        }
    }

    fn parse_constant(&self, value: &Value) -> DbResult<Constant> {
        match value {
            Value::SingleQuotedString(s) => Ok(Constant::String(s.clone())),
            Value::Number(n, _) => Ok(Constant::Int(n.parse().map_err(|_| {
                DbError::Schema(format!("Invalid integer value: {}", n))
            })?)),
            _ => Err(DbError::Schema("Unsupported literal type".to_string())),
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldType;

    #[test]
    fn test_parse_create_table() -> DbResult<()> {
        let parser = Parser::new();
        let stmt = parser.parse("CREATE TABLE test_table (id INT, name VARCHAR(20))")?;

        match stmt {
            Statement::CreateTable { table_name, schema } => {
                assert_eq!(table_name, "test_table");
                assert_eq!(schema.field_type("id"), Some(FieldType::Integer));
                assert_eq!(schema.field_type("name"), Some(FieldType::Varchar));
                assert_eq!(schema.length("name"), Some(20));
            }
            _ => panic!("Unexpected statement"),
        }
        Ok(())
    }

    #[test]
    fn test_parse_create_index() -> DbResult<()> {
        let parser = Parser::new();
        let stmt = parser.parse("CREATE INDEX a_idx ON a (a1)")?;

        match stmt {
            Statement::CreateIndex {
                name,
                table_name,
                column,
            } => {
                assert_eq!(name, "a_idx");
                assert_eq!(table_name, "a");
                assert_eq!(column, "a1");
            }
            _ => panic!("Unexpected statement"),
        }
        Ok(())
    }

    #[test]
    fn test_parse_insert() -> DbResult<()> {
        let parser = Parser::new();
        let stmt = parser.parse("INSERT INTO test_table (id, name) VALUES (1, 'Alice')")?;

        match stmt {
            Statement::Insert {
                table_name,
                fields,
                values,
            } => {
                assert_eq!(table_name, "test_table");
                assert_eq!(fields, vec!["id", "name"]);
                assert_eq!(values, vec![Constant::int(1), Constant::string("Alice")]);
            }
            _ => panic!("Unexpected statement"),
        }
        Ok(())
    }

    #[test]
    fn test_parse_select_with_join_terms() -> DbResult<()> {
        let parser = Parser::new();
        let stmt =
            parser.parse("SELECT a1, b2 FROM a, b WHERE a1 = b1 AND a2 = b2 AND a3 = 7")?;

        match stmt {
            Statement::Query(data) => {
                assert_eq!(data.fields, vec!["a1", "b2"]);
                assert_eq!(data.tables, vec!["a", "b"]);
                assert_eq!(data.pred.equates_with_field("a1"), Some("b1"));
                assert_eq!(data.pred.equates_with_field("b2"), Some("a2"));
                assert_eq!(
                    data.pred.equates_with_constant("a3"),
                    Some(&Constant::int(7))
                );
            }
            _ => panic!("Unexpected statement"),
        }
        Ok(())
    }

    #[test]
    fn test_parse_select_without_where() -> DbResult<()> {
        let parser = Parser::new();
        let stmt = parser.parse("SELECT * FROM a")?;

        match stmt {
            Statement::Query(data) => {
                assert_eq!(data.fields, vec!["*"]);
                assert!(data.pred.is_empty());
            }
            _ => panic!("Unexpected statement"),
        }
        Ok(())
    }

    #[test]
    fn test_parse_invalid_sql() {
        let parser = Parser::new();
        assert!(parser.parse("INVALID SQL").is_err());
    }

    #[test]
    fn test_parse_rejects_inequality() {
        let parser = Parser::new();
        assert!(parser.parse("SELECT a1 FROM a WHERE a1 < 3").is_err());
    }
}
