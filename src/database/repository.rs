use serde_json::Value;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{Arguments, FromRow, PgPool, Row};

use crate::database::manager::DatabaseError;
use crate::filter::{Filter, FilterData, SqlResult};

/// Typed reads over one content table through the filter DSL
pub struct Repository<T> {
    table_name: &'static str,
    pool: PgPool,
    _row: std::marker::PhantomData<T>,
}

impl<T> Repository<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub fn new(table_name: &'static str, pool: PgPool) -> Self {
        Self { table_name, pool, _row: std::marker::PhantomData }
    }

    fn filter(&self, filter_data: FilterData) -> Result<Filter, DatabaseError> {
        let mut filter = Filter::new(self.table_name)?;
        filter.assign(filter_data)?;
        Ok(filter)
    }

    pub async fn select_any(&self, filter_data: FilterData) -> Result<Vec<T>, DatabaseError> {
        let SqlResult { query, params } = self.filter(filter_data)?.to_sql()?;
        let rows = sqlx::query_as_with::<_, T, _>(&query, arguments(&params))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// First matching row; `None` when nothing matches
    pub async fn select_one(&self, filter_data: FilterData) -> Result<Option<T>, DatabaseError> {
        let SqlResult { query, params } = self.filter(filter_data)?.to_sql()?;
        let row = sqlx::query_as_with::<_, T, _>(&query, arguments(&params))
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn count(&self, filter_data: FilterData) -> Result<i64, DatabaseError> {
        let SqlResult { query, params } = self.filter(filter_data)?.to_count_sql()?;
        let row = sqlx::query_with(&query, arguments(&params)).fetch_one(&self.pool).await?;
        Ok(row.try_get("count")?)
    }
}

/// Bind filter parameters in placeholder order
fn arguments(params: &[Value]) -> PgArguments {
    let mut args = PgArguments::default();
    for value in params {
        match value {
            Value::Null => args.add(None::<String>),
            Value::Bool(b) => args.add(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => args.add(i),
                None => args.add(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => args.add(s.clone()),
            Value::Array(_) | Value::Object(_) => args.add(value.clone()),
        }
    }
    args
}

