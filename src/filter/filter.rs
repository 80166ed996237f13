use serde_json::Value;

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{FilterData, FilterOrderInfo, SqlResult};

/// `SELECT *` over one table with optional where / order / limit, parameterized
pub struct Filter {
    table_name: String,
    where_data: Option<Value>,
    order_data: Vec<FilterOrderInfo>,
    limit: Option<i32>,
}

/// Lowercase-or-underscore led, alphanumeric/underscore identifiers only
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl Filter {
    pub fn new(table_name: impl Into<String>) -> Result<Self, FilterError> {
        let table_name = table_name.into();
        if !is_identifier(&table_name) {
            return Err(FilterError::InvalidIdentifier(format!("table '{}'", table_name)));
        }
        Ok(Self { table_name, where_data: None, order_data: vec![], limit: None })
    }

    pub fn assign(&mut self, data: FilterData) -> Result<&mut Self, FilterError> {
        if let Some(where_clause) = data.where_clause { self.where_clause(where_clause)?; }
        if let Some(order) = data.order { self.order(order)?; }
        if let Some(limit) = data.limit { self.limit(limit)?; }
        Ok(self)
    }

    pub fn where_clause(&mut self, conditions: Value) -> Result<&mut Self, FilterError> {
        FilterWhere::validate(&conditions)?;
        self.where_data = Some(conditions);
        Ok(self)
    }

    pub fn order(&mut self, order_spec: Value) -> Result<&mut Self, FilterError> {
        self.order_data = FilterOrder::validate_and_parse(&order_spec)?;
        Ok(self)
    }

    /// Callers clamp to their configured ceiling first; this only rejects negatives
    pub fn limit(&mut self, limit: i32) -> Result<&mut Self, FilterError> {
        if limit < 0 {
            return Err(FilterError::NegativeLimit(limit));
        }
        self.limit = Some(limit);
        Ok(self)
    }

    pub fn to_sql(&self) -> Result<SqlResult, FilterError> {
        let (where_clause, params) = self.build_where()?;
        let mut query = format!("SELECT * FROM \"{}\"", self.table_name);
        if !where_clause.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&where_clause);
        }
        let order_clause = FilterOrder::generate(&self.order_data);
        if !order_clause.is_empty() {
            query.push(' ');
            query.push_str(&order_clause);
        }
        if let Some(limit) = self.limit {
            query.push_str(&format!(" LIMIT {}", limit));
        }
        Ok(SqlResult { query, params })
    }

    pub fn to_count_sql(&self) -> Result<SqlResult, FilterError> {
        let (where_clause, params) = self.build_where()?;
        let query = if where_clause.is_empty() {
            format!("SELECT COUNT(*) as count FROM \"{}\"", self.table_name)
        } else {
            format!("SELECT COUNT(*) as count FROM \"{}\" WHERE {}", self.table_name, where_clause)
        };
        Ok(SqlResult { query, params })
    }

    fn build_where(&self) -> Result<(String, Vec<Value>), FilterError> {
        match self.where_data {
            Some(ref where_data) => FilterWhere::generate(where_data, 0),
            None => Ok((String::new(), vec![])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sql_for(table: &str, data: FilterData) -> SqlResult {
        let mut filter = Filter::new(table).unwrap();
        filter.assign(data).unwrap();
        filter.to_sql().unwrap()
    }

    #[test]
    fn bare_select_has_no_where() {
        let sql = sql_for("blog_categories", FilterData::default().ordered("id asc"));
        assert_eq!(sql.query, "SELECT * FROM \"blog_categories\" ORDER BY \"id\" ASC");
        assert!(sql.params.is_empty());
    }

    #[test]
    fn featured_divisions_query() {
        let data = FilterData::where_eq(json!({ "featured": true })).ordered("featured desc, name asc");
        let sql = sql_for("brand_divisions", data);
        assert_eq!(
            sql.query,
            "SELECT * FROM \"brand_divisions\" WHERE \"featured\" = $1 ORDER BY \"featured\" DESC, \"name\" ASC"
        );
        assert_eq!(sql.params, vec![json!(true)]);
    }

    #[test]
    fn count_with_exclusion() {
        let mut filter = Filter::new("blog_posts").unwrap();
        filter.where_clause(json!({ "slug": "hello", "id": { "$ne": 3 } })).unwrap();
        let sql = filter.to_count_sql().unwrap();
        assert!(sql.query.starts_with("SELECT COUNT(*) as count FROM \"blog_posts\" WHERE "));
        assert!(sql.query.contains("\"slug\" = $"));
        assert!(sql.query.contains("\"id\" <> $"));
        assert_eq!(sql.params.len(), 2);
    }

    #[test]
    fn limit_is_rendered_after_order() {
        let data = FilterData::default().ordered("id desc").limited(Some(10));
        let sql = sql_for("blog_posts", data);
        assert_eq!(sql.query, "SELECT * FROM \"blog_posts\" ORDER BY \"id\" DESC LIMIT 10");
    }

    #[test]
    fn rejects_bad_identifiers() {
        assert!(Filter::new("posts; drop table users").is_err());
        assert!(Filter::new("").is_err());
        let mut filter = Filter::new("blog_posts").unwrap();
        assert!(matches!(filter.order(json!("title; --")), Err(FilterError::InvalidOrder(_))));
        assert!(matches!(filter.limit(-1), Err(FilterError::NegativeLimit(-1))));
    }
}
