//! Applies resolved sorts and pages to sea-orm queries.

use std::str::FromStr;

use sea_orm::{EntityTrait, Order, QueryOrder, QuerySelect, Select};
use tracing::warn;

use crate::domain::{pagination::value_objects::OffsetLimit, sort::value_objects::SortSpec};

/// Appends one ORDER BY term per entry of `spec`, in order. Fields that do
/// not name a column of `E` are skipped.
pub fn apply_sort_spec<E>(mut query: Select<E>, spec: &SortSpec) -> Select<E>
where
    E: EntityTrait,
{
    for term in spec {
        match <E::Column as FromStr>::from_str(&term.field) {
            Ok(column) => {
                query = query.order_by(column, Order::from(term.direction));
            }
            Err(_) => {
                warn!(
                    "sort field {:?} is not a column of {}, skipping",
                    term.field,
                    E::default().table_name()
                );
            }
        }
    }
    query
}

pub fn apply_pagination<E>(query: Select<E>, pagination: OffsetLimit) -> Select<E>
where
    E: EntityTrait,
{
    query
        .limit(pagination.limit.max(0) as u64)
        .offset(pagination.offset.max(0) as u64)
}

#[cfg(test)]
mod tests {
    use sea_orm::{DbBackend, QueryTrait};

    use super::*;
    use crate::domain::sort::value_objects::SortDirection::{Asc, Desc};

    mod users {
        use sea_orm::entity::prelude::*;

        #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
        #[sea_orm(table_name = "users")]
        pub struct Model {
            #[sea_orm(primary_key)]
            pub id: i32,
            pub name: String,
            pub package_name: String,
        }

        #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
        pub enum Relation {}

        impl ActiveModelBehavior for ActiveModel {}
    }

    fn to_sql(query: Select<users::Entity>) -> String {
        query.build(DbBackend::Postgres).to_string()
    }

    #[test]
    fn test_orders_in_spec_order() {
        let spec = SortSpec::from_iter([("package_name", Desc), ("id", Asc)]);
        let sql = to_sql(apply_sort_spec(users::Entity::find(), &spec));
        assert!(
            sql.ends_with(r#"ORDER BY "users"."package_name" DESC, "users"."id" ASC"#),
            "{sql}"
        );
    }

    #[test]
    fn test_empty_spec_adds_no_order() {
        let sql = to_sql(apply_sort_spec(users::Entity::find(), &SortSpec::new()));
        assert!(!sql.contains("ORDER BY"), "{sql}");
    }

    #[test]
    fn test_unknown_columns_are_skipped() {
        let spec = SortSpec::from_iter([("qqq", Desc), ("name", Asc)]);
        let sql = to_sql(apply_sort_spec(users::Entity::find(), &spec));
        assert!(sql.ends_with(r#"ORDER BY "users"."name" ASC"#), "{sql}");
        assert!(!sql.contains("qqq"), "{sql}");
    }

    #[test]
    fn test_pagination() {
        let query = apply_pagination(users::Entity::find(), OffsetLimit::new(18, 2));
        let sql = to_sql(query);
        assert!(sql.contains("LIMIT 2"), "{sql}");
        assert!(sql.contains("OFFSET 18"), "{sql}");
    }
}
