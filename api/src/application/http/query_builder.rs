//! Builds the ordering and page of a listing request.
//!
//! The sort is resolved against the endpoint's [`SortScopes`]; pagination
//! values go through the params parser so malformed numbers surface as a
//! `400` instead of silently falling back.

use sea_orm::{EntityTrait, Select};
use sortscope_core::{
    domain::{
        pagination::value_objects::{OffsetLimit, PageParams},
        params::{
            errors::ParseError,
            services::{Params, ParamsParser},
        },
        sort::{
            entities::SortScopes,
            value_objects::{RequestedSort, SortSpec},
        },
    },
    infrastructure::sort::query_order::{apply_pagination, apply_sort_spec},
};
use tracing::debug;

use super::{query_params::RequestParams, server::api_entities::api_error::ApiError};
use crate::args::QueryArgs;

/// Resolved sort and page of a listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub sort: SortSpec,
    pub pagination: OffsetLimit,
}

impl ListQuery {
    pub fn from_params(
        params: &RequestParams,
        args: &QueryArgs,
        scopes: &SortScopes,
        action: &str,
    ) -> Result<Self, ApiError> {
        let config = args.pagination_config()?;
        let pagination = page_params(params, args)?.to_offset_limit(&config);
        let sort = sort_spec(params, args, scopes, action);

        debug!(
            "list query for {}: {} sort terms, offset {}, limit {}",
            action,
            sort.len(),
            pagination.offset,
            pagination.limit
        );

        Ok(Self { sort, pagination })
    }

    pub fn apply<E: EntityTrait>(&self, query: Select<E>) -> Select<E> {
        apply_pagination(apply_sort_spec(query, &self.sort), self.pagination)
    }
}

/// Reads the sort value and the descending flag, then resolves them against
/// every scope registered for `action`.
pub fn sort_spec(
    params: &RequestParams,
    args: &QueryArgs,
    scopes: &SortScopes,
    action: &str,
) -> SortSpec {
    let requested = RequestedSort::from_param(params.get(&args.sort_param));
    let descending = Params::new()
        .parse_boolean(params.get(&args.sort_desc_param))
        .unwrap_or(false);

    scopes.resolve(action, &requested, descending)
}

pub fn page_params(params: &RequestParams, args: &QueryArgs) -> Result<PageParams, ParseError> {
    let parser = Params::new();
    let page = parser.parse_int(params.get(&args.page_param))?;
    let per = parser.parse_int(params.get(&args.per_page_param))?;
    Ok(PageParams::new(page, per))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};
    use sortscope_core::domain::sort::{
        entities::SortScope,
        value_objects::SortDirection::{Asc, Desc},
    };

    mod users {
        use sea_orm::entity::prelude::*;

        #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
        #[sea_orm(table_name = "users")]
        pub struct Model {
            #[sea_orm(primary_key)]
            pub id: i32,
            pub package_name: String,
        }

        #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
        pub enum Relation {}

        impl ActiveModelBehavior for ActiveModel {}
    }

    fn params(pairs: &[(&str, &str)]) -> RequestParams {
        RequestParams::from_query_pairs(pairs.iter().copied())
    }

    fn scopes() -> SortScopes {
        SortScopes::new().with(SortScope::new(["id"]).with_default("package_name"))
    }

    #[test]
    fn test_default_sort() {
        let args = QueryArgs::default();
        assert_eq!(
            sort_spec(&params(&[]), &args, &scopes(), "index"),
            SortSpec::from_iter([("package_name", Asc)])
        );
        assert_eq!(
            sort_spec(&params(&[("sort_desc", "true")]), &args, &scopes(), "index"),
            SortSpec::from_iter([("package_name", Desc)])
        );
        assert_eq!(
            sort_spec(&params(&[("sort", "qqq")]), &args, &scopes(), "index"),
            SortSpec::from_iter([("package_name", Asc)])
        );
    }

    #[test]
    fn test_sort_desc_spellings() {
        let args = QueryArgs::default();
        for (raw, expected) in [("1", Desc), ("true", Desc), ("0", Asc), ("false", Asc), ("", Asc)] {
            assert_eq!(
                sort_spec(&params(&[("sort", "id"), ("sort_desc", raw)]), &args, &scopes(), "index"),
                SortSpec::from_iter([("id", expected)]),
                "sort_desc={raw}"
            );
        }
    }

    #[test]
    fn test_custom_param_names() {
        let args = QueryArgs {
            sort_param: "order".to_string(),
            ..QueryArgs::default()
        };
        assert_eq!(
            sort_spec(&params(&[("order[id]", "desc"), ("sort", "package_name")]), &args, &scopes(), "index"),
            SortSpec::from_iter([("id", Desc)])
        );
    }

    #[test]
    fn test_pagination() {
        let args = QueryArgs::default();
        let query = ListQuery::from_params(
            &params(&[("page", "10"), ("per", "2")]),
            &args,
            &scopes(),
            "index",
        )
        .unwrap();
        assert_eq!(query.pagination, OffsetLimit::new(18, 2));
    }

    #[test]
    fn test_malformed_page_is_bad_request() {
        let args = QueryArgs::default();
        let err = ListQuery::from_params(&params(&[("page", "ten")]), &args, &scopes(), "index")
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
        assert!(err.to_string().contains(r#""ten""#));
    }

    #[test]
    fn test_apply_to_select() {
        let args = QueryArgs::default();
        let scopes = SortScopes::new()
            .with(SortScope::new(["id"]))
            .with(SortScope::new(["package_name"]));
        let query = ListQuery::from_params(
            &params(&[
                ("sort[package_name]", "desc"),
                ("sort[id]", "asc"),
                ("sort[qqq]", "desc"),
                ("per", "5"),
            ]),
            &args,
            &scopes,
            "index",
        )
        .unwrap();

        let sql = query
            .apply(users::Entity::find())
            .build(DbBackend::Postgres)
            .to_string();
        assert!(
            sql.contains(r#"ORDER BY "users"."id" ASC, "users"."package_name" DESC"#),
            "{sql}"
        );
        assert!(sql.contains("LIMIT 5"), "{sql}");
    }
}
