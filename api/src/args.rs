use clap::Args;
use sortscope_core::domain::{
    common::entities::app_errors::CoreError,
    pagination::value_objects::{DEFAULT_PER_PAGE, MAX_PER_PAGE, PaginationConfig},
};

/// Query parameter names and pagination limits.
///
/// Meant to be flattened into the host application's `clap::Parser`:
///
/// ```rust
/// use clap::Parser;
/// use sortscope_api::args::QueryArgs;
///
/// #[derive(Parser)]
/// struct Cli {
///     #[command(flatten)]
///     query: QueryArgs,
/// }
///
/// let cli = Cli::parse_from(["app", "--max-per-page", "50"]);
/// assert_eq!(cli.query.max_per_page, 50);
/// ```
#[derive(Debug, Clone, Args)]
pub struct QueryArgs {
    #[arg(long, env = "SORT_PARAM", default_value = "sort")]
    pub sort_param: String,

    #[arg(long, env = "SORT_DESC_PARAM", default_value = "sort_desc")]
    pub sort_desc_param: String,

    #[arg(long, env = "PAGE_PARAM", default_value = "page")]
    pub page_param: String,

    #[arg(long, env = "PER_PAGE_PARAM", default_value = "per")]
    pub per_page_param: String,

    #[arg(long, env = "DEFAULT_PER_PAGE", default_value_t = DEFAULT_PER_PAGE)]
    pub default_per_page: i64,

    #[arg(long, env = "MAX_PER_PAGE", default_value_t = MAX_PER_PAGE)]
    pub max_per_page: i64,
}

impl Default for QueryArgs {
    fn default() -> Self {
        Self {
            sort_param: "sort".to_string(),
            sort_desc_param: "sort_desc".to_string(),
            page_param: "page".to_string(),
            per_page_param: "per".to_string(),
            default_per_page: DEFAULT_PER_PAGE,
            max_per_page: MAX_PER_PAGE,
        }
    }
}

impl QueryArgs {
    pub fn pagination_config(&self) -> Result<PaginationConfig, CoreError> {
        PaginationConfig::new(self.default_per_page, self.max_per_page)
    }
}
