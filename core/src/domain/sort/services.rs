use tracing::debug;

use super::value_objects::{DefaultSort, RequestedSort, SortDirection, SortSpec};

/// Turns a requested sort into a validated [`SortSpec`].
///
/// Only fields listed in `allowed` survive from `requested`; a mapping keeps
/// the request's key order. When nothing usable was requested the `default`
/// applies: a bare field takes its direction from `descending_by_default`,
/// a literal spec is returned as is. An empty result means no ordering.
pub fn resolve<S: AsRef<str>>(
    requested: &RequestedSort,
    allowed: &[S],
    default: &DefaultSort,
    descending_by_default: bool,
) -> SortSpec {
    let is_allowed = |field: &str| allowed.iter().any(|a| a.as_ref() == field);

    match requested {
        RequestedSort::Absent => {}
        RequestedSort::Field(field) => {
            if is_allowed(field) {
                return SortSpec::single(
                    field.clone(),
                    SortDirection::from_descending(descending_by_default),
                );
            }
            debug!("sort field {:?} is not allowed, using default", field);
        }
        RequestedSort::Fields(entries) => {
            let spec: SortSpec = entries
                .iter()
                .filter(|(field, _)| is_allowed(field))
                .map(|(field, direction)| (field.clone(), direction.to_direction()))
                .collect();

            if !spec.is_empty() {
                return spec;
            }
            debug!("no allowed sort field requested, using default");
        }
    }

    default_spec(default, descending_by_default)
}

fn default_spec(default: &DefaultSort, descending_by_default: bool) -> SortSpec {
    match default {
        DefaultSort::None => SortSpec::new(),
        DefaultSort::Field(field) => SortSpec::single(
            field.clone(),
            SortDirection::from_descending(descending_by_default),
        ),
        DefaultSort::Spec(spec) => spec.clone(),
    }
}
