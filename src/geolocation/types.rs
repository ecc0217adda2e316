use serde::Serialize;
use std::collections::BTreeMap;

/// Outcome of a successful reverse lookup. `Ocean` is the expected answer
/// wherever no administrative area matches, polar caps included.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NamedLocation {
    Place {
        display_name: Option<String>,
        address: BTreeMap<String, String>,
    },
    Ocean,
}
