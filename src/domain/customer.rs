//! Customer as seen from the account service.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Read-only view of a customer owned by the customer service.
///
/// Only the identifier is interpreted here; every other field is carried
/// through untouched so the remote shape can evolve independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub customer_id: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}
