use serde::{de::DeserializeOwned, Serialize};

use super::form::FormBuffer;
use crate::models::{validation::ValidationError, EntityId};

/// One managed entity kind: its endpoint, its searchable and filterable
/// fields, and how its edit form maps to a typed draft.
///
/// A single generic controller and gateway work for every implementor.
pub trait Resource: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Full record sent on create and on update (update is a replace).
    type Draft: Clone + Send + Sync + Serialize + DeserializeOwned + 'static;

    /// Singular name used in messages, e.g. "orphan".
    const LABEL: &'static str;
    /// Collection path below the API base, e.g. "orphans".
    const PATH: &'static str;
    /// Categorical filter keys understood by `filter_value`.
    const FILTERS: &'static [&'static str];
    /// Table headers matching `row`.
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> EntityId;

    /// Text the free-text search looks at.
    fn search_fields(&self) -> Vec<&str>;

    /// The categorical value compared against filter `key`.
    fn filter_value(&self, key: &str) -> Option<String>;

    fn form_defaults() -> FormBuffer;

    /// Editable string form of an existing record.
    fn to_form(&self) -> FormBuffer;

    fn parse_form(form: &FormBuffer) -> Result<Self::Draft, ValidationError>;

    /// Materialize a record from a draft, filling server-side defaults.
    fn from_draft(id: EntityId, draft: Self::Draft) -> Self;

    fn row(&self) -> Vec<String>;
}
