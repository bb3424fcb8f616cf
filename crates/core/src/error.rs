//! Errors raised while resolving grid routes and the records they address.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// An `{action}` route segment other than new, details, edit or delete.
    #[error("Unknown grid action '{0}'")]
    UnknownAction(String),

    /// A `{grid}`/`{table}` route pair that no grid serves.
    #[error("No grid '{grid}' serves table '{table}'")]
    UnknownGrid { grid: String, table: String },
}
