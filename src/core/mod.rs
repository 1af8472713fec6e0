pub mod error;
pub mod value;

pub use error::{BindingError, ParseError, Result, ShimError, StoreError, StoreResult};
pub use value::{ID_COLUMN, Row, filter_text, row_id, text_eq};
