//! Free-text ingredient lines: parsing into typed quantities and scaling
//! them by a serving ratio.

mod parser;
mod quantity;

pub use parser::{parse, ParsedIngredientLine, DEFAULT_UNIT};
pub use quantity::{format_quantity, scale, scale_factor, ScaledQuantity};
