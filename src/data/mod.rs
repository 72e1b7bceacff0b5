//! Reference data, price tables and dataset preparation

pub mod prices;
pub mod processor;
pub mod symbols;

pub use prices::{PriceBar, PriceRow, PriceTable, FEATURE_NAMES};
pub use processor::{train_test_split, Split, StandardScaler};
pub use symbols::{SymbolRecord, SymbolResolver, SymbolTable};
