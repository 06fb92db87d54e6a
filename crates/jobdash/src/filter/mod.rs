//! Filter engine: criteria, controls and predicate masking.

mod criteria;
mod engine;

pub use criteria::{DateSelection, FilterCriteria, ViewMode};
pub use engine::{
    filter, CategoryControl, DateControl, FilterControls, FilterEngine, FilterOptions,
    FilterOutcome, RangeControl,
};
