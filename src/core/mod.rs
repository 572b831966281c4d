// Core algorithm exports
pub mod compatibility;
pub mod distance;
pub mod filters;
pub mod matcher;
pub mod proximity;

pub use compatibility::{compatible_recipients, CompatibilityTable, STANDARD_TABLE};
pub use distance::approximate_distance;
pub use filters::{is_relevant_need, matches_facility_type, relevant_needs, NeedFilter};
pub use matcher::{Matcher, Recommendation};
pub use proximity::nearest_facilities;
