pub mod clinician;
pub mod enums;
pub mod ids;
pub mod insurance;
pub mod medication;
pub mod patient;
pub mod visit;

pub use clinician::*;
pub use enums::*;
pub use ids::{RecordId, RECORD_ID_LEN};
pub use insurance::*;
pub use medication::*;
pub use patient::*;
pub use visit::*;
