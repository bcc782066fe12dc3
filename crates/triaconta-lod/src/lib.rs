//! Level-of-detail management: discrete cell levels, zoom-scaled distance
//! selection, hemisphere culling, and the budgeted rebuild queue.

mod error;
mod horizon_culling;
mod level;
mod rebuild_queue;
mod selector;

pub use error::LodError;
pub use horizon_culling::{DEFAULT_HORIZON_MARGIN, HorizonCuller};
pub use level::LodLevel;
pub use rebuild_queue::{PendingTransition, RebuildQueue};
pub use selector::{LodBand, LodSelector, LodThresholds};
