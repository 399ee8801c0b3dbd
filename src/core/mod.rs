pub mod categories;
pub mod dataset;
pub mod format;
pub mod grouped_table;
pub mod ordinal_scale;
pub mod perturb;
pub mod record;
pub mod scale;
pub mod types;

pub use categories::CategorySet;
pub use dataset::SalesDataset;
pub use format::format_grouped;
pub use grouped_table::{GroupedRow, GroupedTable};
pub use ordinal_scale::OrdinalScale;
pub use perturb::{PerturbationRange, perturb_records};
pub use record::SalesRecord;
pub use scale::{LinearScale, SqrtScale, nice_tick_step, nice_ticks, nice_upper_bound};
pub use types::{Margins, Viewport};
