pub mod icons;
pub mod output;
pub mod progress;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{dim, error, field, header, muted, section, success};
pub use progress::Spinner;
pub use table::{items_table, projects_table, stats_table, videos_table};
pub use theme::{theme, Theme};
