pub mod colors;
pub mod feed;
pub mod layers;
pub mod legend;
pub mod load;
pub mod map;
pub mod query;
pub mod time_format;

pub use colors::magnitude_color;
pub use feed::*;
pub use layers::*;
pub use legend::{LegendRow, legend_rows};
pub use load::{LoadError, initialize, load_feeds};
pub use map::*;
pub use query::{BOUNDARY_URL, quake_query_url};
