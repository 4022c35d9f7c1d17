//! Output generation: the statistics summary and the distribution plot.

pub mod plot;
pub mod summary;

pub use plot::{visualize, ChartRenderer, PlottersRenderer};
pub use summary::{write_summary, SummaryFormat};
