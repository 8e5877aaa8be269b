//! Distribution summary of a completed run: histogram, percentiles and
//! failure counts, rendered as text or JSON.

mod error;
pub use error::ReportError;

mod histogram;
pub use histogram::{Bucket, Histogram};

mod render;
pub use render::{format_ms, render_histogram, render_summary, write_json};

mod summary;
pub use summary::{Percentiles, Summary};
