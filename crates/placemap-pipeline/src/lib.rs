//! Sheet rows in, map page and KML out.

pub mod outputs;
pub mod pipeline;
pub mod schema;

pub use outputs::{RenderedOutputs, RunReport};
pub use pipeline::{collect_listings, Pipeline};
pub use schema::SheetRow;
