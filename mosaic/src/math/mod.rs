mod mercator;

pub use mercator::{project, project_coord, project_rect};
