pub mod display;
pub mod edge;
pub mod hit;
pub mod paint;
pub mod route;

pub use display::{DisplayList, DrawOp};
pub use edge::OrthogonalEdge;
pub use hit::{hit_test_edges, hit_test_nodes};
pub use paint::VelloSurface;
pub use route::{ArrowHead, Heading, LabelBox, Route, route, select_join_points};
