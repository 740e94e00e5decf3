include!(concat!(env!("OUT_DIR"), "/expr_generated.rs"));

#[allow(unused_imports)]
pub use expr_generated::*;
