//! Declaration transformation passes

pub mod component;
pub mod engine;
pub mod provider;
pub mod reader;

pub use component::ComponentSynthesisPass;
pub use engine::{FunctionTransform, FunctionTransformer, Order};
pub use provider::ProviderSynthesisPass;
pub use reader::{ReaderContextPass, ReaderTransform};
