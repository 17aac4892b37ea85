pub mod mock_runtime;

pub use mock_runtime::{make_container, MockContainerRuntime};
