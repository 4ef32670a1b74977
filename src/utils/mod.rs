mod span;

pub use span::{LineMap, Span};
